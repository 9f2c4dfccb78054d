use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;
use crate::TextRange;

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

pub mod support {
    use crate::ast::AstNode;
    use crate::parser::{SyntaxNode, SyntaxToken};
    use crate::syntax_kind::SyntaxKind;

    pub fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
        node.children().find_map(N::cast)
    }

    pub fn children<'a, N: AstNode + 'a>(node: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
        node.children().filter_map(N::cast)
    }

    pub fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind() == kind)
    }

    pub fn tokens<'a>(
        node: &'a SyntaxNode,
        kind: SyntaxKind,
    ) -> impl Iterator<Item = SyntaxToken> + 'a {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(move |tok| tok.kind() == kind)
    }

    /// Returns the declared-name token among the node's direct children.
    ///
    /// Contextual keywords (`var`, `get`, `value`, ...) lex as dedicated
    /// kinds but may still be used as names; for declaration nodes the name
    /// is the last identifier-like token among the *direct* children.
    pub fn ident_token(node: &SyntaxNode) -> Option<SyntaxToken> {
        ident_tokens(node).last()
    }

    pub fn ident_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|tok| tok.kind().is_identifier_like())
    }

    /// First direct child node that is an expression.
    pub fn expr_child(node: &SyntaxNode) -> Option<SyntaxNode> {
        node.children().find(|n| n.kind().is_expression())
    }

    /// Direct child nodes that are expressions.
    pub fn expr_children(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
        node.children().filter(|n| n.kind().is_expression())
    }

    /// First direct child node that is a statement.
    pub fn stmt_child(node: &SyntaxNode) -> Option<SyntaxNode> {
        node.children().find(|n| n.kind().is_statement())
    }

    /// Direct child nodes that are statements.
    pub fn stmt_children(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
        node.children().filter(|n| n.kind().is_statement())
    }
}

/// Find the innermost node whose range contains `range`.
///
/// Tie-break policy (documented, deliberate): the *deepest* covering node
/// wins. For an empty `range` sitting exactly on a token boundary the token
/// to the **right** is preferred, unless it is trivia and the left token is
/// not; the chosen token's parent is returned.
pub fn covering_node(root: &SyntaxNode, range: TextRange) -> SyntaxNode {
    if range.is_empty() {
        let offset = text_size::TextSize::from(range.start);
        match root.token_at_offset(offset) {
            rowan::TokenAtOffset::None => root.clone(),
            rowan::TokenAtOffset::Single(tok) => token_parent(tok, root),
            rowan::TokenAtOffset::Between(left, right) => {
                if right.kind().is_trivia() && !left.kind().is_trivia() {
                    token_parent(left, root)
                } else {
                    token_parent(right, root)
                }
            }
        }
    } else {
        match root.covering_element(range.into()) {
            rowan::NodeOrToken::Node(node) => node,
            rowan::NodeOrToken::Token(tok) => token_parent(tok, root),
        }
    }
}

fn token_parent(token: SyntaxToken, root: &SyntaxNode) -> SyntaxNode {
    token.parent().unwrap_or_else(|| root.clone())
}

mod nodes;
pub use nodes::*;

mod ext;
