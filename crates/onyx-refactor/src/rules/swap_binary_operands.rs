//! Swap the operands of a binary expression.
//!
//! A pure syntactic move: operands trade places, relational operators flip
//! so the meaning is preserved, and every trivia token keeps its position;
//! only ownership changes, never the trivia multiset.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{syntax_range, SyntaxKind, SyntaxNode};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite::{self, GreenElement};
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct SwapBinaryOperands;

fn flipped(kind: SyntaxKind) -> Option<(SyntaxKind, &'static str)> {
    Some(match kind {
        SyntaxKind::Less => (SyntaxKind::Greater, ">"),
        SyntaxKind::LessEq => (SyntaxKind::GreaterEq, ">="),
        SyntaxKind::Greater => (SyntaxKind::Less, "<"),
        SyntaxKind::GreaterEq => (SyntaxKind::LessEq, "<="),
        _ => return None,
    })
}

fn swappable(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Plus
            | SyntaxKind::Star
            | SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::Amp
            | SyntaxKind::Pipe
            | SyntaxKind::Caret
    ) || flipped(kind).is_some()
}

impl Refactoring for SwapBinaryOperands {
    fn id(&self) -> RefactoringId {
        RefactoringId::SwapBinaryOperands
    }

    fn can_apply(&self, node: &SyntaxNode, _ctx: &RefactoringContext<'_>) -> bool {
        let Some(bin) = ast::BinaryExpression::cast(node.clone()) else {
            return false;
        };
        bin.lhs().is_some()
            && bin.rhs().is_some()
            && bin
                .operator_token()
                .is_some_and(|op| swappable(op.kind()))
    }

    fn compute(
        &self,
        node: &SyntaxNode,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        if !self.can_apply(node, ctx) {
            return Ok(());
        }
        let range = syntax_range(node);

        registry.register(RefactoringAction::new(
            self.id(),
            "Swap operands",
            Box::new(move |doc, _ct| {
                let bin_node = rewrite::node_at_exact(doc, range, SyntaxKind::BinaryExpression)?;
                let bin = ast::BinaryExpression::cast(bin_node.clone()).ok_or(ApplyError::Stale)?;
                let lhs = bin.lhs().ok_or(ApplyError::Stale)?;
                let rhs = bin.rhs().ok_or(ApplyError::Stale)?;
                let lhs_index = lhs.index();
                let rhs_index = rhs.index();
                let operator = bin.operator_token().ok_or(ApplyError::Stale)?;

                // Rebuild the node's child list slot by slot: the operand
                // slots trade greens, relational operators flip, everything
                // else (all interior trivia included) stays in place.
                let mut children: Vec<GreenElement> = Vec::new();
                for (index, element) in bin_node.children_with_tokens().enumerate() {
                    match element {
                        rowan::NodeOrToken::Node(child) => {
                            if index == lhs_index {
                                children.push(rewrite::node_element(&rhs));
                            } else if index == rhs_index {
                                children.push(rewrite::node_element(&lhs));
                            } else {
                                children.push(rewrite::node_element(&child));
                            }
                        }
                        rowan::NodeOrToken::Token(token) => {
                            if token == operator {
                                if let Some((kind, text)) = flipped(token.kind()) {
                                    children.push(rewrite::token_element(kind, text));
                                    continue;
                                }
                            }
                            children
                                .push(rowan::NodeOrToken::Token(rewrite::green_of_token(&token)));
                        }
                    }
                }

                let new_green =
                    rowan::GreenNode::new(SyntaxKind::BinaryExpression.into(), children);
                Ok(rewrite::replace_node_with_green(doc, &bin_node, new_green))
            }),
        ));
        Ok(())
    }
}
