//! Rewrite executor and tree-editing primitives.
//!
//! Every transform works against an immutable snapshot: the primitives here
//! produce a *new* root (sharing unmodified subtrees) and wrap it into a
//! successor [`Document`]. The original tree is never touched, so a failed
//! transform cannot corrupt anything: the new document is only swapped in
//! after the whole transform succeeds.
//!
//! Trivia contract, honored by construction:
//! - Replacing a node leaves its exterior trivia alone: trivia between
//!   siblings belongs to the parent, not to the replaced node.
//! - Whitespace-only collapsing must filter by kind (`Whitespace`/`Newline`)
//!   and never delete comments; [`contains_comment`] is the guard rules use
//!   to refuse instead.
//! - Comment operations bound their effect with [`comment_run_bounds`],
//!   which scans the contiguous trivia run outward while the trivia kind is
//!   whitespace, end-of-line, or another line comment, and records the
//!   outermost line comment reached in each direction. Block and doc
//!   comments bound at exactly their own index, absorbing no neighbors.
//! - Transforms that intentionally change formatting tag the affected range
//!   via [`Document::with_reformat`] for the external formatting service
//!   instead of hand-formatting the result.

use onyx_core::CancellationToken;
use onyx_syntax::{SyntaxKind, SyntaxNode, SyntaxToken, TextEdit, TextRange};

use crate::action::RefactoringAction;
use crate::document::Document;
use crate::error::ApplyError;

pub type GreenElement = rowan::NodeOrToken<rowan::GreenNode, rowan::GreenToken>;

/// Run a chosen action's deferred transform.
///
/// Failure surfaces per-action; `document` is unchanged either way.
pub fn execute(
    action: &RefactoringAction,
    document: &Document,
    cancellation: &CancellationToken,
) -> Result<Document, ApplyError> {
    cancellation.check()?;
    action.apply(document, cancellation)
}

/// Replace `old` (a node inside `document`'s tree) with `replacement`,
/// producing the successor document.
pub fn replace_node(
    document: &Document,
    old: &SyntaxNode,
    replacement: &SyntaxNode,
) -> Document {
    let new_root_green = old.replace_with(replacement.green().into_owned());
    document.with_root(SyntaxNode::new_root(new_root_green))
}

/// Replace a token with a same-position token of a different kind/text.
pub fn replace_token(
    document: &Document,
    old: &SyntaxToken,
    kind: SyntaxKind,
    text: &str,
) -> Document {
    let new_root_green = old.replace_with(green_token(kind, text));
    document.with_root(SyntaxNode::new_root(new_root_green))
}

/// Replace `old` with an already-built green subtree.
pub fn replace_node_with_green(
    document: &Document,
    old: &SyntaxNode,
    green: rowan::GreenNode,
) -> Document {
    let new_root_green = old.replace_with(green);
    document.with_root(SyntaxNode::new_root(new_root_green))
}

/// Splice `parent`'s child slots `range` with `replacement` elements,
/// producing the successor document. Child slot indices count tokens and
/// nodes alike ([`child_index`]); an empty `range` inserts.
pub fn splice_children(
    document: &Document,
    parent: &SyntaxNode,
    range: std::ops::Range<usize>,
    replacement: Vec<GreenElement>,
) -> Document {
    let mut children: Vec<GreenElement> = Vec::new();
    let mut inserted = false;
    for (index, element) in parent.children_with_tokens().enumerate() {
        if index == range.start && !inserted {
            children.extend(replacement.iter().cloned());
            inserted = true;
        }
        if range.contains(&index) {
            continue;
        }
        children.push(green_element_of(&element));
    }
    if !inserted {
        children.extend(replacement.iter().cloned());
    }

    let new_parent_green = rowan::GreenNode::new(parent.kind().into(), children);
    replace_node_with_green(document, parent, new_parent_green)
}

pub fn green_token(kind: SyntaxKind, text: &str) -> rowan::GreenToken {
    rowan::GreenToken::new(kind.into(), text)
}

pub fn green_of_node(node: &SyntaxNode) -> rowan::GreenNode {
    node.green().into_owned()
}

pub fn green_of_token(token: &SyntaxToken) -> rowan::GreenToken {
    token.green().to_owned()
}

/// A node's green as a spliceable element.
pub fn node_element(node: &SyntaxNode) -> GreenElement {
    rowan::NodeOrToken::Node(green_of_node(node))
}

/// A fresh token as a spliceable element.
pub fn token_element(kind: SyntaxKind, text: &str) -> GreenElement {
    rowan::NodeOrToken::Token(green_token(kind, text))
}

/// An existing child's green as a spliceable element.
pub fn green_element_of(element: &onyx_syntax::SyntaxElement) -> GreenElement {
    match element {
        rowan::NodeOrToken::Node(node) => rowan::NodeOrToken::Node(green_of_node(node)),
        rowan::NodeOrToken::Token(token) => rowan::NodeOrToken::Token(green_of_token(token)),
    }
}

/// The child slot index of `node` within its parent.
pub fn child_index(node: &SyntaxNode) -> usize {
    node.index()
}

/// The child slot index of `token` within its parent.
pub fn token_index(token: &SyntaxToken) -> usize {
    token.index()
}

/// Leading horizontal indentation of the line `node` starts on.
pub fn indent_of(node: &SyntaxNode) -> String {
    let Some(first) = node.first_token() else {
        return String::new();
    };
    let mut indent = String::new();
    let mut current = first.prev_token();
    while let Some(tok) = current {
        match tok.kind() {
            SyntaxKind::Whitespace => {
                indent.insert_str(0, tok.text());
                current = tok.prev_token();
            }
            SyntaxKind::Newline => break,
            // A non-trivia token or a comment on the same line: the node
            // does not start its line, so it has no own indentation.
            _ => return String::new(),
        }
    }
    indent
}

/// Whether any comment trivia occurs anywhere under `node`.
pub fn contains_comment(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|el| el.into_token())
        .any(|tok| tok.kind().is_comment())
}

/// The contiguous trivia run around `trivia`, plus `trivia`'s index in it.
pub fn trivia_run(trivia: &SyntaxToken) -> (Vec<SyntaxToken>, usize) {
    debug_assert!(trivia.kind().is_trivia());
    let mut run = Vec::new();

    let mut current = trivia.prev_token();
    while let Some(tok) = current {
        if !tok.kind().is_trivia() {
            break;
        }
        current = tok.prev_token();
        run.push(tok);
    }
    run.reverse();
    let index = run.len();
    run.push(trivia.clone());

    let mut current = trivia.next_token();
    while let Some(tok) = current {
        if !tok.kind().is_trivia() {
            break;
        }
        current = tok.next_token();
        run.push(tok);
    }

    (run, index)
}

/// Boundaries of the comment group around `run[index]`, as inclusive run
/// indices.
///
/// For a line comment, scans outward in both directions while the trivia
/// kind is whitespace, end-of-line, or another line comment, and returns the
/// outermost line-comment index reached on each side. Anything else (a doc
/// comment, a block comment, the end of the run) stops the scan, so trivia
/// belonging to a sibling construct is never absorbed. Block and doc
/// comments bound at exactly their own index.
pub fn comment_run_bounds(run: &[SyntaxToken], index: usize) -> (usize, usize) {
    let kind = run[index].kind();
    if kind != SyntaxKind::LineComment {
        return (index, index);
    }

    let scannable = |k: SyntaxKind| {
        matches!(
            k,
            SyntaxKind::Whitespace | SyntaxKind::Newline | SyntaxKind::LineComment
        )
    };

    let mut lo = index;
    let mut i = index;
    while i > 0 && scannable(run[i - 1].kind()) {
        i -= 1;
        if run[i].kind() == SyntaxKind::LineComment {
            lo = i;
        }
    }

    let mut hi = index;
    let mut i = index;
    while i + 1 < run.len() && scannable(run[i + 1].kind()) {
        i += 1;
        if run[i].kind() == SyntaxKind::LineComment {
            hi = i;
        }
    }

    (lo, hi)
}

/// Re-locate the node a deferred transform was registered against.
///
/// Deferred transforms capture plain positions, not tree handles; at apply
/// time the node is looked up again in the document the host passes in. A
/// mismatch means the snapshot went stale between dispatch and apply, which
/// surfaces as [`ApplyError::Stale`] for this one action.
pub fn node_at_exact(
    document: &Document,
    range: TextRange,
    kind: SyntaxKind,
) -> Result<SyntaxNode, ApplyError> {
    let root = document.root();
    let start = onyx_syntax::ast::covering_node(&root, range);
    start
        .ancestors()
        .find(|node| node.kind() == kind && onyx_syntax::syntax_range(node) == range)
        .ok_or(ApplyError::Stale)
}

/// Token analogue of [`node_at_exact`].
pub fn token_at_exact(
    document: &Document,
    range: TextRange,
    kind: SyntaxKind,
) -> Result<SyntaxToken, ApplyError> {
    let root = document.root();
    let offset = text_size::TextSize::from(range.start);
    let token = match root.token_at_offset(offset) {
        rowan::TokenAtOffset::None => return Err(ApplyError::Stale),
        rowan::TokenAtOffset::Single(tok) => tok,
        rowan::TokenAtOffset::Between(left, right) => {
            if right.kind() == kind {
                right
            } else {
                left
            }
        }
    };
    if token.kind() == kind && onyx_syntax::token_range(&token) == range {
        Ok(token)
    } else {
        Err(ApplyError::Stale)
    }
}

/// Apply non-overlapping text edits to `text`.
///
/// Edits are validated and applied back-to-front so earlier offsets stay
/// stable.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, ApplyError> {
    if edits.is_empty() {
        return Ok(text.to_string());
    }

    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then_with(|| a.range.end.cmp(&b.range.end))
    });

    let mut prev: Option<TextRange> = None;
    for edit in &sorted {
        if edit.range.end as usize > text.len() {
            return Err(ApplyError::EditOutOfBounds {
                range: edit.range,
                len: text.len(),
            });
        }
        if let Some(prev_range) = prev {
            if edit.range.start < prev_range.end {
                return Err(ApplyError::OverlappingEdits {
                    first: prev_range,
                    second: edit.range,
                });
            }
        }
        prev = Some(edit.range);
    }

    let mut out = text.to_string();
    for edit in sorted.iter().rev() {
        out.replace_range(edit.range.start as usize..edit.range.end as usize, &edit.replacement);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use onyx_syntax::parse;
    use pretty_assertions::assert_eq;

    fn find_trivia(root: &SyntaxNode, text_contains: &str) -> SyntaxToken {
        root.descendants_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|tok| tok.kind().is_trivia() && tok.text().contains(text_contains))
            .unwrap()
    }

    #[test]
    fn comment_run_bounds_scenario() {
        // The canonical boundary scenario: [WS, "// a", WS, "// b", EOL]
        // with the cursor on "// b". The group covers "// a" and "// b"
        // (contiguous via whitespace) but never the trailing end-of-line.
        let text = "class C { }  // a\n// b\nclass D { }";
        let root = parse(text).syntax();
        let b = find_trivia(&root, "// b");
        let (run, index) = trivia_run(&b);

        let kinds: Vec<SyntaxKind> = run.iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::Whitespace,
                SyntaxKind::LineComment,
                SyntaxKind::Newline,
                SyntaxKind::LineComment,
                SyntaxKind::Newline,
            ]
        );

        let (lo, hi) = comment_run_bounds(&run, index);
        assert_eq!(run[lo].text(), "// a");
        assert_eq!(run[hi].text(), "// b");
    }

    #[test]
    fn doc_comments_block_the_scan() {
        let text = "class C { }  /// doc\n// b\nclass D { }";
        let root = parse(text).syntax();
        let b = find_trivia(&root, "// b");
        let (run, index) = trivia_run(&b);
        let (lo, hi) = comment_run_bounds(&run, index);
        // The doc comment is not absorbed: the group is just "// b".
        assert_eq!(lo, index);
        assert_eq!(hi, index);
    }

    #[test]
    fn block_comment_bounds_at_itself() {
        let text = "// a\n/* b */\n// c\n";
        let root = parse(text).syntax();
        let b = find_trivia(&root, "/* b */");
        let (run, index) = trivia_run(&b);
        assert_eq!(comment_run_bounds(&run, index), (index, index));
    }

    #[test]
    fn indent_of_statement() {
        let text = "class C {\n    void M() {\n        x();\n    }\n}";
        let root = parse(text).syntax();
        let stmt = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ExpressionStatement)
            .unwrap();
        assert_eq!(indent_of(&stmt), "        ");
    }

    #[test]
    fn apply_text_edits_rejects_overlap() {
        let edits = vec![
            TextEdit::new(TextRange::new(0, 4), "x"),
            TextEdit::new(TextRange::new(2, 6), "y"),
        ];
        assert!(matches!(
            apply_text_edits("0123456789", &edits),
            Err(ApplyError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn apply_text_edits_back_to_front() {
        let edits = vec![
            TextEdit::new(TextRange::new(0, 1), "AA"),
            TextEdit::new(TextRange::new(2, 3), "CC"),
        ];
        assert_eq!(apply_text_edits("abc", &edits).unwrap(), "AAbCC");
    }
}
