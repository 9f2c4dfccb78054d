//! Wrap an embedded statement in braces.

use onyx_syntax::{parse_statement_fragment, syntax_range, SyntaxKind, SyntaxNode, TextRange};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::RuleError;
use crate::rewrite;
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct AddBraces;

/// Positions whose child statement is "embedded" (braceable).
pub(super) fn is_embedded_position(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IfStatement
            | SyntaxKind::ElseClause
            | SyntaxKind::WhileStatement
            | SyntaxKind::DoStatement
            | SyntaxKind::ForStatement
            | SyntaxKind::ForEachStatement
    )
}

impl Refactoring for AddBraces {
    fn id(&self) -> RefactoringId {
        RefactoringId::AddBraces
    }

    fn can_apply(&self, node: &SyntaxNode, _ctx: &RefactoringContext<'_>) -> bool {
        if !node.kind().is_statement() || node.kind() == SyntaxKind::Block {
            return false;
        }
        let Some(parent) = node.parent() else {
            return false;
        };
        if !is_embedded_position(parent.kind()) {
            return false;
        }
        // `else if` stays a chain; wrapping it would change the shape the
        // author chose.
        !(parent.kind() == SyntaxKind::ElseClause && node.kind() == SyntaxKind::IfStatement)
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
        let kind = node.kind();

        registry.register(RefactoringAction::new(
            self.id(),
            "Add braces",
            Box::new(move |doc, _ct| {
                let stmt = rewrite::node_at_exact(doc, range, kind)?;
                let text = format!("{{ {} }}", stmt.to_string().trim());
                let block = parse_statement_fragment(&text)?;
                let new_doc = rewrite::replace_node(doc, &stmt, &block);
                // The replacement changes layout; the external formatter
                // consumes this marker.
                let start = range.start as usize;
                Ok(new_doc.with_reformat(TextRange::new(start, start + text.len())))
            }),
        ));
        Ok(())
    }
}
