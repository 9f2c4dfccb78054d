//! Wrap the expression under the cursor in parentheses.
//!
//! The speculative rule: applicability is probed by actually building the
//! parenthesized fragment and seeing whether it parses. A fragment failure
//! is the narrow, expected "not applicable" outcome, never an error.

use onyx_syntax::{parse_expression_fragment, syntax_range, SyntaxKind, SyntaxNode};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::RuleError;
use crate::rewrite;
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct ParenthesizeExpression;

impl Refactoring for ParenthesizeExpression {
    fn id(&self) -> RefactoringId {
        RefactoringId::ParenthesizeExpression
    }

    fn can_apply(&self, node: &SyntaxNode, _ctx: &RefactoringContext<'_>) -> bool {
        if !node.kind().is_expression() || node.kind() == SyntaxKind::ParenthesizedExpression {
            return false;
        }
        // Only inside another expression does an extra pair of parentheses
        // mean anything; double-wrapping is never offered.
        let Some(parent) = node.parent() else {
            return false;
        };
        let in_expression_position = match parent.kind() {
            SyntaxKind::ParenthesizedExpression => false,
            kind if kind.is_expression() => true,
            SyntaxKind::Argument => true,
            _ => false,
        };
        if !in_expression_position {
            return false;
        }

        // Speculative probe: would the parenthesized form even parse?
        parse_expression_fragment(&format!("({})", node.to_string().trim())).is_ok()
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
            "Parenthesize expression",
            Box::new(move |doc, _ct| {
                let expr = rewrite::node_at_exact(doc, range, kind)?;
                let fragment = parse_expression_fragment(&format!("({expr})"))?;
                Ok(rewrite::replace_node(doc, &expr, &fragment))
            }),
        ));
        Ok(())
    }
}
