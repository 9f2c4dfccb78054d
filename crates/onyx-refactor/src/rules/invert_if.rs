//! Invert an `if`/`else`: negate the condition and swap the branches.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{parse_statement_fragment, syntax_range, SyntaxKind, SyntaxNode};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite;
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct InvertIf;

impl Refactoring for InvertIf {
    fn id(&self) -> RefactoringId {
        RefactoringId::InvertIf
    }

    fn can_apply(&self, node: &SyntaxNode, _ctx: &RefactoringContext<'_>) -> bool {
        let Some(if_stmt) = ast::IfStatement::cast(node.clone()) else {
            return false;
        };
        let Some(else_clause) = if_stmt.else_clause() else {
            return false;
        };
        // Both branches must be blocks, and `else if` chains are left alone.
        if_stmt.condition().is_some()
            && if_stmt
                .then_branch()
                .is_some_and(|branch| branch.kind() == SyntaxKind::Block)
            && else_clause
                .statement()
                .is_some_and(|stmt| stmt.kind() == SyntaxKind::Block)
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
            "Invert if",
            Box::new(move |doc, _ct| {
                let if_node = rewrite::node_at_exact(doc, range, SyntaxKind::IfStatement)?;
                let if_stmt = ast::IfStatement::cast(if_node.clone()).ok_or(ApplyError::Stale)?;

                let condition = if_stmt.condition().ok_or(ApplyError::Stale)?;
                let then_block = if_stmt.then_branch().ok_or(ApplyError::Stale)?;
                let else_block = if_stmt
                    .else_clause()
                    .and_then(|clause| clause.statement())
                    .ok_or(ApplyError::Stale)?;

                let negated = negate_expression(&condition);
                let indent = rewrite::indent_of(&if_node);
                let text = format!(
                    "if ({negated})\n{indent}{}\n{indent}else\n{indent}{}",
                    else_block, then_block,
                );
                let fragment = parse_statement_fragment(&text)?;
                Ok(rewrite::replace_node(doc, &if_node, &fragment))
            }),
        ));
        Ok(())
    }
}

/// Textual logical negation.
///
/// Comparisons flip their operator, a `!x` prefix drops, `&&`/`||` apply
/// De Morgan over both operands. Everything else is wrapped: bare names and
/// calls get a plain `!`, anything compound gets `!(...)`.
fn negate_expression(expr: &SyntaxNode) -> String {
    match expr.kind() {
        SyntaxKind::BinaryExpression => {
            let Some(bin) = ast::BinaryExpression::cast(expr.clone()) else {
                return fallback_negation(expr);
            };
            let (Some(op), Some(lhs), Some(rhs)) = (bin.operator_token(), bin.lhs(), bin.rhs())
            else {
                return fallback_negation(expr);
            };
            let lhs_text = lhs.to_string().trim().to_string();
            let rhs_text = rhs.to_string().trim().to_string();
            match op.kind() {
                SyntaxKind::EqEq => format!("{lhs_text} != {rhs_text}"),
                SyntaxKind::BangEq => format!("{lhs_text} == {rhs_text}"),
                SyntaxKind::Less => format!("{lhs_text} >= {rhs_text}"),
                SyntaxKind::LessEq => format!("{lhs_text} > {rhs_text}"),
                SyntaxKind::Greater => format!("{lhs_text} <= {rhs_text}"),
                SyntaxKind::GreaterEq => format!("{lhs_text} < {rhs_text}"),
                SyntaxKind::AmpAmp => format!(
                    "{} || {}",
                    negate_expression(&lhs),
                    negate_expression(&rhs)
                ),
                SyntaxKind::PipePipe => format!(
                    "{} && {}",
                    negate_expression(&lhs),
                    negate_expression(&rhs)
                ),
                _ => fallback_negation(expr),
            }
        }
        SyntaxKind::PrefixUnaryExpression => {
            let unary = ast::PrefixUnaryExpression::cast(expr.clone());
            let negates = unary
                .as_ref()
                .and_then(|u| u.operator_token())
                .is_some_and(|op| op.kind() == SyntaxKind::Bang);
            match (negates, unary.and_then(|u| u.operand())) {
                (true, Some(operand)) => operand.to_string().trim().to_string(),
                _ => fallback_negation(expr),
            }
        }
        SyntaxKind::ParenthesizedExpression => format!("!{}", expr.to_string().trim()),
        _ => fallback_negation(expr),
    }
}

fn fallback_negation(expr: &SyntaxNode) -> String {
    let text = expr.to_string().trim().to_string();
    match expr.kind() {
        SyntaxKind::NameExpression
        | SyntaxKind::LiteralExpression
        | SyntaxKind::InvocationExpression
        | SyntaxKind::MemberAccessExpression => format!("!{text}"),
        _ => format!("!({text})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onyx_syntax::parse;

    fn condition_of(text: &str) -> SyntaxNode {
        let root = parse(text).syntax();
        root.descendants()
            .find_map(ast::IfStatement::cast)
            .unwrap()
            .condition()
            .unwrap()
    }

    #[test]
    fn negates_comparisons() {
        let cond = condition_of("class C { void M() { if (x < 10) { } else { } } }");
        assert_eq!(negate_expression(&cond), "x >= 10");
    }

    #[test]
    fn drops_double_negation() {
        let cond = condition_of("class C { void M() { if (!ready) { } else { } } }");
        assert_eq!(negate_expression(&cond), "ready");
    }

    #[test]
    fn applies_de_morgan() {
        let cond = condition_of("class C { void M() { if (a == 1 && b(c)) { } else { } } }");
        assert_eq!(negate_expression(&cond), "a != 1 || !b(c)");
    }

    #[test]
    fn wraps_compound_expressions() {
        let cond = condition_of("class C { void M() { if (a ? b : c) { } else { } } }");
        assert_eq!(negate_expression(&cond), "!(a ? b : c)");
    }
}
