//! Convert a `switch` statement into an `if`/`else if`/`else` chain.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{parse_statement_fragment, syntax_range, SyntaxKind, SyntaxNode};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite;
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct ConvertSwitchToIf;

impl Refactoring for ConvertSwitchToIf {
    fn id(&self) -> RefactoringId {
        RefactoringId::ConvertSwitchToIf
    }

    fn can_apply(&self, node: &SyntaxNode, _ctx: &RefactoringContext<'_>) -> bool {
        convertible(node).is_some()
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
            "Convert 'switch' to 'if'",
            Box::new(move |doc, _ct| {
                let switch_node = rewrite::node_at_exact(doc, range, SyntaxKind::SwitchStatement)?;
                let switch = convertible(&switch_node).ok_or(ApplyError::Stale)?;
                let text = render_if_chain(&switch);
                let fragment = parse_statement_fragment(&text)?;
                Ok(rewrite::replace_node(doc, &switch_node, &fragment))
            }),
        ));
        Ok(())
    }
}

/// A switch is convertible when every section ends in `break` (no
/// fall-through to reproduce) and every non-default label carries a case
/// expression. At least one non-default section must exist or there would
/// be nothing to put in the `if`.
fn convertible(node: &SyntaxNode) -> Option<ast::SwitchStatement> {
    let switch = ast::SwitchStatement::cast(node.clone())?;
    switch.governing_expression()?;

    let mut has_case_section = false;
    let mut default_count = 0;
    for section in switch.sections() {
        let last = section.statements().last()?;
        if last.kind() != SyntaxKind::BreakStatement {
            return None;
        }
        if section.is_default() {
            default_count += 1;
        } else {
            has_case_section = true;
            if section.labels().any(|label| label.expression().is_none()) {
                return None;
            }
        }
    }
    if !has_case_section || default_count > 1 {
        return None;
    }
    Some(switch)
}

fn render_if_chain(switch: &ast::SwitchStatement) -> String {
    let governing = switch
        .governing_expression()
        .map(|e| e.to_string().trim().to_string())
        .unwrap_or_default();
    let indent = rewrite::indent_of(switch.syntax());

    let mut out = String::new();
    let mut first = true;
    for section in switch.sections().filter(|s| !s.is_default()) {
        let condition = section
            .labels()
            .filter_map(|label| label.expression())
            .map(|expr| format!("{governing} == {}", expr.to_string().trim()))
            .collect::<Vec<_>>()
            .join(" || ");

        if first {
            out.push_str(&format!("if ({condition})"));
            first = false;
        } else {
            out.push_str(&format!("\n{indent}else if ({condition})"));
        }
        render_section_block(&mut out, &section, &indent);
    }

    if let Some(default) = switch.sections().find(|s| s.is_default()) {
        out.push_str(&format!("\n{indent}else"));
        render_section_block(&mut out, &default, &indent);
    }

    out
}

/// Render a section's statements, minus the terminal `break`, as a block.
fn render_section_block(out: &mut String, section: &ast::SwitchSection, indent: &str) {
    out.push_str(&format!("\n{indent}{{"));
    let statements: Vec<SyntaxNode> = section.statements().collect();
    for stmt in &statements[..statements.len().saturating_sub(1)] {
        out.push_str(&format!("\n{indent}    {}", stmt.to_string().trim()));
    }
    out.push_str(&format!("\n{indent}}}"));
}
