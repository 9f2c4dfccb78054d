//! Collapse a block body into an `=> expr` body.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{parse_member_fragment, syntax_range, Feature, SyntaxKind, SyntaxNode};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite;
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct UseExpressionBody;

impl Refactoring for UseExpressionBody {
    fn id(&self) -> RefactoringId {
        RefactoringId::UseExpressionBody
    }

    fn can_apply(&self, node: &SyntaxNode, ctx: &RefactoringContext<'_>) -> bool {
        if !ctx
            .settings()
            .language_level
            .supports(Feature::ExpressionBodiedMembers)
        {
            return false;
        }
        collapse_plan(node).is_some()
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
            "Use expression body",
            Box::new(move |doc, _ct| {
                let member = rewrite::node_at_exact(doc, range, kind)?;
                let (removed, expr) = collapse_plan(&member).ok_or(ApplyError::Stale)?;

                let member_start = member.text_range().start();
                let removed_start = removed.text_range().start();
                let member_text = member.to_string();
                let prefix_len = usize::from(removed_start - member_start);
                let prefix = member_text[..prefix_len].trim_end();

                let new_text = format!("{prefix} => {expr};");
                let fragment = parse_member_fragment(&new_text)?;
                Ok(rewrite::replace_node(doc, &member, &fragment))
            }),
        ));
        Ok(())
    }
}

/// The node to cut (block or accessor list) and the expression that becomes
/// the arrow body. `None` when the member does not collapse cleanly.
///
/// Blocks containing comments never collapse: the rewrite strips only
/// whitespace and line breaks, and comments must not be dropped silently.
fn collapse_plan(node: &SyntaxNode) -> Option<(SyntaxNode, String)> {
    match node.kind() {
        SyntaxKind::MethodDeclaration => {
            let method = ast::MethodDeclaration::cast(node.clone())?;
            let body = method.body()?;
            let expr = single_expression(&body)?;
            Some((body.syntax().clone(), expr))
        }
        SyntaxKind::PropertyDeclaration => {
            let property = ast::PropertyDeclaration::cast(node.clone())?;
            let accessors = property.accessor_list()?;
            let mut iter = accessors.accessors();
            let getter = iter.next()?;
            if iter.next().is_some() || !getter.is_get() {
                return None;
            }
            let body = getter.body()?;
            let expr = single_return_expression(&body)?;
            Some((accessors.syntax().clone(), expr))
        }
        _ => None,
    }
}

fn single_expression(body: &ast::Block) -> Option<String> {
    if rewrite::contains_comment(body.syntax()) {
        return None;
    }
    let mut statements = body.statements();
    let stmt = statements.next()?;
    if statements.next().is_some() {
        return None;
    }
    match stmt.kind() {
        SyntaxKind::ReturnStatement => {
            let expr = ast::ReturnStatement::cast(stmt)?.expression()?;
            Some(expr.to_string().trim().to_string())
        }
        SyntaxKind::ExpressionStatement => {
            let expr = ast::ExpressionStatement::cast(stmt)?.expression()?;
            Some(expr.to_string().trim().to_string())
        }
        _ => None,
    }
}

fn single_return_expression(body: &ast::Block) -> Option<String> {
    if rewrite::contains_comment(body.syntax()) {
        return None;
    }
    let mut statements = body.statements();
    let stmt = statements.next()?;
    if statements.next().is_some() {
        return None;
    }
    let expr = ast::ReturnStatement::cast(stmt)?.expression()?;
    Some(expr.to_string().trim().to_string())
}
