//! Expand an `=> expr` body into a block body.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{
    parse_member_fragment, parse_statement_fragment, syntax_range, SyntaxKind, SyntaxNode,
};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite::{self, GreenElement};
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct ExpandExpressionBody;

impl Refactoring for ExpandExpressionBody {
    fn id(&self) -> RefactoringId {
        RefactoringId::ExpandExpressionBody
    }

    fn needs_semantic_model(&self) -> bool {
        true
    }

    fn can_apply(&self, node: &SyntaxNode, ctx: &RefactoringContext<'_>) -> bool {
        target(node, ctx).is_some()
    }

    fn compute(
        &self,
        node: &SyntaxNode,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        let Some(target) = target(node, ctx) else {
            return Ok(());
        };

        registry.register(RefactoringAction::new(
            self.id(),
            "Use block body",
            Box::new(move |doc, _ct| target.apply(doc)),
        ));
        Ok(())
    }
}

/// What the deferred transform needs, resolved at dispatch time.
///
/// Whether the expanded body needs a `return` is a *semantic* question: the
/// owning member's result type decides it, not the expression's syntax.
#[derive(Clone)]
enum Target {
    Method {
        range: onyx_syntax::TextRange,
        is_void: bool,
    },
    Property {
        range: onyx_syntax::TextRange,
    },
    Accessor {
        range: onyx_syntax::TextRange,
        is_get: bool,
    },
}

fn target(node: &SyntaxNode, ctx: &RefactoringContext<'_>) -> Option<Target> {
    let arrow = ast::ArrowExpressionClause::cast(node.clone())?;
    arrow.expression()?;
    let owner = node.parent()?;

    match owner.kind() {
        SyntaxKind::MethodDeclaration => {
            let method = ast::MethodDeclaration::cast(owner.clone())?;
            let model = ctx.semantic_model()?;
            let is_void = method
                .return_type()
                .and_then(|ty| model.type_info(ty.syntax()))
                .map(|info| info.is_void)
                .unwrap_or(false);
            Some(Target::Method {
                range: syntax_range(&owner),
                is_void,
            })
        }
        SyntaxKind::PropertyDeclaration => Some(Target::Property {
            range: syntax_range(&owner),
        }),
        SyntaxKind::AccessorDeclaration => {
            let accessor = ast::AccessorDeclaration::cast(owner.clone())?;
            Some(Target::Accessor {
                range: syntax_range(&owner),
                is_get: accessor.is_get(),
            })
        }
        _ => None,
    }
}

impl Target {
    fn apply(&self, doc: &crate::document::Document) -> Result<crate::document::Document, ApplyError> {
        match *self {
            Target::Method { range, is_void } => {
                let member = rewrite::node_at_exact(doc, range, SyntaxKind::MethodDeclaration)?;
                let method = ast::MethodDeclaration::cast(member.clone()).ok_or(ApplyError::Stale)?;
                let arrow = method.arrow_clause().ok_or(ApplyError::Stale)?;
                let expr = expression_text(&arrow)?;

                let body_line = if is_void {
                    format!("{expr};")
                } else {
                    format!("return {expr};")
                };
                let new_text = block_bodied(&member, &arrow, &body_line);
                let fragment = parse_member_fragment(&new_text)?;
                Ok(rewrite::replace_node(doc, &member, &fragment))
            }
            Target::Property { range } => {
                let member = rewrite::node_at_exact(doc, range, SyntaxKind::PropertyDeclaration)?;
                let property =
                    ast::PropertyDeclaration::cast(member.clone()).ok_or(ApplyError::Stale)?;
                let arrow = property.arrow_clause().ok_or(ApplyError::Stale)?;
                let expr = expression_text(&arrow)?;

                let body_line = format!("get {{ return {expr}; }}");
                let new_text = block_bodied(&member, &arrow, &body_line);
                let fragment = parse_member_fragment(&new_text)?;
                Ok(rewrite::replace_node(doc, &member, &fragment))
            }
            Target::Accessor { range, is_get } => {
                let accessor = rewrite::node_at_exact(doc, range, SyntaxKind::AccessorDeclaration)?;
                let decl =
                    ast::AccessorDeclaration::cast(accessor.clone()).ok_or(ApplyError::Stale)?;
                let arrow = decl.arrow_clause().ok_or(ApplyError::Stale)?;
                let expr = expression_text(&arrow)?;

                let block_text = if is_get {
                    format!("{{ return {expr}; }}")
                } else {
                    format!("{{ {expr}; }}")
                };
                let block = parse_statement_fragment(&block_text)?;

                // Replace the arrow clause and its trailing `;` in place.
                let arrow_index = arrow.syntax().index();
                let semicolon_index = accessor
                    .children_with_tokens()
                    .enumerate()
                    .skip(arrow_index + 1)
                    .find(|(_, el)| el.kind() == SyntaxKind::Semicolon)
                    .map(|(i, _)| i)
                    .ok_or(ApplyError::Stale)?;
                let elements: Vec<GreenElement> = vec![rewrite::node_element(&block)];
                Ok(rewrite::splice_children(
                    doc,
                    &accessor,
                    arrow_index..semicolon_index + 1,
                    elements,
                ))
            }
        }
    }
}

fn expression_text(arrow: &ast::ArrowExpressionClause) -> Result<String, ApplyError> {
    Ok(arrow
        .expression()
        .ok_or(ApplyError::Stale)?
        .to_string()
        .trim()
        .to_string())
}

/// Render `member` with the arrow clause and trailing `;` replaced by a
/// block body containing `body_line`.
fn block_bodied(member: &SyntaxNode, arrow: &ast::ArrowExpressionClause, body_line: &str) -> String {
    let member_start = member.text_range().start();
    let arrow_start = arrow.syntax().text_range().start();
    let member_text = member.to_string();
    let prefix_len = usize::from(arrow_start - member_start);
    let prefix = member_text[..prefix_len].trim_end();
    let indent = rewrite::indent_of(member);
    format!("{prefix}\n{indent}{{\n{indent}    {body_line}\n{indent}}}")
}
