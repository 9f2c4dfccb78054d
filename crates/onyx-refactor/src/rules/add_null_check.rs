//! Insert a null check for the parameter under the cursor.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{parse_statement_fragment, syntax_range, Feature, SyntaxKind, SyntaxNode};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite::{self, GreenElement};
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct AddParameterNullCheck;

impl Refactoring for AddParameterNullCheck {
    fn id(&self) -> RefactoringId {
        RefactoringId::AddParameterNullCheck
    }

    fn needs_semantic_model(&self) -> bool {
        true
    }

    fn can_apply(&self, node: &SyntaxNode, ctx: &RefactoringContext<'_>) -> bool {
        applicability(node, ctx).is_some()
    }

    fn compute(
        &self,
        node: &SyntaxNode,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        let Some((name, body)) = applicability(node, ctx) else {
            return Ok(());
        };

        let body_range = syntax_range(&body);
        let use_is_null = ctx
            .settings()
            .language_level
            .supports(Feature::IsNullPattern);

        registry.register(RefactoringAction::new(
            self.id(),
            format!("Check parameter '{name}' for null"),
            Box::new(move |doc, _ct| {
                let body = rewrite::node_at_exact(doc, body_range, SyntaxKind::Block)?;
                let block = ast::Block::cast(body.clone()).ok_or(ApplyError::Stale)?;

                let indent = block
                    .statements()
                    .next()
                    .map(|stmt| rewrite::indent_of(&stmt))
                    .filter(|indent| !indent.is_empty())
                    .unwrap_or_else(|| {
                        let member_indent = body
                            .parent()
                            .map(|m| rewrite::indent_of(&m))
                            .unwrap_or_default();
                        format!("{member_indent}    ")
                    });

                let check = if use_is_null {
                    format!("{name} is null")
                } else {
                    format!("{name} == null")
                };
                let stmt_text = format!(
                    "if ({check})\n{indent}{{\n{indent}    throw new ArgumentNullException(nameof({name}));\n{indent}}}"
                );
                let stmt = parse_statement_fragment(&stmt_text)?;

                let lbrace = block.lbrace_token().ok_or(ApplyError::Stale)?;
                let insert_at = rewrite::token_index(&lbrace) + 1;
                let elements: Vec<GreenElement> = vec![
                    rewrite::token_element(SyntaxKind::Newline, "\n"),
                    rewrite::token_element(SyntaxKind::Whitespace, &indent),
                    rewrite::node_element(&stmt),
                    rewrite::token_element(SyntaxKind::Newline, "\n"),
                ];

                Ok(rewrite::splice_children(
                    doc,
                    &body,
                    insert_at..insert_at,
                    elements,
                ))
            }),
        ));
        Ok(())
    }
}

/// Applicable when the node is a nullable-typed parameter of a member with a
/// block body that does not already check this parameter.
fn applicability(
    node: &SyntaxNode,
    ctx: &RefactoringContext<'_>,
) -> Option<(String, SyntaxNode)> {
    let param = ast::Parameter::cast(node.clone())?;
    let name = param.name_token()?.text().to_string();

    let owner = node.parent()?.parent()?;
    let body = match owner.kind() {
        SyntaxKind::MethodDeclaration => {
            ast::MethodDeclaration::cast(owner)?.body()?
        }
        SyntaxKind::ConstructorDeclaration => {
            ast::ConstructorDeclaration::cast(owner)?.body()?
        }
        _ => return None,
    };

    let ty = param.param_type()?;
    let model = ctx.semantic_model()?;
    let info = model.type_info(ty.syntax())?;
    if !info.accepts_null() {
        return None;
    }

    // Idempotence: a body that already checks this parameter must not offer
    // the action again.
    if body
        .statements()
        .any(|stmt| is_null_check_for(&stmt, &name))
    {
        return None;
    }

    Some((name, body.syntax().clone()))
}

/// Recognize the null-check shapes this rule (and developers) produce:
/// `if (p == null) throw ...;`, `if (p is null) throw ...;`, and
/// `ArgumentNullException.ThrowIfNull(p);`.
fn is_null_check_for(stmt: &SyntaxNode, name: &str) -> bool {
    if let Some(if_stmt) = ast::IfStatement::cast(stmt.clone()) {
        let Some(cond) = if_stmt.condition() else {
            return false;
        };
        let checks_param = match cond.kind() {
            SyntaxKind::BinaryExpression => {
                let Some(bin) = ast::BinaryExpression::cast(cond) else {
                    return false;
                };
                bin.operator_token()
                    .is_some_and(|op| op.kind() == SyntaxKind::EqEq)
                    && {
                        let lhs = bin.lhs().map(|n| n.to_string());
                        let rhs = bin.rhs().map(|n| n.to_string());
                        (lhs.as_deref() == Some(name)
                            && rhs.as_deref().map(str::trim) == Some("null"))
                            || (rhs.as_deref() == Some(name)
                                && lhs.as_deref().map(str::trim) == Some("null"))
                    }
            }
            SyntaxKind::IsPatternExpression => {
                let Some(pat) = ast::IsPatternExpression::cast(cond) else {
                    return false;
                };
                pat.is_null_check()
                    && pat
                        .expression()
                        .is_some_and(|expr| expr.to_string() == name)
            }
            _ => false,
        };
        if !checks_param {
            return false;
        }

        return match if_stmt.then_branch() {
            Some(branch) if branch.kind() == SyntaxKind::ThrowStatement => true,
            Some(branch) => ast::Block::cast(branch).is_some_and(|block| {
                block
                    .statements()
                    .any(|s| s.kind() == SyntaxKind::ThrowStatement)
            }),
            None => false,
        };
    }

    if let Some(expr_stmt) = ast::ExpressionStatement::cast(stmt.clone()) {
        let Some(invocation) = expr_stmt
            .expression()
            .and_then(ast::InvocationExpression::cast)
        else {
            return false;
        };
        let is_throw_helper = invocation
            .callee()
            .and_then(ast::MemberAccessExpression::cast)
            .and_then(|access| access.name_token())
            .is_some_and(|tok| tok.text() == "ThrowIfNull");
        return is_throw_helper
            && invocation
                .argument_list()
                .and_then(|args| args.arguments().next())
                .and_then(|arg| arg.expression())
                .is_some_and(|expr| expr.to_string() == name);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use onyx_syntax::parse;

    fn first_statement(text: &str) -> SyntaxNode {
        let root = parse(text).syntax();
        root.descendants()
            .find_map(ast::Block::cast)
            .unwrap()
            .statements()
            .next()
            .unwrap()
    }

    #[test]
    fn recognizes_eq_null_check() {
        let stmt = first_statement(
            "class C { void M(string s) { if (s == null) { throw new ArgumentNullException(nameof(s)); } } }",
        );
        assert!(is_null_check_for(&stmt, "s"));
        assert!(!is_null_check_for(&stmt, "t"));
    }

    #[test]
    fn recognizes_is_null_check() {
        let stmt = first_statement(
            "class C { void M(string s) { if (s is null) throw new ArgumentNullException(nameof(s)); } }",
        );
        assert!(is_null_check_for(&stmt, "s"));
    }

    #[test]
    fn recognizes_throw_helper() {
        let stmt =
            first_statement("class C { void M(string s) { ArgumentNullException.ThrowIfNull(s); } }");
        assert!(is_null_check_for(&stmt, "s"));
    }

    #[test]
    fn plain_statement_is_not_a_check() {
        let stmt = first_statement("class C { void M(string s) { Use(s); } }");
        assert!(!is_null_check_for(&stmt, "s"));
    }
}
