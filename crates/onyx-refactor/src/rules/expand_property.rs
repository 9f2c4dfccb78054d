//! Expand an auto-property into a full property with a backing field.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{parse_member_fragment, syntax_range, SyntaxKind, SyntaxNode};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite::{self, GreenElement};
use crate::rule::Refactoring;
use crate::settings::RefactoringId;

pub(crate) struct ExpandProperty;

impl Refactoring for ExpandProperty {
    fn id(&self) -> RefactoringId {
        RefactoringId::ExpandProperty
    }

    fn can_apply(&self, node: &SyntaxNode, _ctx: &RefactoringContext<'_>) -> bool {
        let Some(property) = ast::PropertyDeclaration::cast(node.clone()) else {
            return false;
        };
        property.is_auto()
            && property.getter().is_some()
            && property.name_token().is_some()
            && property.property_type().is_some()
            && node
                .parent()
                .is_some_and(|parent| parent.kind().is_type_declaration())
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
            "Expand property",
            Box::new(move |doc, _ct| {
                let member = rewrite::node_at_exact(doc, range, SyntaxKind::PropertyDeclaration)?;
                let property =
                    ast::PropertyDeclaration::cast(member.clone()).ok_or(ApplyError::Stale)?;

                let name = property.name_token().ok_or(ApplyError::Stale)?;
                let ty = property.property_type().ok_or(ApplyError::Stale)?;
                let accessors = property.accessor_list().ok_or(ApplyError::Stale)?;
                let field = backing_field_name(name.text());
                let has_setter = property.setter().is_some();
                let indent = rewrite::indent_of(&member);

                let field_text = format!("private {} {field};", ty.text());

                let member_start = member.text_range().start();
                let list_start = accessors.syntax().text_range().start();
                let member_text = member.to_string();
                let prefix_len = usize::from(list_start - member_start);
                let prefix = member_text[..prefix_len].trim_end();

                let mut body = format!("{prefix}\n{indent}{{\n{indent}    get {{ return {field}; }}");
                if has_setter {
                    body.push_str(&format!("\n{indent}    set {{ {field} = value; }}"));
                }
                body.push_str(&format!("\n{indent}}}"));

                let field_node = parse_member_fragment(&field_text)?;
                let property_node = parse_member_fragment(&body)?;

                let parent = member.parent().ok_or(ApplyError::Stale)?;
                let index = member.index();
                let elements: Vec<GreenElement> = vec![
                    rewrite::node_element(&field_node),
                    rewrite::token_element(SyntaxKind::Newline, "\n"),
                    rewrite::token_element(SyntaxKind::Newline, "\n"),
                    rewrite::token_element(SyntaxKind::Whitespace, &indent),
                    rewrite::node_element(&property_node),
                ];

                Ok(rewrite::splice_children(
                    doc,
                    &parent,
                    index..index + 1,
                    elements,
                ))
            }),
        ));
        Ok(())
    }
}

fn backing_field_name(property_name: &str) -> String {
    let mut chars = property_name.chars();
    match chars.next() {
        Some(first) => format!("_{}{}", first.to_lowercase(), chars.as_str()),
        None => "_value".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_field_names() {
        assert_eq!(backing_field_name("Count"), "_count");
        assert_eq!(backing_field_name("X"), "_x");
        assert_eq!(backing_field_name("alreadyLower"), "_alreadyLower");
    }
}
