//! Negate the binary operator under the cursor.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{token_range, SyntaxKind, SyntaxToken};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::RuleError;
use crate::rewrite;
use crate::rule::TokenRefactoring;
use crate::settings::RefactoringId;

pub(crate) struct NegateOperator;

fn negated(kind: SyntaxKind) -> Option<(SyntaxKind, &'static str)> {
    Some(match kind {
        SyntaxKind::EqEq => (SyntaxKind::BangEq, "!="),
        SyntaxKind::BangEq => (SyntaxKind::EqEq, "=="),
        SyntaxKind::Less => (SyntaxKind::GreaterEq, ">="),
        SyntaxKind::LessEq => (SyntaxKind::Greater, ">"),
        SyntaxKind::Greater => (SyntaxKind::LessEq, "<="),
        SyntaxKind::GreaterEq => (SyntaxKind::Less, "<"),
        SyntaxKind::AmpAmp => (SyntaxKind::PipePipe, "||"),
        SyntaxKind::PipePipe => (SyntaxKind::AmpAmp, "&&"),
        _ => return None,
    })
}

impl TokenRefactoring for NegateOperator {
    fn id(&self) -> RefactoringId {
        RefactoringId::NegateOperator
    }

    fn compute(
        &self,
        token: &SyntaxToken,
        _ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        let Some((new_kind, new_text)) = negated(token.kind()) else {
            return Ok(());
        };

        // The token must be the operator of a binary expression, not e.g.
        // the `<` of a type argument list.
        let is_operator = token
            .parent()
            .and_then(ast::BinaryExpression::cast)
            .and_then(|bin| bin.operator_token())
            .is_some_and(|op| op == *token);
        if !is_operator {
            return Ok(());
        }

        let range = token_range(token);
        let old_kind = token.kind();
        registry.register(RefactoringAction::new(
            self.id(),
            "Negate operator",
            Box::new(move |doc, _ct| {
                let token = rewrite::token_at_exact(doc, range, old_kind)?;
                Ok(rewrite::replace_token(doc, &token, new_kind, new_text))
            }),
        ));
        Ok(())
    }
}
