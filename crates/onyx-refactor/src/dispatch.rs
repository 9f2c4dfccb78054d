//! The dispatch engine.
//!
//! One call per user gesture: locate what is under the request span, walk
//! the ancestor chain exactly once, and collect the actions of every
//! applicable rule. Three passes run in presentation order:
//!
//! 1. **Trivia pass**: the trivia token at the cursor, comment rules only.
//! 2. **Token pass**: the token containing the span, operator rules only.
//!    Neither shallow pass walks ancestors.
//! 3. **Node pass**: the innermost covering node, then its ancestors,
//!    outward to the root, once. Each [`RuleCategory`] fires at most once
//!    per request: when a node and a more general ancestor share a
//!    category, only the nearest match fires.
//!
//! Rule failures are isolated: a failing rule is logged and never
//! suppresses actions from other rules. Cancellation aborts the whole
//! request with no partial effects.

use onyx_core::CancellationToken;
use onyx_syntax::ast::covering_node;
use onyx_syntax::{SyntaxKind, SyntaxNode, SyntaxToken, TextRange};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::document::Document;
use crate::error::{DispatchError, RuleError};
use crate::rule::{Refactoring, TokenRefactoring, TriviaRefactoring};
use crate::rules;
use crate::settings::RefactoringSettings;
use onyx_syntax::token_range;

/// Syntactic categories node rules dispatch on.
///
/// A closed set: the static [`NODE_RULES`] table maps each category to its
/// rules in a fixed order, which is also the order actions appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum RuleCategory {
    Parameter,
    ArrowClause,
    Property,
    MemberDeclaration,
    Expression,
    BinaryExpression,
    SwitchStatement,
    IfStatement,
    Statement,
}

impl RuleCategory {
    pub(crate) const COUNT: usize = 9;

    /// The categories a node of `kind` belongs to, in firing order.
    ///
    /// Expressions fire the general `Expression` category before the
    /// specific kind; statements fire the specific kind first and the
    /// general `Statement` category last. Both orders are deliberate; they
    /// reproduce the intended UI action ordering.
    pub(crate) fn of(kind: SyntaxKind) -> &'static [RuleCategory] {
        match kind {
            SyntaxKind::Parameter => &[RuleCategory::Parameter],
            SyntaxKind::ArrowExpressionClause => &[RuleCategory::ArrowClause],
            SyntaxKind::PropertyDeclaration => {
                &[RuleCategory::Property, RuleCategory::MemberDeclaration]
            }
            SyntaxKind::BinaryExpression => {
                &[RuleCategory::Expression, RuleCategory::BinaryExpression]
            }
            SyntaxKind::SwitchStatement => {
                &[RuleCategory::SwitchStatement, RuleCategory::Statement]
            }
            SyntaxKind::IfStatement => &[RuleCategory::IfStatement, RuleCategory::Statement],
            kind if kind.is_member_declaration() => &[RuleCategory::MemberDeclaration],
            kind if kind.is_expression() => &[RuleCategory::Expression],
            kind if kind.is_statement() => &[RuleCategory::Statement],
            _ => &[],
        }
    }
}

/// Category → ordered rule list. Table order within a category is the
/// presentation order of the resulting actions.
static NODE_RULES: &[(RuleCategory, &[&dyn Refactoring])] = &[
    (RuleCategory::Parameter, &[&rules::AddParameterNullCheck]),
    (RuleCategory::ArrowClause, &[&rules::ExpandExpressionBody]),
    (RuleCategory::Property, &[&rules::ExpandProperty]),
    (
        RuleCategory::MemberDeclaration,
        &[&rules::UseExpressionBody],
    ),
    (
        RuleCategory::Expression,
        &[&rules::ParenthesizeExpression],
    ),
    (
        RuleCategory::BinaryExpression,
        &[&rules::SwapBinaryOperands],
    ),
    (RuleCategory::SwitchStatement, &[&rules::ConvertSwitchToIf]),
    (RuleCategory::IfStatement, &[&rules::InvertIf]),
    (
        RuleCategory::Statement,
        &[&rules::AddBraces, &rules::RemoveBraces],
    ),
];

static TOKEN_RULES: &[&dyn TokenRefactoring] = &[&rules::NegateOperator];

static TRIVIA_RULES: &[&dyn TriviaRefactoring] = &[
    &rules::Uncomment,
    &rules::RemoveComment,
    &rules::RemoveAllComments,
];

/// Compute the refactorings available at `span`.
///
/// Exactly one call per user gesture. Returns the registered actions in
/// presentation order; an empty list (never an error) when nothing applies.
pub fn compute_refactorings(
    document: &Document,
    span: TextRange,
    settings: &RefactoringSettings,
    cancellation: &CancellationToken,
) -> Result<Vec<RefactoringAction>, DispatchError> {
    let ctx = RefactoringContext::new(document, span, settings, cancellation.clone());
    let mut registry = ActionRegistry::new();

    compute_for_trivia(&ctx, &mut registry)?;
    compute_for_token(&ctx, &mut registry)?;
    compute_for_node(&ctx, &mut registry)?;

    Ok(registry.into_actions())
}

fn compute_for_trivia(
    ctx: &RefactoringContext<'_>,
    registry: &mut ActionRegistry,
) -> Result<(), DispatchError> {
    let Some(trivia) = token_at(ctx.root(), ctx.span().start, true) else {
        return Ok(());
    };
    if !token_range(&trivia).contains_range(ctx.span()) {
        return Ok(());
    }

    for rule in TRIVIA_RULES {
        ctx.cancellation().check()?;
        if !ctx.is_enabled(rule.id()) {
            continue;
        }
        isolate(rule.id().as_str(), rule.compute(&trivia, ctx, registry))?;
    }
    Ok(())
}

fn compute_for_token(
    ctx: &RefactoringContext<'_>,
    registry: &mut ActionRegistry,
) -> Result<(), DispatchError> {
    let Some(token) = token_at(ctx.root(), ctx.span().start, false) else {
        return Ok(());
    };
    if !token_range(&token).contains_range(ctx.span()) {
        return Ok(());
    }

    for rule in TOKEN_RULES {
        ctx.cancellation().check()?;
        if !ctx.is_enabled(rule.id()) {
            continue;
        }
        isolate(rule.id().as_str(), rule.compute(&token, ctx, registry))?;
    }
    Ok(())
}

fn compute_for_node(
    ctx: &RefactoringContext<'_>,
    registry: &mut ActionRegistry,
) -> Result<(), DispatchError> {
    let node = covering_node(ctx.root(), ctx.span());

    let mut visited = [false; RuleCategory::COUNT];
    for ancestor in node.ancestors() {
        ctx.cancellation().check()?;
        for &category in RuleCategory::of(ancestor.kind()) {
            if visited[category as usize] {
                continue;
            }
            visited[category as usize] = true;
            run_category(rules_for(category), &ancestor, ctx, registry)?;
        }
    }
    Ok(())
}

fn rules_for(category: RuleCategory) -> &'static [&'static dyn Refactoring] {
    NODE_RULES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, rules)| *rules)
        .unwrap_or(&[])
}

fn run_category(
    rules: &[&dyn Refactoring],
    node: &SyntaxNode,
    ctx: &RefactoringContext<'_>,
    registry: &mut ActionRegistry,
) -> Result<(), DispatchError> {
    for rule in rules {
        ctx.cancellation().check()?;
        if !ctx.is_enabled(rule.id()) {
            continue;
        }
        if rule.needs_semantic_model() && ctx.semantic_model().is_none() {
            // Graceful degradation: semantic rules never run against a
            // document that cannot answer semantic queries.
            continue;
        }
        isolate(rule.id().as_str(), rule.compute(node, ctx, registry))?;
    }
    Ok(())
}

/// Per-rule failure isolation. `NotApplicable` is the expected, silent
/// outcome; cancellation aborts the request; anything else is logged and
/// swallowed so one faulty rule cannot suppress the others.
fn isolate(rule: &str, result: Result<(), RuleError>) -> Result<(), DispatchError> {
    match result {
        Ok(()) | Err(RuleError::NotApplicable) => Ok(()),
        Err(RuleError::Cancelled(cancelled)) => Err(DispatchError::Cancelled(cancelled)),
        Err(err) => {
            tracing::warn!(rule, error = %err, "refactoring rule failed; skipping it");
            Ok(())
        }
    }
}

/// The token at `offset`, biased right on exact boundaries.
///
/// With `want_trivia` the trivia token at the position is returned (if the
/// position is inside trivia); otherwise trivia is skipped in favor of an
/// adjacent non-trivia token.
fn token_at(root: &SyntaxNode, offset: u32, want_trivia: bool) -> Option<SyntaxToken> {
    let pick = |token: SyntaxToken| {
        if token.kind().is_trivia() == want_trivia {
            Some(token)
        } else {
            None
        }
    };
    match root.token_at_offset(text_size::TextSize::from(offset)) {
        rowan::TokenAtOffset::None => None,
        rowan::TokenAtOffset::Single(tok) => pick(tok),
        rowan::TokenAtOffset::Between(left, right) => pick(right).or_else(|| pick(left)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::settings::RefactoringId;
    use onyx_core::FileId;

    /// A rule that always fails, for exercising failure isolation.
    struct FaultyRule;

    impl Refactoring for FaultyRule {
        fn id(&self) -> RefactoringId {
            RefactoringId::ParenthesizeExpression
        }

        fn can_apply(&self, _: &SyntaxNode, _: &RefactoringContext<'_>) -> bool {
            true
        }

        fn compute(
            &self,
            _: &SyntaxNode,
            _: &RefactoringContext<'_>,
            _: &mut ActionRegistry,
        ) -> Result<(), RuleError> {
            Err(RuleError::Internal("boom".to_string()))
        }
    }

    /// A rule that always registers one action.
    struct OkRule;

    impl Refactoring for OkRule {
        fn id(&self) -> RefactoringId {
            RefactoringId::SwapBinaryOperands
        }

        fn can_apply(&self, _: &SyntaxNode, _: &RefactoringContext<'_>) -> bool {
            true
        }

        fn compute(
            &self,
            _: &SyntaxNode,
            _: &RefactoringContext<'_>,
            registry: &mut ActionRegistry,
        ) -> Result<(), RuleError> {
            registry.register(RefactoringAction::new(
                self.id(),
                "ok",
                Box::new(|doc, _| Ok(doc.clone())),
            ));
            Ok(())
        }
    }

    #[test]
    fn rule_failure_does_not_suppress_other_rules() {
        let document = Document::new(FileId::new("Test.cs"), "class C { }");
        let settings = RefactoringSettings::new();
        let ctx = RefactoringContext::new(
            &document,
            TextRange::new(0, 0),
            &settings,
            CancellationToken::new(),
        );
        let mut registry = ActionRegistry::new();

        let rules: &[&dyn Refactoring] = &[&FaultyRule, &OkRule];
        run_category(rules, &document.root(), &ctx, &mut registry).unwrap();

        let actions = registry.into_actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title(), "ok");
    }

    #[test]
    fn cancellation_aborts_dispatch() {
        let document = Document::new(FileId::new("Test.cs"), "class C { void M() { x(); } }");
        let settings = RefactoringSettings::new();
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        let result = compute_refactorings(
            &document,
            TextRange::new(0, 0),
            &settings,
            &cancellation,
        );
        assert!(matches!(result, Err(DispatchError::Cancelled(_))));
    }
}
