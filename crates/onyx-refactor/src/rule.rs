//! The contract every refactoring rule plugs into.

use onyx_syntax::{SyntaxNode, SyntaxToken};

use crate::action::ActionRegistry;
use crate::context::RefactoringContext;
use crate::error::RuleError;
use crate::settings::RefactoringId;

/// A node-dispatched refactoring rule.
///
/// Rules are stateless unit structs; many coexist permanently as static
/// dispatch targets. `can_apply` must be pure and side-effect-free: it is
/// called speculatively and often, and calling it twice with the same
/// (node, context) yields the same result. `compute` registers zero or more
/// titled deferred transforms; the transforms themselves do not run during
/// dispatch.
pub trait Refactoring: Send + Sync {
    fn id(&self) -> RefactoringId;

    /// Rules that query the semantic model are skipped entirely for
    /// documents that do not support semantic queries.
    fn needs_semantic_model(&self) -> bool {
        false
    }

    fn can_apply(&self, node: &SyntaxNode, ctx: &RefactoringContext<'_>) -> bool;

    fn compute(
        &self,
        node: &SyntaxNode,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError>;
}

/// A token-dispatched rule: runs on the token at the cursor, no ancestor
/// walk.
pub trait TokenRefactoring: Send + Sync {
    fn id(&self) -> RefactoringId;

    fn compute(
        &self,
        token: &SyntaxToken,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError>;
}

/// A trivia-dispatched rule: runs on the trivia token at the cursor, no
/// ancestor walk.
pub trait TriviaRefactoring: Send + Sync {
    fn id(&self) -> RefactoringId;

    fn compute(
        &self,
        trivia: &SyntaxToken,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError>;
}
