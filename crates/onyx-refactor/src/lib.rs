//! Refactoring engine for Onyx.
//!
//! Given an immutable [`Document`] snapshot and the user's cursor/selection,
//! [`compute_refactorings`] determines which rewrite rules apply and returns
//! titled, lazily-computed actions. A chosen action runs through
//! [`rewrite::execute`], producing a successor snapshot; everything the rule
//! did not intend to change (whitespace, comments, layout) survives the
//! rewrite untouched.
//!
//! The crate is organised around a small set of seams:
//! - [`dispatch`]: the per-request engine: trivia, token and node passes,
//!   with per-category dedup over a single ancestor walk.
//! - [`Refactoring`] (and its token/trivia variants): the contract every
//!   rule plugs into.
//! - [`SemanticModel`]: the oracle for type/symbol questions, memoized per
//!   request.
//! - [`rewrite`]: tree-editing primitives and the trivia-preservation
//!   contract.

mod action;
mod context;
mod dispatch;
mod document;
mod error;
pub mod lsp;
mod preview;
pub mod rewrite;
mod rule;
mod rules;
mod semantics;
mod settings;

pub use action::{ActionRegistry, ApplyFn, RefactoringAction};
pub use context::RefactoringContext;
pub use dispatch::{compute_refactorings, RuleCategory};
pub use document::Document;
pub use error::{ApplyError, DispatchError, RuleError};
pub use preview::preview_action;
pub use rewrite::execute;
pub use rule::{Refactoring, TokenRefactoring, TriviaRefactoring};
pub use semantics::{DocumentSemanticModel, SemanticModel, SymbolInfo, SymbolKind, TypeInfo};
pub use settings::{RefactoringId, RefactoringSettings};

pub use onyx_core::{CancellationToken, Cancelled, FileId};
pub use onyx_syntax::{CSharpLanguageLevel, Feature, TextEdit, TextRange};
