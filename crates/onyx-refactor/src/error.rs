use onyx_core::Cancelled;
use onyx_syntax::{FragmentError, TextRange};
use thiserror::Error;

/// Failure of a single rule during dispatch.
///
/// `NotApplicable` is the narrow, documented, *expected* failure kind: a
/// speculative probe that did not pan out. Dispatch treats it as "no actions
/// from this rule". Any other variant is logged and isolated; it never
/// suppresses actions from other rules.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("refactoring is not applicable here")]
    NotApplicable,
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("rule failed: {0}")]
    Internal(String),
}

impl From<FragmentError> for RuleError {
    fn from(_: FragmentError) -> Self {
        // A fragment that does not parse is the documented speculative
        // failure kind, not an internal error.
        RuleError::NotApplicable
    }
}

/// Failure of a chosen action's deferred transform.
///
/// Apply-time failures surface to the host for that single action; the
/// original document snapshot is never touched.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("the action no longer applies to the current document")]
    Stale,
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("text edit {range:?} is outside the document (len={len})")]
    EditOutOfBounds { range: TextRange, len: usize },
    #[error("overlapping text edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },
}

/// Failure of a whole dispatch request.
///
/// The only way dispatch itself fails is cancellation; per-rule failures are
/// isolated and logged instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}
