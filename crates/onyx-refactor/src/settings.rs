//! Per-host refactoring settings.

use std::collections::HashSet;

use onyx_syntax::CSharpLanguageLevel;
use serde::{Deserialize, Serialize};

/// Stable identifier for each refactoring rule.
///
/// The string form is the identifier hosts use to enable/disable rules and
/// the default equivalence key for registered actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefactoringId {
    Uncomment,
    RemoveComment,
    RemoveAllComments,
    NegateOperator,
    AddParameterNullCheck,
    ExpandExpressionBody,
    UseExpressionBody,
    ExpandProperty,
    ConvertSwitchToIf,
    InvertIf,
    AddBraces,
    RemoveBraces,
    SwapBinaryOperands,
    ParenthesizeExpression,
}

impl RefactoringId {
    pub const ALL: &'static [RefactoringId] = &[
        RefactoringId::Uncomment,
        RefactoringId::RemoveComment,
        RefactoringId::RemoveAllComments,
        RefactoringId::NegateOperator,
        RefactoringId::AddParameterNullCheck,
        RefactoringId::ExpandExpressionBody,
        RefactoringId::UseExpressionBody,
        RefactoringId::ExpandProperty,
        RefactoringId::ConvertSwitchToIf,
        RefactoringId::InvertIf,
        RefactoringId::AddBraces,
        RefactoringId::RemoveBraces,
        RefactoringId::SwapBinaryOperands,
        RefactoringId::ParenthesizeExpression,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RefactoringId::Uncomment => "onyx.uncomment",
            RefactoringId::RemoveComment => "onyx.removeComment",
            RefactoringId::RemoveAllComments => "onyx.removeAllComments",
            RefactoringId::NegateOperator => "onyx.negateOperator",
            RefactoringId::AddParameterNullCheck => "onyx.addParameterNullCheck",
            RefactoringId::ExpandExpressionBody => "onyx.expandExpressionBody",
            RefactoringId::UseExpressionBody => "onyx.useExpressionBody",
            RefactoringId::ExpandProperty => "onyx.expandProperty",
            RefactoringId::ConvertSwitchToIf => "onyx.convertSwitchToIf",
            RefactoringId::InvertIf => "onyx.invertIf",
            RefactoringId::AddBraces => "onyx.addBraces",
            RefactoringId::RemoveBraces => "onyx.removeBraces",
            RefactoringId::SwapBinaryOperands => "onyx.swapBinaryOperands",
            RefactoringId::ParenthesizeExpression => "onyx.parenthesizeExpression",
        }
    }
}

impl std::fmt::Display for RefactoringId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-configurable knobs consulted during dispatch.
///
/// Every rule group checks `is_enabled` before firing; disabled rules never
/// run, not even their predicates.
#[derive(Debug, Clone, Default)]
pub struct RefactoringSettings {
    disabled: HashSet<RefactoringId>,
    pub language_level: CSharpLanguageLevel,
}

impl RefactoringSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language_level(language_level: CSharpLanguageLevel) -> Self {
        Self {
            disabled: HashSet::new(),
            language_level,
        }
    }

    pub fn disable(&mut self, id: RefactoringId) {
        self.disabled.insert(id);
    }

    pub fn enable(&mut self, id: RefactoringId) {
        self.disabled.remove(&id);
    }

    pub fn is_enabled(&self, id: RefactoringId) -> bool {
        !self.disabled.contains(&id)
    }
}
