//! Per-request context shared by every rule.

use once_cell::unsync::OnceCell;
use onyx_core::CancellationToken;
use onyx_syntax::{SyntaxNode, TextRange};

use crate::document::Document;
use crate::semantics::{DocumentSemanticModel, SemanticModel};
use crate::settings::{RefactoringId, RefactoringSettings};

/// Everything a rule may consult while deciding applicability.
///
/// Created once per user-triggered request and discarded afterwards. The
/// semantic model is memoized: computed at most once per request and reused
/// by every rule in the same request. There is no state shared across
/// requests.
pub struct RefactoringContext<'a> {
    document: &'a Document,
    root: SyntaxNode,
    span: TextRange,
    settings: &'a RefactoringSettings,
    cancellation: CancellationToken,
    semantic_model: OnceCell<Option<DocumentSemanticModel>>,
}

impl<'a> RefactoringContext<'a> {
    pub fn new(
        document: &'a Document,
        span: TextRange,
        settings: &'a RefactoringSettings,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            document,
            root: document.root(),
            span,
            settings,
            cancellation,
            semantic_model: OnceCell::new(),
        }
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// The request span: the user's cursor position (empty) or selection.
    pub fn span(&self) -> TextRange {
        self.span
    }

    pub fn settings(&self) -> &RefactoringSettings {
        self.settings
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_enabled(&self, id: RefactoringId) -> bool {
        self.settings.is_enabled(id)
    }

    /// The memoized semantic model, or `None` when the document does not
    /// support semantic queries.
    pub fn semantic_model(&self) -> Option<&dyn SemanticModel> {
        self.semantic_model
            .get_or_init(|| {
                if self.document.supports_semantic_model() {
                    Some(DocumentSemanticModel::new(self.root.clone()))
                } else {
                    None
                }
            })
            .as_ref()
            .map(|model| model as &dyn SemanticModel)
    }
}
