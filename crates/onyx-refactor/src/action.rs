//! Registered actions: titled, lazily-computed document transforms.

use onyx_core::CancellationToken;

use crate::document::Document;
use crate::error::ApplyError;
use crate::settings::RefactoringId;

/// The deferred transform of a registered action.
///
/// Nothing is rewritten at dispatch time: the user picks at most one action,
/// so each transform runs only when its action is chosen. The closure
/// receives the snapshot it was registered against and must be deterministic
/// for the same snapshot.
pub type ApplyFn =
    Box<dyn Fn(&Document, &CancellationToken) -> Result<Document, ApplyError> + Send + Sync>;

/// A user-selectable refactoring action.
pub struct RefactoringAction {
    id: RefactoringId,
    title: String,
    equivalence_key: Option<String>,
    apply: ApplyFn,
}

impl RefactoringAction {
    pub fn new(
        id: RefactoringId,
        title: impl Into<String>,
        apply: ApplyFn,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            equivalence_key: Some(id.as_str().to_string()),
            apply,
        }
    }

    pub fn with_equivalence_key(mut self, key: impl Into<String>) -> Self {
        self.equivalence_key = Some(key.into());
        self
    }

    pub fn id(&self) -> RefactoringId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn equivalence_key(&self) -> Option<&str> {
        self.equivalence_key.as_deref()
    }

    pub(crate) fn apply(
        &self,
        document: &Document,
        cancellation: &CancellationToken,
    ) -> Result<Document, ApplyError> {
        (self.apply)(document, cancellation)
    }
}

impl std::fmt::Debug for RefactoringAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefactoringAction")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("equivalence_key", &self.equivalence_key)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of the actions registered during one request.
///
/// Registration order is the order actions are presented to the host:
/// trivia pass, then token pass, then the node pass in ancestor order, rules
/// within a category in table order.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<RefactoringAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: RefactoringAction) {
        tracing::debug!(id = %action.id(), title = action.title(), "registering refactoring");
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_actions(self) -> Vec<RefactoringAction> {
        self.actions
    }
}
