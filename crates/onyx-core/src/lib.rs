//! Shared leaf primitives for the Onyx refactoring engine.
//!
//! This crate intentionally has no knowledge of syntax trees or rules. It
//! provides the small vocabulary every other crate speaks:
//! - [`FileId`]: workspace file identity.
//! - [`LineIndex`] / [`Position`]: byte-offset ⇄ LSP (UTF-16) position mapping.
//! - [`CancellationToken`]: cooperative request cancellation.

mod cancel;
mod text;

pub use cancel::{Cancelled, CancellationToken};
pub use text::{LineIndex, Position};

use serde::{Deserialize, Serialize};

/// Identifier for a workspace file.
///
/// Hosts typically use a URI here; fixture tests use bare file names.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "lsp")]
impl From<Position> for lsp_types::Position {
    fn from(pos: Position) -> Self {
        lsp_types::Position {
            line: pos.line,
            character: pos.character,
        }
    }
}

#[cfg(feature = "lsp")]
impl From<lsp_types::Position> for Position {
    fn from(pos: lsp_types::Position) -> Self {
        Position {
            line: pos.line,
            character: pos.character,
        }
    }
}
