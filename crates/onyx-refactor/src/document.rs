//! Immutable document snapshots.

use onyx_core::FileId;
use onyx_syntax::{parse, ParseError, ParseResult, SyntaxNode, TextRange};

/// An immutable snapshot of one source file.
///
/// A `Document` is never mutated: every successful transform produces a
/// successor snapshot via [`Document::with_root`] or [`Document::with_text`],
/// which the host swaps in atomically. A failed transform leaves the
/// original snapshot untouched.
#[derive(Debug, Clone)]
pub struct Document {
    file: FileId,
    parse: ParseResult,
    supports_semantic_model: bool,
    reformat: Vec<TextRange>,
}

impl Document {
    pub fn new(file: FileId, text: &str) -> Self {
        Self {
            file,
            parse: parse(text),
            supports_semantic_model: true,
            reformat: Vec::new(),
        }
    }

    /// Mark the document as lacking semantic-query support.
    ///
    /// Dispatch skips rules that require a semantic model for such documents
    /// (graceful degradation, not failure).
    pub fn without_semantic_model(mut self) -> Self {
        self.supports_semantic_model = false;
        self
    }

    pub fn file(&self) -> &FileId {
        &self.file
    }

    pub fn root(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    pub fn text(&self) -> String {
        self.root().to_string()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.parse.errors
    }

    pub fn supports_semantic_model(&self) -> bool {
        self.supports_semantic_model
    }

    /// Ranges tagged "needs reformatting" for the external formatting
    /// service. Transforms that intentionally change formatting tag their
    /// replacement here instead of hand-formatting the result.
    pub fn reformat_ranges(&self) -> &[TextRange] {
        &self.reformat
    }

    /// Successor snapshot with a new syntax tree root.
    ///
    /// The green tree is taken as-is, preserving structural sharing with
    /// this snapshot's tree.
    pub fn with_root(&self, root: SyntaxNode) -> Document {
        debug_assert!(root.parent().is_none(), "with_root expects a tree root");
        Document {
            file: self.file.clone(),
            parse: ParseResult {
                green: root.green().into_owned(),
                errors: Vec::new(),
            },
            supports_semantic_model: self.supports_semantic_model,
            reformat: Vec::new(),
        }
    }

    /// Successor snapshot reparsed from new text.
    pub fn with_text(&self, text: &str) -> Document {
        Document {
            file: self.file.clone(),
            parse: parse(text),
            supports_semantic_model: self.supports_semantic_model,
            reformat: Vec::new(),
        }
    }

    /// Tag a range of the (new) document for the external formatter.
    pub fn with_reformat(mut self, range: TextRange) -> Document {
        self.reformat.push(range);
        self
    }
}
