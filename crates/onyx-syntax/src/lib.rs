//! Syntax tree and parsing primitives.
//!
//! This crate provides the lossless, immutable syntax tree every refactoring
//! is built on:
//! - [`parse`]: produces a full-fidelity rowan-based syntax tree for a
//!   C#-family compilation unit. The tree is persistent: replacing a subtree
//!   produces a new root that shares every unmodified subtree.
//! - [`parse_expression_fragment`] / [`parse_statement_fragment`] /
//!   [`parse_member_fragment`]: parse a snippet into a detached subtree.
//!   These are the building blocks rewrites use to construct replacements.
//!
//! The tree is lossless: every byte of the source, including whitespace,
//! line endings and comments, appears as a token, and
//! `parse(text).syntax().to_string() == text` always holds.

pub mod ast;
mod fragment;
mod language_level;
mod lexer;
mod parser;
mod syntax_kind;

pub use ast::{covering_node, AstNode};
pub use fragment::{
    parse_expression_fragment, parse_member_fragment, parse_statement_fragment, FragmentError,
};
pub use language_level::{CSharpLanguageLevel, Feature};
pub use lexer::{lex, lex_with_errors, LexError, Lexer, Token};
pub use parser::{parse, ParseResult, SyntaxElement, SyntaxNode, SyntaxToken};
pub use syntax_kind::{CSharpLanguage, SyntaxKind};

use serde::{Deserialize, Serialize};

/// A half-open byte range within a source file (`start..end`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// `other` lies entirely within `self` (boundaries included).
    #[inline]
    pub fn contains_range(self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[inline]
    pub fn contains_offset(self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl From<rowan::TextRange> for TextRange {
    fn from(range: rowan::TextRange) -> Self {
        Self {
            start: u32::from(range.start()),
            end: u32::from(range.end()),
        }
    }
}

impl From<TextRange> for rowan::TextRange {
    fn from(range: TextRange) -> Self {
        rowan::TextRange::new(range.start.into(), range.end.into())
    }
}

/// A single edit to a UTF-8 source buffer.
///
/// The edit uses byte offsets and applies `replacement` over `range` (half-open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(
            TextRange {
                start: offset,
                end: offset,
            },
            text,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// Byte range of a node in its own tree.
pub fn syntax_range(node: &SyntaxNode) -> TextRange {
    node.text_range().into()
}

/// Byte range of a token in its own tree.
pub fn token_range(token: &SyntaxToken) -> TextRange {
    token.text_range().into()
}

#[cfg(test)]
mod tests;
