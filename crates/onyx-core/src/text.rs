//! Byte-offset ⇄ LSP position mapping.

/// LSP-compatible position (UTF-16 code units).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text_len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            text_len: text.len(),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    fn line_range(&self, line: u32) -> Option<(usize, usize)> {
        let start = *self.line_starts.get(line as usize)?;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|s| s - 1)
            .unwrap_or(self.text_len);
        Some((start, end))
    }

    /// Convert an LSP (UTF-16) position into a byte offset.
    ///
    /// `text` must be the same snapshot used to construct this [`LineIndex`].
    /// Returns `None` for out-of-bounds lines or columns; this keeps host
    /// requests with stale positions deterministic instead of panicking.
    pub fn offset(&self, text: &str, pos: Position) -> Option<usize> {
        let (start, end) = self.line_range(pos.line)?;
        let line_text = &text[start..end];

        let mut utf16_col = 0u32;
        if utf16_col == pos.character {
            return Some(start);
        }
        for (i, ch) in line_text.char_indices() {
            utf16_col += ch.len_utf16() as u32;
            if utf16_col == pos.character {
                return Some(start + i + ch.len_utf8());
            }
            if utf16_col > pos.character {
                // The position points into the middle of a surrogate pair.
                return None;
            }
        }
        None
    }

    /// Convert a byte offset into an LSP (UTF-16) position.
    ///
    /// Offsets past the end of the text are clamped to EOF.
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert - 1,
        };
        let line_start = self.line_starts[line];
        let character: usize = text[line_start..offset].chars().map(char::len_utf16).sum();
        Position::new(line as u32, character as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_ascii() {
        let text = "class C {\n  void M() {}\n}\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);

        let offset = text.find("void").unwrap();
        let pos = index.position(text, offset);
        assert_eq!(pos, Position::new(1, 2));
        assert_eq!(index.offset(text, pos), Some(offset));
    }

    #[test]
    fn handles_non_bmp_chars() {
        // 😀 is one UTF-16 surrogate pair (2 code units, 4 bytes in UTF-8).
        let text = "a😀b";
        let index = LineIndex::new(text);

        assert_eq!(index.offset(text, Position::new(0, 3)), Some(5));
        assert_eq!(index.position(text, 5), Position::new(0, 3));
        // A position inside the surrogate pair is rejected.
        assert_eq!(index.offset(text, Position::new(0, 2)), None);
    }

    #[test]
    fn out_of_bounds_positions_are_rejected() {
        let text = "class C {}\n";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(text, Position::new(10, 0)), None);
        assert_eq!(index.offset(text, Position::new(0, 10_000)), None);
    }

    #[test]
    fn eof_position() {
        let text = "x";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(text, Position::new(0, 1)), Some(1));
        assert_eq!(index.position(text, 99), Position::new(0, 1));
    }
}
