//! Owned document text for the top-level scanner.
//!
//! The buffer owns the text of one template document and hands out
//! [`Cursor`]s over it, either at the start of the document or at a resume
//! offset recorded by an earlier scan. Offsets are byte offsets and must sit
//! on UTF-8 character boundaries. Every token boundary the scanner produces
//! does, because all delimiters and variable characters are ASCII.
//!
//! # File Size
//!
//! Positions are `u32`. Documents larger than `u32::MAX` bytes (~4 GiB) are
//! accepted, but [`len()`](SourceBuffer::len) saturates at `u32::MAX` and
//! the scanner stops there. The integration layer (`sst_lexer`) rejects
//! oversized documents before scanning.

use std::ops::Range;

use crate::Cursor;

/// Owned source text for one template document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    /// Length of the text, saturated to `u32::MAX`.
    source_len: u32,
}

impl SourceBuffer {
    /// Create a buffer holding a copy of `source`.
    pub fn new(source: &str) -> Self {
        Self::from_string(source.to_owned())
    }

    /// Create a buffer taking ownership of `text`.
    pub fn from_string(text: String) -> Self {
        let source_len = saturating_len(text.len());
        Self { text, source_len }
    }

    /// The document text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the document in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Returns `true` if `offset` can start a scan: it lies within the
    /// document (the end offset included) on a character boundary.
    pub fn is_char_boundary(&self, offset: u32) -> bool {
        offset <= self.source_len && self.text.is_char_boundary(offset as usize)
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.text, self.source_len, 0)
    }

    /// Create a [`Cursor`] positioned at `offset`.
    ///
    /// Returns `None` if `offset` is past the end of the document or inside
    /// a multi-byte character.
    pub fn cursor_at(&self, offset: u32) -> Option<Cursor<'_>> {
        if self.is_char_boundary(offset) {
            Some(Cursor::new(&self.text, self.source_len, offset))
        } else {
            None
        }
    }

    /// Replace the bytes in `range` with `replacement`.
    ///
    /// # Contract
    ///
    /// Both ends of `range` must satisfy [`is_char_boundary`](Self::is_char_boundary)
    /// and `range.start <= range.end`. Callers validate edits first; the
    /// integration layer reports violations as errors.
    pub fn replace_range(&mut self, range: Range<u32>, replacement: &str) {
        debug_assert!(
            range.start <= range.end,
            "edit start {} exceeds end {}",
            range.start,
            range.end
        );
        debug_assert!(
            self.is_char_boundary(range.start) && self.is_char_boundary(range.end),
            "edit {range:?} does not fall on character boundaries"
        );
        self.text
            .replace_range(range.start as usize..range.end as usize, replacement);
        self.source_len = saturating_len(self.text.len());
    }
}

impl From<String> for SourceBuffer {
    fn from(text: String) -> Self {
        Self::from_string(text)
    }
}

/// Saturate a byte length to `u32::MAX` for documents larger than 4 GiB.
fn saturating_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
