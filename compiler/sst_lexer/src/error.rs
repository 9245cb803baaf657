//! Errors reported to the host.
//!
//! Tokenization itself never fails. These errors come from offsets and
//! edits supplied by the host that do not fit the document.

use thiserror::Error;

/// Error from a host-facing lexing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// The document does not fit in `u32` byte offsets.
    #[error("source of {len} bytes exceeds the {} byte limit", u32::MAX)]
    SourceTooLarge { len: usize },

    /// A resume offset lies past the end of the document.
    #[error("offset {offset} is past the end of a {len} byte document")]
    OffsetOutOfBounds { offset: u32, len: u32 },

    /// An offset falls inside a multi-byte UTF-8 character.
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: u32 },

    /// An edit range is reversed or reaches past the end of the document.
    #[error("edit {start}..{end} is out of bounds for a {len} byte document")]
    EditOutOfBounds { start: u32, end: u32, len: u32 },
}
