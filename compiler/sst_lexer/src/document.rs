//! Documents kept tokenized across edits.
//!
//! A [`Document`] owns the text of one template and its [`TokenList`].
//! Every edit splices the text and re-tokenizes incrementally, so the tokens
//! always describe the current text.
//!
//! [`SharedDocument`] puts a document behind an `Arc<RwLock<_>>` for
//! several editor views: edits take the write lock, while token reads and
//! scanner creation share the read lock. A scanner created through
//! [`SharedDocument::with_scanner`] therefore always starts from a restart
//! point that matches the text it scans.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use sst_lexer_core::{ScanState, SourceBuffer, TopScanner};
use tracing::debug;

use crate::incremental::{relex, IncrementalStats, TextChange};
use crate::{checked_len, lex_buffer, LexError, LexedToken, Span, TokenList};

/// A text edit: replace `span` of the current text with `new_text`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TextEdit {
    /// The span to replace (empty span for insert).
    pub span: Span,
    /// The new text to insert.
    pub new_text: String,
}

impl TextEdit {
    /// Create a replacement edit.
    pub fn replace(span: Span, new_text: impl Into<String>) -> Self {
        TextEdit {
            span,
            new_text: new_text.into(),
        }
    }

    /// Create an insertion edit at a specific position.
    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        TextEdit {
            span: Span::point(at),
            new_text: text.into(),
        }
    }

    /// Create a deletion edit.
    pub fn delete(span: Span) -> Self {
        TextEdit {
            span,
            new_text: String::new(),
        }
    }

    /// Get the length change this edit would cause.
    ///
    /// Positive = text grows, negative = text shrinks.
    pub fn length_delta(&self) -> i64 {
        let removed = i64::from(self.span.end) - i64::from(self.span.start);
        let added = i64::try_from(self.new_text.len()).unwrap_or(i64::MAX);
        added - removed
    }
}

/// A template document and its tokens.
#[derive(Clone, Debug)]
pub struct Document {
    buffer: SourceBuffer,
    tokens: TokenList,
    /// Incremented by every applied edit.
    version: u64,
}

impl Document {
    /// Create a document and tokenize it.
    pub fn new(text: impl Into<String>) -> Result<Self, LexError> {
        let text = text.into();
        checked_len(&text)?;
        let buffer = SourceBuffer::from_string(text);
        let tokens = lex_buffer(&buffer, 0, ScanState::INITIAL)?;
        Ok(Document {
            buffer,
            tokens,
            version: 0,
        })
    }

    /// The current text.
    #[inline]
    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    /// Length of the text in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.buffer.len()
    }

    /// Returns `true` if the document is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The tokens of the current text.
    #[inline]
    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Number of edits applied so far.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The token containing `offset`.
    pub fn token_at(&self, offset: u32) -> Option<&LexedToken> {
        self.tokens.token_at(offset)
    }

    /// A scanner over the current text, resumed at the token boundary at or
    /// before `offset`.
    pub fn scanner_from(&self, offset: u32) -> Result<TopScanner<'_>, LexError> {
        let len = self.len();
        if offset > len {
            return Err(LexError::OffsetOutOfBounds { offset, len });
        }
        let (start, state) = self.tokens.restart_point(offset);
        let cursor = self
            .buffer
            .cursor_at(start)
            .ok_or(LexError::NotCharBoundary { offset: start })?;
        Ok(TopScanner::resume(cursor, state))
    }

    /// Apply one edit and re-tokenize what it affects.
    ///
    /// On error the document is left unchanged.
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Result<IncrementalStats, LexError> {
        let change = self.validate(edit)?;
        let removed = self.text()[edit.span.to_range()].to_owned();
        self.buffer
            .replace_range(edit.span.start..edit.span.end, &edit.new_text);
        let (tokens, stats) = match relex(&self.tokens, &self.buffer, change) {
            Ok(relexed) => relexed,
            Err(err) => {
                // Put the old text back so it still matches the old tokens.
                if let Some(new_end) = change.new_end() {
                    self.buffer.replace_range(change.start..new_end, &removed);
                }
                return Err(err);
            }
        };
        self.tokens = tokens;
        self.version += 1;
        debug!(
            version = self.version,
            len = self.len(),
            reuse_rate = stats.reuse_rate(),
            "edit applied"
        );
        Ok(stats)
    }

    /// Apply edits in order, each against the text the previous one left.
    ///
    /// Stops at the first invalid edit; the edits before it stay applied.
    pub fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<IncrementalStats, LexError> {
        let mut total = IncrementalStats::default();
        for edit in edits {
            let stats = self.apply_edit(edit)?;
            total.reused_count += stats.reused_count;
            total.reparsed_count += stats.reparsed_count;
        }
        Ok(total)
    }

    fn validate(&self, edit: &TextEdit) -> Result<TextChange, LexError> {
        let len = self.len();
        let Span { start, end } = edit.span;
        if start > end || end > len {
            return Err(LexError::EditOutOfBounds { start, end, len });
        }
        for offset in [start, end] {
            if !self.buffer.is_char_boundary(offset) {
                return Err(LexError::NotCharBoundary { offset });
            }
        }
        let new_len = u32::try_from(edit.new_text.len()).map_err(|_| LexError::SourceTooLarge {
            len: edit.new_text.len(),
        })?;
        let total = u64::from(len - (end - start)) + u64::from(new_len);
        if total > u64::from(u32::MAX) {
            return Err(LexError::SourceTooLarge {
                len: usize::try_from(total).unwrap_or(usize::MAX),
            });
        }
        Ok(TextChange::new(start, end, new_len))
    }
}

/// A document shared between threads.
///
/// Cloning shares the same document.
#[derive(Clone, Debug)]
pub struct SharedDocument {
    inner: Arc<RwLock<Document>>,
}

impl SharedDocument {
    /// Share `document`.
    pub fn new(document: Document) -> Self {
        SharedDocument {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    /// Read access to the document. Edits wait until the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.inner.read()
    }

    /// Apply an edit under the write lock.
    pub fn edit(&self, edit: &TextEdit) -> Result<IncrementalStats, LexError> {
        self.inner.write().apply_edit(edit)
    }

    /// Apply several edits atomically with respect to readers.
    pub fn edit_all(&self, edits: &[TextEdit]) -> Result<IncrementalStats, LexError> {
        self.inner.write().apply_edits(edits)
    }

    /// A copy of the current tokens.
    pub fn tokens(&self) -> TokenList {
        self.inner.read().tokens().clone()
    }

    /// A copy of the current text.
    pub fn text(&self) -> String {
        self.inner.read().text().to_owned()
    }

    /// Current version of the document.
    pub fn version(&self) -> u64 {
        self.inner.read().version()
    }

    /// Run `f` with a scanner resumed at the token boundary at or before
    /// `offset`. The document cannot change while `f` runs.
    pub fn with_scanner<R>(
        &self,
        offset: u32,
        f: impl FnOnce(TopScanner<'_>) -> R,
    ) -> Result<R, LexError> {
        let document = self.inner.read();
        let scanner = document.scanner_from(offset)?;
        Ok(f(scanner))
    }
}

impl From<Document> for SharedDocument {
    fn from(document: Document) -> Self {
        SharedDocument::new(document)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
