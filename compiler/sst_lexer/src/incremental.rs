//! Incremental Re-tokenization
//!
//! After an edit, only the tokens the edit can influence are scanned again.
//!
//! # Architecture
//!
//! 1. **Text Change** - the edit as a byte range of the old text and the
//!    length of its replacement.
//! 2. **Restart** - the first token whose scan examined a byte at or after
//!    the edit start (its span plus lookahead) is the first one that can
//!    change. Scanning restarts at its start, in the state recorded there.
//! 3. **Resync** - once the new scan is past the edited region and lands on
//!    a boundary that was also an old token boundary with an equal
//!    `ScanState`, the rest of the old tokens are reused with shifted
//!    spans. The scanner only depends on its position, its state and the
//!    text from there on, so they are exactly what a full scan would give.

use sst_lexer_core::SourceBuffer;
use tracing::debug;

use crate::token_list::scan_tokens;
use crate::{LexError, LexedToken, Span, TokenList};

/// A single text edit: the region `[start, old_end)` of the old text is
/// replaced with `new_len` bytes.
///
/// # Examples
///
/// ```
/// use sst_lexer::TextChange;
///
/// // Insert "hello" at position 10
/// let insert = TextChange::insert(10, 5);
/// assert_eq!(insert.delta(), 5);
///
/// // Delete 3 bytes starting at position 5
/// let delete = TextChange::delete(5, 3);
/// assert_eq!(delete.delta(), -3);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TextChange {
    /// Start byte offset in old text.
    pub start: u32,
    /// End byte offset in old text (exclusive).
    pub old_end: u32,
    /// Length of replacement text in bytes.
    pub new_len: u32,
}

impl TextChange {
    /// Create a new text change.
    #[inline]
    pub const fn new(start: u32, old_end: u32, new_len: u32) -> Self {
        TextChange {
            start,
            old_end,
            new_len,
        }
    }

    /// Create an insertion (no bytes removed).
    #[inline]
    pub const fn insert(at: u32, len: u32) -> Self {
        TextChange::new(at, at, len)
    }

    /// Create a deletion (no bytes inserted).
    ///
    /// The end saturates at `u32::MAX`; [`relex`] rejects a change that
    /// runs past the document.
    #[inline]
    pub const fn delete(start: u32, len: u32) -> Self {
        TextChange::new(start, start.saturating_add(len), 0)
    }

    /// Create a replacement. The old end saturates like [`delete`](Self::delete).
    #[inline]
    pub const fn replace(start: u32, old_len: u32, new_len: u32) -> Self {
        TextChange::new(start, start.saturating_add(old_len), new_len)
    }

    /// Net change in document length (positive = grew, negative = shrank).
    #[inline]
    pub fn delta(&self) -> i64 {
        i64::from(self.new_len) - i64::from(self.old_len())
    }

    /// Length of the removed region in the old text. Zero for an inverted
    /// range.
    #[inline]
    pub const fn old_len(&self) -> u32 {
        self.old_end.saturating_sub(self.start)
    }

    /// End of the replacement in the new text, or `None` if it does not fit
    /// in a `u32` offset.
    #[inline]
    pub const fn new_end(&self) -> Option<u32> {
        self.start.checked_add(self.new_len)
    }
}

/// The region of the old text an edit invalidated, and how positions after
/// it move.
///
/// ```
/// use sst_lexer::{ChangeMarker, TextChange};
///
/// let change = TextChange::replace(100, 10, 15);
/// let marker = ChangeMarker::from_change(&change, 95); // restart at 95
///
/// assert_eq!(marker.adjust_position(50), 50);
/// assert_eq!(marker.adjust_position(200), 205);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChangeMarker {
    /// Start of the affected region (earlier than the change when a token
    /// before it looked ahead into it).
    pub affected_start: u32,
    /// End of the affected region in the old text.
    pub affected_end: u32,
    /// Position adjustment for positions after the affected region.
    pub delta: i64,
}

impl ChangeMarker {
    /// Create a marker from a change and the offset scanning restarts at.
    #[inline]
    pub fn from_change(change: &TextChange, restart: u32) -> Self {
        ChangeMarker {
            affected_start: restart.min(change.start),
            affected_end: change.old_end,
            delta: change.delta(),
        }
    }

    /// Adjust a position from old text to new text.
    ///
    /// - Positions strictly before the affected region: unchanged
    /// - Positions at or after the affected end: shifted by delta
    /// - Positions inside the affected region: unchanged, meaningless in
    ///   the new text
    #[inline]
    pub fn adjust_position(&self, pos: u32) -> u32 {
        if pos >= self.affected_end {
            #[allow(
                clippy::cast_sign_loss,
                clippy::cast_possible_truncation,
                reason = "positions after the change stay within the new u32 length"
            )]
            {
                (i64::from(pos) + self.delta) as u32
            }
        } else {
            pos
        }
    }

    /// Map a position in the new text back to the old text, if it lies at or
    /// after the affected end.
    fn old_position(&self, new_pos: u32) -> Option<i64> {
        let old = i64::from(new_pos) - self.delta;
        (old >= i64::from(self.affected_end)).then_some(old)
    }
}

/// Statistics for one incremental re-tokenization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncrementalStats {
    /// Number of tokens reused from the old list.
    pub reused_count: usize,
    /// Number of tokens that were scanned again.
    pub reparsed_count: usize,
}

impl IncrementalStats {
    /// Calculate reuse rate as a percentage.
    #[allow(
        clippy::cast_precision_loss,
        reason = "counts won't approach 2^52; precision loss irrelevant for display"
    )]
    pub fn reuse_rate(&self) -> f64 {
        let total = self.reused_count + self.reparsed_count;
        if total == 0 {
            0.0
        } else {
            (self.reused_count as f64 / total as f64) * 100.0
        }
    }
}

/// Re-tokenize `source` after `change`, reusing what it can of `old`.
///
/// `old` must be the tokens of the text before the change and `source`
/// the text after it. The result equals `lex_from(source, old.start(), ..)`
/// with the state `old` started in.
#[tracing::instrument(
    level = "debug",
    skip(old, source),
    fields(start = change.start, old_end = change.old_end, new_len = change.new_len)
)]
pub fn relex(
    old: &TokenList,
    source: &SourceBuffer,
    change: TextChange,
) -> Result<(TokenList, IncrementalStats), LexError> {
    let old_len = old.end();
    if change.start < old.start() || change.start > change.old_end || change.old_end > old_len {
        return Err(LexError::EditOutOfBounds {
            start: change.start,
            end: change.old_end,
            len: old_len,
        });
    }
    let new_end = match change.new_end() {
        Some(end) if end <= source.len() => end,
        _ => {
            return Err(LexError::EditOutOfBounds {
                start: change.start,
                end: change.start.saturating_add(change.new_len),
                len: source.len(),
            })
        }
    };
    debug_assert_eq!(
        i64::from(old_len) + change.delta(),
        i64::from(source.len()),
        "change does not match the new text"
    );

    let old_tokens = old.as_slice();
    let first = old_tokens
        .iter()
        .position(|t| t.reach() > change.start)
        .unwrap_or(old_tokens.len());
    let (restart, state) = match old_tokens.get(first) {
        Some(t) => (t.span.start, t.state),
        None => (old_len, old.end_state()),
    };
    let marker = ChangeMarker::from_change(&change, restart);
    let cursor = source
        .cursor_at(restart)
        .ok_or(LexError::NotCharBoundary { offset: restart })?;

    let mut tokens: Vec<LexedToken> = Vec::with_capacity(old_tokens.len() + 1);
    tokens.extend_from_slice(&old_tokens[..first]);

    let mut candidate = first;
    let mut resync = None;
    let scan_end = scan_tokens(cursor, state, &mut tokens, |pos, state| {
        if pos < new_end {
            return false;
        }
        let Some(old_pos) = marker.old_position(pos) else {
            return false;
        };
        while old_tokens
            .get(candidate)
            .is_some_and(|t| i64::from(t.span.start) < old_pos)
        {
            candidate += 1;
        }
        match old_tokens.get(candidate) {
            Some(t) if i64::from(t.span.start) == old_pos && t.state == state => {
                resync = Some(candidate);
                true
            }
            _ => false,
        }
    });

    let reparsed_count = tokens.len() - first;
    let (end_state, reused_tail) = match resync {
        Some(index) => {
            let tail = &old_tokens[index..];
            tokens.extend(tail.iter().map(|t| {
                t.with_span(Span::new(
                    marker.adjust_position(t.span.start),
                    marker.adjust_position(t.span.end),
                ))
            }));
            (old.end_state(), tail.len())
        }
        None => (scan_end, 0),
    };

    let stats = IncrementalStats {
        reused_count: first + reused_tail,
        reparsed_count,
    };
    debug!(
        restart,
        reused = stats.reused_count,
        reparsed = stats.reparsed_count,
        resynced = resync.is_some(),
        "relexed"
    );
    Ok((TokenList::from_parts(old.start(), tokens, end_state), stats))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
