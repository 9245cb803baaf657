//! Byte cursor with a token mark, bounded lookahead and bounded pushback.
//!
//! The cursor walks the document byte-by-byte. It remembers where the
//! current token started (the *mark*), so the scanner can ask for the text
//! accumulated since the last token boundary, give back the last one or two
//! bytes when a delimiter turns out to have been over-consumed, and close
//! the token once it is complete. It knows nothing about the template
//! grammar.
//!
//! # Reach
//!
//! Besides the read position the cursor tracks a *reach*: the exclusive end
//! of every byte examined since the last token boundary, through reads
//! (including bytes later pushed back) and peeks. A read or peek that runs
//! into the end of the document sets the reach one past the end, since the
//! outcome then depends on the document ending there. The incremental layer
//! uses the reach to decide which tokens an edit can influence.

/// Cursor over the bytes of a [`SourceBuffer`](crate::SourceBuffer).
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor) or
/// [`SourceBuffer::cursor_at()`](crate::SourceBuffer::cursor_at).
///
/// # Invariant
///
/// `token_start <= pos <= reach` and `pos <= source_len`.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    source: &'a str,
    /// Start of the current token (the mark).
    token_start: u32,
    /// Current read position (byte index into `source`).
    pos: u32,
    /// Exclusive end of the bytes examined for the current token.
    reach: u32,
    /// Length of the source in bytes, saturated to `u32::MAX`.
    source_len: u32,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at `pos`, with the mark at the same position.
    ///
    /// # Contract
    ///
    /// `pos <= source_len` and `pos` lies on a character boundary. This is
    /// guaranteed by `SourceBuffer::cursor_at()`.
    pub(crate) fn new(source: &'a str, source_len: u32, pos: u32) -> Self {
        debug_assert!(
            pos <= source_len,
            "cursor position {pos} past source length {source_len}"
        );
        Self {
            source,
            token_start: pos,
            pos,
            reach: pos,
            source_len,
        }
    }

    /// Consume one byte. Returns `None` at end of input.
    #[inline]
    pub fn read(&mut self) -> Option<u8> {
        if self.pos < self.source_len {
            let b = self.source.as_bytes()[self.pos as usize];
            self.pos += 1;
            self.reach = self.reach.max(self.pos);
            Some(b)
        } else {
            self.reach = self.reach.max(self.source_len.saturating_add(1));
            None
        }
    }

    /// Bytes consumed since the mark.
    #[inline]
    pub fn text(&self) -> &'a [u8] {
        &self.source.as_bytes()[self.token_start as usize..self.pos as usize]
    }

    /// Number of bytes consumed since the mark.
    #[inline]
    pub fn token_len(&self) -> u32 {
        self.pos - self.token_start
    }

    /// Up to `n` bytes beyond the current position, without consuming them.
    ///
    /// Returns fewer than `n` bytes near the end of the document.
    pub fn peek(&mut self, n: u32) -> &'a [u8] {
        let end = self.pos.saturating_add(n);
        self.reach = self.reach.max(end.min(self.source_len.saturating_add(1)));
        &self.source.as_bytes()[self.pos as usize..end.min(self.source_len) as usize]
    }

    /// Give back the last `n` consumed bytes. They are re-read by the next
    /// [`read()`](Self::read) and leave the accumulated [`text()`](Self::text).
    ///
    /// # Contract
    ///
    /// `n` never exceeds [`token_len()`](Self::token_len): pushback cannot
    /// cross the mark.
    #[inline]
    pub fn backup(&mut self, n: u32) {
        debug_assert!(
            n <= self.token_len(),
            "pushback of {n} bytes crosses the token mark ({} consumed)",
            self.token_len()
        );
        self.pos -= n;
    }

    /// Close the current token: move the mark to the read position and
    /// restart the reach there. Returns the token length.
    #[inline]
    pub fn finish(&mut self) -> u32 {
        let len = self.token_len();
        self.token_start = self.pos;
        self.reach = self.pos;
        len
    }

    /// Advance without consuming to just before the next occurrence of any
    /// of the three bytes, or to the end of input if none occurs.
    ///
    /// The skipped bytes join the accumulated text. Uses `memchr3` for
    /// SIMD-accelerated search.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offset < remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_any3(&mut self, a: u8, b: u8, c: u8) {
        let remaining = &self.source.as_bytes()[self.pos as usize..self.source_len as usize];
        match memchr::memchr3(a, b, c, remaining) {
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.source_len,
        }
        self.reach = self.reach.max(self.pos);
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Byte offset where the current token started.
    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start
    }

    /// Exclusive end of the bytes examined since the mark.
    #[inline]
    pub fn reach(&self) -> u32 {
        self.reach
    }
}
