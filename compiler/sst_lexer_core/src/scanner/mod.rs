//! Phase machine partitioning a document into markup and template code.
//!
//! The scanner consumes the document byte-by-byte and, after each byte,
//! looks at the text accumulated since the last token boundary:
//!
//! - **Markup** (`Init`, `Markup`): look for an opening delimiter. When one
//!   is found with markup in front of it, push the delimiter back and emit
//!   the markup.
//! - **Opening**: wait until the opening delimiter is fully consumed.
//! - **Code**: look for the closing delimiter of the open construct,
//!   ignoring candidates inside quoted literals. An accepted close is
//!   pushed back and re-read in the closing phase.
//! - **Closing**: once the body ends in the closing literal, emit the whole
//!   construct as one code token.
//!
//! Every call to [`TopScanner::next_token`] returns exactly one non-empty
//! token, or `Eof`. Between calls the only state is the cursor position and
//! a [`ScanState`], so scanning can restart at any token boundary with the
//! state recorded there and produce the same tokens.

use tracing::trace;

use crate::cursor::Cursor;
use crate::delimiter::{
    CLOSE_COMMENT, CLOSE_ESCAPED_VARIABLE, CLOSE_INSTRUCTION, OPEN_TRIGGERS, PATH_SEPARATOR,
};
use crate::matcher::{find_tag, Seek};
use crate::quote::inside_quoted_literal;
use crate::state::{OpenType, Phase, ScanState};
use crate::tag::{TopTag, TopToken};

/// Top-level scanner over one document.
///
/// Produces one token at a time as a `(tag, length)` pair. Malformed input
/// is never an error: unterminated constructs end at end of input.
pub struct TopScanner<'a> {
    cursor: Cursor<'a>,
    state: ScanState,
}

impl<'a> TopScanner<'a> {
    /// Create a scanner at the cursor's position, in the initial state.
    pub fn new(cursor: Cursor<'a>) -> Self {
        Self::resume(cursor, ScanState::INITIAL)
    }

    /// Create a scanner that continues from a recorded state.
    ///
    /// The cursor must sit on the token boundary where `state` was recorded.
    pub fn resume(cursor: Cursor<'a>, state: ScanState) -> Self {
        debug_assert!(state.is_consistent(), "inconsistent scan state {state:?}");
        trace!(pos = cursor.pos(), ?state, "scanner start");
        Self { cursor, state }
    }

    /// Snapshot of the current state.
    ///
    /// After a token is returned this is the state to resume from at the
    /// token's end.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Byte offset of the next token.
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Produce the next token.
    ///
    /// Returns [`TopToken::EOF`] when the document is exhausted. Subsequent
    /// calls keep returning it.
    pub fn next_token(&mut self) -> TopToken {
        if self.cursor.read().is_none() {
            return TopToken::EOF;
        }

        loop {
            if let Some(tag) = self.step() {
                return self.emit(tag);
            }
            if self.cursor.read().is_none() {
                return self.end_of_input();
            }
        }
    }

    /// Process the byte just read. Returns a tag when a token is complete.
    fn step(&mut self) -> Option<TopTag> {
        match self.state.phase {
            Phase::Init | Phase::Markup => self.markup(),
            Phase::Opening => {
                self.opening();
                None
            }
            Phase::Code => self.code(),
            Phase::Closing => self.closing(),
        }
    }

    // ─── Markup ────────────────────────────────────────────────

    fn markup(&mut self) -> Option<TopTag> {
        let found = find_tag(&mut self.cursor, Seek::Open, self.state.open);
        if found == OpenType::None {
            // Only a trigger byte can complete an opening delimiter.
            let [a, b, c] = OPEN_TRIGGERS;
            self.cursor.skip_to_any3(a, b, c);
            return None;
        }

        self.transition(Phase::Opening, found);
        let delimiter = found.open_len();
        if self.cursor.token_len() > delimiter {
            self.cursor.backup(delimiter);
            return Some(TopTag::MarkupText);
        }
        self.opening();
        None
    }

    // ─── Opening ───────────────────────────────────────────────

    fn opening(&mut self) {
        let open = self.state.open;
        let immediate = matches!(open, OpenType::Variable | OpenType::EscapedVariable);
        if immediate || self.cursor.token_len() >= open.open_len() {
            self.transition(Phase::Code, open);
        }
    }

    // ─── Code ──────────────────────────────────────────────────

    fn code(&mut self) -> Option<TopTag> {
        let open = self.state.open;
        let found = find_tag(&mut self.cursor, Seek::Close, open);

        if found == OpenType::Comment && open == OpenType::Instruction {
            // What opened as `<%` turned out to be a comment.
            self.transition(Phase::Code, OpenType::Comment);
            return None;
        }
        if found == OpenType::None || found != open {
            return None;
        }

        if open.has_quotes() {
            let text = self.cursor.text();
            let body = &text[..text.len().saturating_sub(open.close_len() as usize)];
            if inside_quoted_literal(body) {
                trace!(?open, "close candidate inside quoted literal");
                return None;
            }
        }

        self.transition(Phase::Closing, open);
        let close = open.close_len();
        if self.cursor.token_len() > close {
            self.cursor.backup(close);
        }
        if open == OpenType::Variable {
            self.trim_path_separators();
        }
        self.closing()
    }

    /// A variable path never ends in a separator: give back trailing dots
    /// so they become markup. The sigil is kept.
    fn trim_path_separators(&mut self) {
        let text = self.cursor.text();
        let mut dots = 0u32;
        for &b in text.iter().skip(1).rev() {
            if b != PATH_SEPARATOR {
                break;
            }
            dots += 1;
        }
        if dots > 0 {
            self.cursor.backup(dots);
        }
    }

    // ─── Closing ───────────────────────────────────────────────

    fn closing(&mut self) -> Option<TopTag> {
        let text = self.cursor.text();
        let complete = match self.state.open {
            OpenType::Instruction => text.ends_with(CLOSE_INSTRUCTION),
            OpenType::Comment => text.ends_with(CLOSE_COMMENT),
            OpenType::EscapedVariable => text.ends_with(CLOSE_ESCAPED_VARIABLE),
            // The breaking byte is already pushed back.
            OpenType::Variable | OpenType::None => true,
        };
        if complete {
            self.transition(Phase::Markup, OpenType::None);
            Some(TopTag::Code)
        } else {
            None
        }
    }

    // ─── End of input ──────────────────────────────────────────

    /// Emit whatever is left. Nothing is ever dropped.
    fn end_of_input(&mut self) -> TopToken {
        let tag = if self.state.in_construct() {
            if self.state.open == OpenType::Variable {
                // End of input ends a bare variable like any other byte
                // outside the path alphabet would.
                self.trim_path_separators();
                self.transition(Phase::Markup, OpenType::None);
            }
            TopTag::Code
        } else {
            TopTag::MarkupText
        };
        self.emit(tag)
    }

    fn transition(&mut self, phase: Phase, open: OpenType) {
        trace!(from = ?self.state, ?phase, ?open, "transition");
        self.state = ScanState::new(phase, open);
    }

    fn emit(&mut self, tag: TopTag) -> TopToken {
        let lookahead = self.cursor.reach() - self.cursor.pos();
        let start = self.cursor.token_start();
        let len = self.cursor.finish();
        debug_assert!(len > 0, "empty {} token at {start}", tag.name());
        trace!(
            tag = tag.name(),
            start,
            len,
            lookahead,
            state = ?self.state,
            "emit"
        );
        TopToken {
            tag,
            len,
            lookahead,
        }
    }
}

impl Iterator for TopScanner<'_> {
    type Item = TopToken;

    fn next(&mut self) -> Option<TopToken> {
        let tok = self.next_token();
        if tok.tag == TopTag::Eof {
            None
        } else {
            Some(tok)
        }
    }
}

/// Convenience function: tokenize a document from the start and collect
/// all tokens.
///
/// Returns every token except the final `Eof`. For streaming access or
/// resumption, construct a `SourceBuffer` + `TopScanner` directly.
pub fn tokenize(source: &str) -> Vec<TopToken> {
    let buf = crate::SourceBuffer::new(source);
    TopScanner::new(buf.cursor()).collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
