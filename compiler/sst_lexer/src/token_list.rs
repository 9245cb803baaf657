//! Token storage with absolute spans and restart states.

use std::ops::Index;

use sst_lexer_core::{Cursor, ScanState, TopScanner, TopTag};
use tracing::trace;

use crate::Span;

/// A token with its absolute span and the scanner state it started in.
///
/// `state` is the snapshot the scanner can be resumed from at
/// `span.start`. `lookahead` counts the bytes past `span.end` the scanner
/// examined while producing the token; an edit anywhere in
/// `span.start..reach()` can change the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LexedToken {
    pub kind: TopTag,
    pub span: Span,
    pub state: ScanState,
    pub lookahead: u32,
}

impl LexedToken {
    /// Exclusive end of the bytes this token depends on.
    #[inline]
    pub fn reach(&self) -> u32 {
        self.span.end.saturating_add(self.lookahead)
    }

    /// Returns `true` for template code.
    #[inline]
    pub fn is_code(&self) -> bool {
        self.kind == TopTag::Code
    }

    /// Returns `true` for literal markup.
    #[inline]
    pub fn is_markup(&self) -> bool {
        self.kind == TopTag::MarkupText
    }

    /// The token's text in `source`.
    ///
    /// `source` must be the document the token was produced from.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.to_range()]
    }

    /// The same token moved to `span`.
    #[must_use]
    pub(crate) fn with_span(self, span: Span) -> Self {
        LexedToken { span, ..self }
    }
}

/// The tokens of a document, in order, with no gaps between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenList {
    /// Offset where the first token starts.
    start: u32,
    tokens: Vec<LexedToken>,
    /// Scanner state after the last token.
    end_state: ScanState,
}

impl TokenList {
    /// Create an empty list for an empty document.
    pub fn new() -> Self {
        TokenList {
            start: 0,
            tokens: Vec::new(),
            end_state: ScanState::INITIAL,
        }
    }

    pub(crate) fn from_parts(start: u32, tokens: Vec<LexedToken>, end_state: ScanState) -> Self {
        debug_assert!(
            tokens.windows(2).all(|w| w[0].span.end == w[1].span.start),
            "token spans must be contiguous"
        );
        TokenList {
            start,
            tokens,
            end_state,
        }
    }

    /// Number of tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if there are no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Offset where the first token starts.
    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Offset where the last token ends.
    pub fn end(&self) -> u32 {
        self.tokens.last().map_or(self.start, |t| t.span.end)
    }

    /// Scanner state after the last token.
    #[inline]
    pub fn end_state(&self) -> ScanState {
        self.end_state
    }

    /// Get a token by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&LexedToken> {
        self.tokens.get(index)
    }

    /// The tokens as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[LexedToken] {
        &self.tokens
    }

    /// Iterate over the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, LexedToken> {
        self.tokens.iter()
    }

    /// Iterate over the token kinds.
    pub fn kinds(&self) -> impl Iterator<Item = TopTag> + '_ {
        self.tokens.iter().map(|t| t.kind)
    }

    /// Index of the token containing `offset`, by binary search.
    pub fn index_at(&self, offset: u32) -> Option<usize> {
        let index = self.tokens.partition_point(|t| t.span.end <= offset);
        self.tokens
            .get(index)
            .filter(|t| t.span.contains(offset))
            .map(|_| index)
    }

    /// The token containing `offset`.
    pub fn token_at(&self, offset: u32) -> Option<&LexedToken> {
        self.index_at(offset).map(|i| &self.tokens[i])
    }

    /// The nearest point at or before `offset` where scanning can restart:
    /// a token boundary and the state recorded there.
    pub fn restart_point(&self, offset: u32) -> (u32, ScanState) {
        match self.index_at(offset) {
            Some(i) => (self.tokens[i].span.start, self.tokens[i].state),
            None => (self.end(), self.end_state),
        }
    }
}

impl Default for TokenList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for TokenList {
    type Output = LexedToken;

    #[inline]
    fn index(&self, index: usize) -> &LexedToken {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a LexedToken;
    type IntoIter = std::slice::Iter<'a, LexedToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Scan from `cursor` in `state`, appending tokens to `out`.
///
/// Before each token, `stop` is asked whether to end the scan at that
/// boundary. Returns the scanner state at the point the scan ended.
pub(crate) fn scan_tokens(
    cursor: Cursor<'_>,
    state: ScanState,
    out: &mut Vec<LexedToken>,
    mut stop: impl FnMut(u32, ScanState) -> bool,
) -> ScanState {
    let mut scanner = TopScanner::resume(cursor, state);
    loop {
        let start = scanner.pos();
        let state = scanner.state();
        if stop(start, state) {
            trace!(start, ?state, "scan stopped at boundary");
            return state;
        }
        let tok = scanner.next_token();
        if tok.tag == TopTag::Eof {
            return state;
        }
        out.push(LexedToken {
            kind: tok.tag,
            span: Span::new(start, start + tok.len),
            state,
            lookahead: tok.lookahead,
        });
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
