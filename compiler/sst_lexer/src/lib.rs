//! Incremental tokenization of SilverStripe-style templates.
//!
//! Builds on the standalone scanner in `sst_lexer_core`:
//!
//! - [`lex`] / [`lex_from`]: tokenize a whole document, or the rest of one
//!   from a recorded restart point.
//! - [`relex`]: after an edit, re-scan only the tokens the edit can reach
//!   and reuse the rest.
//! - [`Document`] / [`SharedDocument`]: text plus tokens kept in sync
//!   across edits, optionally shared between editor views.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=sst_lexer=debug`: edit and reuse statistics.
//! - `RUST_LOG=sst_lexer_core=trace`: every matcher decision, phase
//!   transition and token (very verbose).
//!
//! Output is only installed by [`init_tracing`].

mod document;
mod error;
mod incremental;
mod span;
mod token_list;

use std::sync::Once;

use tracing::debug;

pub use document::{Document, SharedDocument, TextEdit};
pub use error::LexError;
pub use incremental::{relex, ChangeMarker, IncrementalStats, TextChange};
pub use span::Span;
pub use sst_lexer_core::{OpenType, Phase, ScanState, SourceBuffer, TopScanner, TopTag};
pub use token_list::{LexedToken, TokenList};

use token_list::scan_tokens;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=sst_lexer=debug` or `RUST_LOG=sst_lexer_core=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Tokenize a whole document.
///
/// Fails only if the document exceeds `u32::MAX` bytes.
///
/// ```
/// use sst_lexer::{lex, TopTag};
///
/// let source = "<ul><% loop $Items %>";
/// let tokens = lex(source)?;
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[1].kind, TopTag::Code);
/// assert_eq!(tokens[1].text(source), "<% loop $Items %>");
/// # Ok::<(), sst_lexer::LexError>(())
/// ```
#[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    lex_from(source, 0, ScanState::INITIAL)
}

/// Tokenize from `offset` to the end of the document, starting in `state`.
///
/// `offset` and `state` should come from an earlier scan of the same
/// text, e.g. [`TokenList::restart_point`]; the tokens produced are then
/// exactly the ones a scan from the start would produce from there on.
#[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn lex_from(source: &str, offset: u32, state: ScanState) -> Result<TokenList, LexError> {
    checked_len(source)?;
    let buf = SourceBuffer::new(source);
    lex_buffer(&buf, offset, state)
}

/// Tokenize the rest of `buf` from `offset` in `state`.
pub(crate) fn lex_buffer(
    buf: &SourceBuffer,
    offset: u32,
    state: ScanState,
) -> Result<TokenList, LexError> {
    let len = buf.len();
    if offset > len {
        return Err(LexError::OffsetOutOfBounds { offset, len });
    }
    let cursor = buf
        .cursor_at(offset)
        .ok_or(LexError::NotCharBoundary { offset })?;

    let mut tokens = Vec::new();
    let end_state = scan_tokens(cursor, state, &mut tokens, |_, _| false);
    debug!(offset, count = tokens.len(), ?end_state, "lexed");
    Ok(TokenList::from_parts(offset, tokens, end_state))
}

/// Length of `source` as a `u32` offset.
pub(crate) fn checked_len(source: &str) -> Result<u32, LexError> {
    u32::try_from(source.len()).map_err(|_| LexError::SourceTooLarge { len: source.len() })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
