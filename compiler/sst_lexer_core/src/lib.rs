//! Top-level tokenizer for SilverStripe-style templates.
//!
//! Partitions a document into two kinds of spans: literal markup and
//! template code (`<% ... %>`, `<%-- ... --%>`, `{$ ... }` and bare
//! `$Name` references). Boundaries are resolved byte by byte with a small
//! phase machine whose entire state between tokens is a two-byte
//! [`ScanState`], so an editor can restart scanning at any token boundary.
//!
//! This crate is standalone: it knows nothing about spans, edits or
//! documents. The `sst_lexer` crate builds incremental re-tokenization on
//! top of it.
//!
//! # Example
//!
//! ```
//! use sst_lexer_core::{tokenize, TopTag};
//!
//! let tags: Vec<TopTag> = tokenize("Hello $Name.").iter().map(|t| t.tag).collect();
//! assert_eq!(tags, [TopTag::MarkupText, TopTag::Code, TopTag::MarkupText]);
//! ```

mod cursor;
mod delimiter;
mod matcher;
mod quote;
mod scanner;
mod source_buffer;
mod state;
mod tag;

pub use cursor::Cursor;
pub use delimiter::{
    is_variable_byte, is_variable_reference, CLOSE_COMMENT, CLOSE_ESCAPED_VARIABLE,
    CLOSE_INSTRUCTION, OPEN_COMMENT, OPEN_ESCAPED_VARIABLE, OPEN_INSTRUCTION, OPEN_TRIGGERS,
    PATH_SEPARATOR, VARIABLE_SIGIL,
};
pub use matcher::{find_tag, Seek};
pub use quote::inside_quoted_literal;
pub use scanner::{tokenize, TopScanner};
pub use source_buffer::SourceBuffer;
pub use state::{OpenType, Phase, ScanState};
pub use tag::{TopTag, TopToken};
