//! Delimiter matching.
//!
//! Given the text accumulated since the last token boundary, decide which
//! construct it has just opened or closed. The rules are tested in a fixed
//! order and the first match wins:
//!
//! | # | Seeking | Text ends with / condition                 | Result            |
//! |---|---------|--------------------------------------------|-------------------|
//! | 1 | either  | `<%--` (opening: not mid-instruction)      | `Comment`         |
//! | 2 | close   | `--%>`                                     | `Comment`         |
//! | 3 | open    | `<%`                                       | `Instruction`     |
//! | 4 | close   | `%>`                                       | `Instruction`     |
//! | 5 | open    | `{$`                                       | `EscapedVariable` |
//! | 6 | close   | `}`                                        | `EscapedVariable` |
//! | 7 | open    | `$` (not inside an escaped variable)       | `Variable`        |
//! | 8 | close   | nothing open, text is no longer a variable | `Variable`        |
//!
//! While a bare variable is open, delimiter literals cannot close it: only
//! the validity rule decides, and the first byte that breaks the reference
//! is the boundary.
//!
//! # Comment or Instruction
//!
//! `<%` and `<%--` share a prefix. When rule 3 or 4 fires, the matcher
//! peeks two bytes and evaluates the rules once more on the text with the
//! peeked bytes appended. If that probe finds a comment, the comment wins.
//! The probe is speculative: it consumes nothing and never probes again.

use tracing::trace;

use crate::cursor::Cursor;
use crate::delimiter::{
    ends_with_variable_reference, CLOSE_COMMENT, CLOSE_ESCAPED_VARIABLE, CLOSE_INSTRUCTION,
    OPEN_COMMENT, OPEN_ESCAPED_VARIABLE, OPEN_INSTRUCTION, VARIABLE_SIGIL,
};
use crate::state::OpenType;

/// Bytes peeked to tell a comment from an instruction.
const PROBE_LEN: u32 = 2;

/// Which kind of delimiter the scanner is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seek {
    /// In markup, looking for an opening delimiter.
    Open,
    /// Inside a construct, looking for its closing delimiter.
    Close,
}

/// Classify the cursor's accumulated text.
///
/// `open` is the construct currently open (`OpenType::None` in markup).
/// Returns `OpenType::None` if the text completes no delimiter.
pub fn find_tag(cursor: &mut Cursor<'_>, seek: Seek, open: OpenType) -> OpenType {
    let text = cursor.text();
    let mut result = classify(Probe::new(text), seek, open);

    if result == OpenType::Instruction {
        let ahead = cursor.peek(PROBE_LEN);
        if !ahead.is_empty()
            && classify(Probe::joined(text, ahead), seek, open) == OpenType::Comment
        {
            result = OpenType::Comment;
        }
    }

    trace!(
        tail = %String::from_utf8_lossy(tail(text)),
        ?seek,
        ?open,
        ?result,
        "find_tag"
    );
    result
}

/// The ordered rule set, without lookahead.
fn classify(text: Probe<'_>, seek: Seek, open: OpenType) -> OpenType {
    let opening = seek == Seek::Open;

    // A bare variable has no closing delimiter.
    if !opening && open == OpenType::Variable {
        return if text.is_variable_reference() {
            OpenType::None
        } else {
            OpenType::Variable
        };
    }

    if (!opening || open != OpenType::Instruction) && text.ends_with(OPEN_COMMENT) {
        OpenType::Comment
    } else if !opening && text.ends_with(CLOSE_COMMENT) {
        OpenType::Comment
    } else if opening && text.ends_with(OPEN_INSTRUCTION) {
        OpenType::Instruction
    } else if !opening && text.ends_with(CLOSE_INSTRUCTION) {
        OpenType::Instruction
    } else if opening && text.ends_with(OPEN_ESCAPED_VARIABLE) {
        OpenType::EscapedVariable
    } else if !opening && text.ends_with(CLOSE_ESCAPED_VARIABLE) {
        OpenType::EscapedVariable
    } else if opening && open != OpenType::EscapedVariable && text.ends_with(&[VARIABLE_SIGIL]) {
        OpenType::Variable
    } else if !opening && open == OpenType::None && !text.is_variable_reference() {
        OpenType::Variable
    } else {
        OpenType::None
    }
}

/// Text under test: the accumulated text, optionally followed by peeked
/// bytes. Lets the probe reuse the rule set without joining the slices.
#[derive(Clone, Copy)]
struct Probe<'a> {
    text: &'a [u8],
    ahead: &'a [u8],
}

impl<'a> Probe<'a> {
    fn new(text: &'a [u8]) -> Self {
        Probe { text, ahead: &[] }
    }

    fn joined(text: &'a [u8], ahead: &'a [u8]) -> Self {
        Probe { text, ahead }
    }

    fn len(self) -> usize {
        self.text.len() + self.ahead.len()
    }

    fn rev_bytes(self) -> impl Iterator<Item = &'a u8> {
        self.ahead.iter().rev().chain(self.text.iter().rev())
    }

    fn ends_with(self, literal: &[u8]) -> bool {
        literal.len() <= self.len() && literal.iter().rev().eq(self.rev_bytes().take(literal.len()))
    }

    fn is_variable_reference(self) -> bool {
        ends_with_variable_reference(self.rev_bytes())
    }
}

/// Last few bytes of `text`, for logging.
fn tail(text: &[u8]) -> &[u8] {
    &text[text.len().saturating_sub(8)..]
}
