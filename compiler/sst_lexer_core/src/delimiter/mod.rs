//! Delimiter table for the template language.
//!
//! Three constructs have an explicit open/close pair. Bare variables
//! (`$Name`, `$Page.Title`, `$Link(about)`) have only a sigil: they end at
//! the first byte that cannot continue a variable path.

/// Opens a block instruction: `<% if $x %>`.
pub const OPEN_INSTRUCTION: &[u8] = b"<%";
/// Closes a block instruction.
pub const CLOSE_INSTRUCTION: &[u8] = b"%>";
/// Opens a comment: `<%-- note --%>`. Shares its first two bytes with
/// [`OPEN_INSTRUCTION`].
pub const OPEN_COMMENT: &[u8] = b"<%--";
/// Closes a comment.
pub const CLOSE_COMMENT: &[u8] = b"--%>";
/// Opens an escaped inline expression: `{$Title}`.
pub const OPEN_ESCAPED_VARIABLE: &[u8] = b"{$";
/// Closes an escaped inline expression.
pub const CLOSE_ESCAPED_VARIABLE: &[u8] = b"}";

/// Starts a bare variable reference.
pub const VARIABLE_SIGIL: u8 = b'$';
/// Separates the segments of a variable path.
pub const PATH_SEPARATOR: u8 = b'.';

/// Bytes that can end an opening delimiter.
///
/// In markup, an opening delimiter can only be completed by one of these
/// bytes, so the scanner may skip everything else without testing it.
pub const OPEN_TRIGGERS: [u8; 3] = [b'%', VARIABLE_SIGIL, b'-'];

/// 256-byte lookup table for bytes that may continue a bare variable:
/// ASCII letters, digits, `.`, `(` and `)`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "loop counter i is 0..=255, always fits in u8"
)]
static IS_VARIABLE_BYTE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0u16;
    while i < 256 {
        table[i as usize] = matches!(
            i as u8,
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'(' | b')'
        );
        i += 1;
    }
    table
};

/// Returns `true` if `b` may continue a bare variable reference.
#[inline]
pub fn is_variable_byte(b: u8) -> bool {
    IS_VARIABLE_BYTE_TABLE[b as usize]
}

/// Returns `true` if `text` ends in a well-formed bare variable reference:
/// a sigil followed by one or more variable bytes, running to the end.
///
/// A sigil with nothing after it is not a reference yet.
pub fn is_variable_reference(text: &[u8]) -> bool {
    ends_with_variable_reference(text.iter().rev())
}

/// Same as [`is_variable_reference`], over bytes given back to front.
///
/// Lets the matcher test a text that is split across two slices without
/// joining them.
pub(crate) fn ends_with_variable_reference<'b>(rev: impl Iterator<Item = &'b u8>) -> bool {
    let mut run = 0usize;
    for &b in rev {
        if b == VARIABLE_SIGIL {
            return run > 0;
        }
        if !is_variable_byte(b) {
            return false;
        }
        run += 1;
    }
    false
}

#[cfg(test)]
mod tests;
