//! Quote context of a construct body.
//!
//! Instructions and inline expressions may contain string literals, and a
//! literal may contain something that looks like the closing delimiter:
//! `<% include "a%>b" %>`. Before a close is accepted, the scanner checks
//! that the body before it does not end inside a quoted literal.

/// Returns `true` if `body` ends inside an unterminated `"..."` or `'...'`
/// literal.
///
/// A backslash escapes the byte after it. A double quote inside a
/// single-quoted literal (and vice versa) is ordinary text. Linear in the
/// body length; only the three interesting bytes are visited, found with
/// `memchr3`.
pub fn inside_quoted_literal(body: &[u8]) -> bool {
    let mut in_double = false;
    let mut in_single = false;
    let mut i = 0;

    while let Some(offset) = memchr::memchr3(b'\\', b'"', b'\'', &body[i..]) {
        let at = i + offset;
        match body[at] {
            // Skip the escaped byte, whatever it is.
            b'\\' => {
                i = at + 2;
                if i >= body.len() {
                    break;
                }
                continue;
            }
            b'"' if !in_single => in_double = !in_double,
            b'\'' if !in_double => in_single = !in_single,
            _ => {}
        }
        i = at + 1;
    }

    in_double || in_single
}
