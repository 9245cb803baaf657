use super::*;

// === Literals ===

#[test]
fn comment_open_extends_instruction_open() {
    assert!(OPEN_COMMENT.starts_with(OPEN_INSTRUCTION));
    assert!(CLOSE_COMMENT.ends_with(CLOSE_INSTRUCTION));
}

#[test]
fn open_triggers_end_every_opening_delimiter() {
    for open in [
        OPEN_INSTRUCTION,
        OPEN_COMMENT,
        OPEN_ESCAPED_VARIABLE,
        &[VARIABLE_SIGIL][..],
    ] {
        let last = open[open.len() - 1];
        assert!(
            OPEN_TRIGGERS.contains(&last),
            "{:?} does not end in a trigger byte",
            String::from_utf8_lossy(open)
        );
    }
}

// === Variable bytes ===

#[test]
fn variable_bytes() {
    for b in b"azAZ09.()" {
        assert!(is_variable_byte(*b), "{:?} should be a variable byte", *b as char);
    }
}

#[test]
fn non_variable_bytes() {
    for b in b" _-$%{}<>\"'!,;:\n\t" {
        assert!(!is_variable_byte(*b), "{:?} should not be a variable byte", *b as char);
    }
}

#[test]
fn non_ascii_is_not_a_variable_byte() {
    for b in "\u{e9}".bytes() {
        assert!(!is_variable_byte(b));
    }
}

// === Variable references ===

#[test]
fn simple_reference() {
    assert!(is_variable_reference(b"$Name"));
    assert!(is_variable_reference(b"$Page.Title"));
    assert!(is_variable_reference(b"$Link(about)"));
}

#[test]
fn lone_sigil_is_not_a_reference() {
    assert!(!is_variable_reference(b"$"));
    assert!(!is_variable_reference(b""));
}

#[test]
fn broken_reference() {
    assert!(!is_variable_reference(b"$Name!"));
    assert!(!is_variable_reference(b"$Name "));
    assert!(!is_variable_reference(b"Name"));
}

#[test]
fn reference_may_follow_other_text() {
    assert!(is_variable_reference(b"Hello $Name"));
    assert!(!is_variable_reference(b"$a$"));
    assert!(is_variable_reference(b"$a$b"));
}

#[test]
fn split_reference() {
    let head: &[u8] = b"$Na";
    let tail: &[u8] = b"me";
    assert!(ends_with_variable_reference(
        tail.iter().rev().chain(head.iter().rev())
    ));
    let tail: &[u8] = b"m!";
    assert!(!ends_with_variable_reference(
        tail.iter().rev().chain(head.iter().rev())
    ));
}
