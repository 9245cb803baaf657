use super::*;
use pretty_assertions::assert_eq;

fn texts<'s>(source: &'s str, tokens: &TokenList) -> Vec<(TopTag, &'s str)> {
    tokens.iter().map(|t| (t.kind, t.text(source))).collect()
}

// === lex ===

#[test]
fn lex_empty() {
    let tokens = lex("").unwrap();
    assert!(tokens.is_empty());
    assert_eq!(tokens.end(), 0);
    assert_eq!(tokens.end_state(), ScanState::INITIAL);
}

#[test]
fn lex_records_spans_and_states() {
    let source = "Hi {$Name}!";
    let tokens = lex(source).unwrap();
    assert_eq!(
        texts(source, &tokens),
        vec![
            (TopTag::MarkupText, "Hi "),
            (TopTag::Code, "{$Name}"),
            (TopTag::MarkupText, "!"),
        ]
    );
    assert_eq!(tokens[0].span, Span::new(0, 3));
    assert_eq!(tokens[1].span, Span::new(3, 10));
    assert_eq!(tokens[0].state, ScanState::INITIAL);
    assert_eq!(
        tokens[1].state,
        ScanState::new(Phase::Opening, OpenType::EscapedVariable)
    );
    assert_eq!(tokens[2].state, ScanState::MARKUP);
    assert_eq!(tokens.end_state(), ScanState::MARKUP);
}

#[test]
fn lex_unterminated_keeps_open_state() {
    let tokens = lex("a <% if").unwrap();
    assert!(tokens.end_state().in_construct());
    assert_eq!(tokens.end_state().open, OpenType::Instruction);
}

// === lex_from ===

#[test]
fn lex_from_restart_point_matches_full_scan() {
    let source = "<ul><% loop $Items %><li>$Title</li><% end_loop %></ul>";
    let full = lex(source).unwrap();
    for token in &full {
        let resumed = lex_from(source, token.span.start, token.state).unwrap();
        let index = full.index_at(token.span.start).unwrap();
        assert_eq!(resumed.as_slice(), &full.as_slice()[index..]);
        assert_eq!(resumed.end_state(), full.end_state());
        assert_eq!(resumed.start(), token.span.start);
    }
}

#[test]
fn lex_from_end_is_empty() {
    let tokens = lex_from("abc", 3, ScanState::MARKUP).unwrap();
    assert!(tokens.is_empty());
    assert_eq!(tokens.end(), 3);
    assert_eq!(tokens.end_state(), ScanState::MARKUP);
}

#[test]
fn lex_from_rejects_offset_past_end() {
    assert_eq!(
        lex_from("abc", 4, ScanState::INITIAL),
        Err(LexError::OffsetOutOfBounds { offset: 4, len: 3 })
    );
}

#[test]
fn lex_from_rejects_offset_inside_character() {
    assert_eq!(
        lex_from("\u{e9}", 1, ScanState::INITIAL),
        Err(LexError::NotCharBoundary { offset: 1 })
    );
}

// === Errors ===

#[test]
fn error_messages() {
    assert_eq!(
        LexError::OffsetOutOfBounds { offset: 9, len: 3 }.to_string(),
        "offset 9 is past the end of a 3 byte document"
    );
    assert_eq!(
        LexError::NotCharBoundary { offset: 1 }.to_string(),
        "offset 1 is not on a character boundary"
    );
    assert_eq!(
        LexError::EditOutOfBounds {
            start: 2,
            end: 8,
            len: 4
        }
        .to_string(),
        "edit 2..8 is out of bounds for a 4 byte document"
    );
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
