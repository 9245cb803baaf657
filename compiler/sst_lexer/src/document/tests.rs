use super::*;
use crate::{lex, TopTag};
use pretty_assertions::assert_eq;

// === TextEdit ===

#[test]
fn edit_constructors() {
    let insert = TextEdit::insert(3, "ab");
    assert_eq!(insert.span, Span::point(3));
    assert_eq!(insert.length_delta(), 2);

    let delete = TextEdit::delete(Span::new(1, 4));
    assert!(delete.new_text.is_empty());
    assert_eq!(delete.length_delta(), -3);

    let replace = TextEdit::replace(Span::new(0, 2), "xyz");
    assert_eq!(replace.length_delta(), 1);
}

// === Document ===

#[test]
fn new_document_is_tokenized() {
    let doc = Document::new("<p>$Title</p>").unwrap();
    assert_eq!(doc.len(), 13);
    assert_eq!(doc.version(), 0);
    assert_eq!(doc.tokens(), &lex("<p>$Title</p>").unwrap());
    assert_eq!(doc.token_at(4).map(|t| t.kind), Some(TopTag::Code));
}

#[test]
fn empty_document() {
    let doc = Document::new("").unwrap();
    assert!(doc.is_empty());
    assert!(doc.tokens().is_empty());
}

#[test]
fn typing_a_construct_character_by_character() {
    let mut doc = Document::new("Hi ").unwrap();
    for (i, ch) in "<% if $x %>!".chars().enumerate() {
        let at = 3 + u32::try_from(i).unwrap();
        doc.apply_edit(&TextEdit::insert(at, ch.to_string())).unwrap();
        assert_eq!(doc.tokens(), &lex(doc.text()).unwrap(), "after {:?}", doc.text());
    }
    assert_eq!(doc.text(), "Hi <% if $x %>!");
    assert_eq!(doc.version(), 12);
    let kinds: Vec<TopTag> = doc.tokens().kinds().collect();
    assert_eq!(
        kinds,
        vec![TopTag::MarkupText, TopTag::Code, TopTag::MarkupText]
    );
}

#[test]
fn apply_edits_in_sequence() {
    let mut doc = Document::new("<% a %> b").unwrap();
    let stats = doc
        .apply_edits(&[
            TextEdit::replace(Span::new(3, 4), "loop $Items"),
            TextEdit::insert(0, "{$X}"),
            TextEdit::delete(Span::new(21, 22)),
        ])
        .unwrap();
    assert_eq!(doc.text(), "{$X}<% loop $Items %>b");
    assert_eq!(doc.tokens(), &lex(doc.text()).unwrap());
    assert!(stats.reparsed_count > 0);
}

#[test]
fn invalid_edit_leaves_document_unchanged() {
    let mut doc = Document::new("caf\u{e9}").unwrap();
    let before = doc.tokens().clone();

    assert_eq!(
        doc.apply_edit(&TextEdit::insert(9, "x")),
        Err(LexError::EditOutOfBounds {
            start: 9,
            end: 9,
            len: 5
        })
    );
    assert_eq!(
        doc.apply_edit(&TextEdit::delete(Span::new(2, 1))),
        Err(LexError::EditOutOfBounds {
            start: 2,
            end: 1,
            len: 5
        })
    );
    assert_eq!(
        doc.apply_edit(&TextEdit::insert(4, "x")),
        Err(LexError::NotCharBoundary { offset: 4 })
    );
    assert_eq!(doc.text(), "caf\u{e9}");
    assert_eq!(doc.tokens(), &before);
    assert_eq!(doc.version(), 0);
}

#[test]
fn failed_edit_sequence_keeps_text_and_tokens_in_step() {
    let mut doc = Document::new("<% a %>\u{e9}").unwrap();
    let result = doc.apply_edits(&[
        TextEdit::insert(0, "x"),
        TextEdit::replace(Span::new(8, 9), "y"),
    ]);
    assert_eq!(result, Err(LexError::NotCharBoundary { offset: 9 }));
    assert_eq!(doc.text(), "x<% a %>\u{e9}");
    assert_eq!(doc.tokens(), &lex(doc.text()).unwrap());
    assert_eq!(doc.version(), 1);
}

#[test]
fn scanner_from_resumes_at_token_boundary() {
    let doc = Document::new("ab<% x %>cd").unwrap();
    let scanner = doc.scanner_from(5).unwrap();
    assert_eq!(scanner.pos(), 2);
    let lens: Vec<u32> = scanner.map(|t| t.len).collect();
    assert_eq!(lens, vec![7, 2]);
}

#[test]
fn scanner_from_rejects_offset_past_end() {
    let doc = Document::new("ab").unwrap();
    assert!(matches!(
        doc.scanner_from(3),
        Err(LexError::OffsetOutOfBounds { offset: 3, len: 2 })
    ));
}

// === SharedDocument ===

#[test]
fn shared_document_edits_are_visible_to_clones() {
    let shared = SharedDocument::new(Document::new("<% a %>").unwrap());
    let view = shared.clone();
    shared.edit(&TextEdit::insert(7, " $b")).unwrap();
    assert_eq!(view.text(), "<% a %> $b");
    assert_eq!(view.version(), 1);
    assert_eq!(view.tokens().len(), 3);
}

#[test]
fn shared_document_scanner_sees_consistent_text() {
    let shared: SharedDocument = Document::new("x{$Y}z").unwrap().into();
    let tags = shared
        .with_scanner(3, |scanner| scanner.map(|t| t.tag).collect::<Vec<_>>())
        .unwrap();
    assert_eq!(tags, vec![TopTag::Code, TopTag::MarkupText]);
}

#[test]
fn shared_document_across_threads() {
    let shared = SharedDocument::new(Document::new("").unwrap());
    let writers: Vec<_> = (0..4)
        .map(|_| {
            let doc = shared.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    // Another writer may get in between, so this is not
                    // always an append, but it is always a valid edit.
                    let len = doc.read().len();
                    doc.edit(&TextEdit::insert(len, "$a ")).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let doc = shared.read();
    assert_eq!(doc.tokens(), &lex(doc.text()).unwrap());
    assert_eq!(doc.len(), 300);
    assert_eq!(doc.version(), 100);
}

#[test]
fn edit_all_is_atomic_for_readers() {
    let shared = SharedDocument::new(Document::new("a").unwrap());
    shared
        .edit_all(&[TextEdit::insert(1, "<%"), TextEdit::insert(3, " b %>")])
        .unwrap();
    assert_eq!(shared.text(), "a<% b %>");
    assert_eq!(shared.read().tokens().len(), 2);
}
