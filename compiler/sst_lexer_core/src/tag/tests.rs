use super::*;

#[test]
fn tag_is_one_byte() {
    assert_eq!(std::mem::size_of::<TopTag>(), 1);
}

#[test]
fn repr_u8_values() {
    assert_eq!(TopTag::MarkupText as u8, 0);
    assert_eq!(TopTag::Code as u8, 1);
    assert_eq!(TopTag::Eof as u8, 255);
}

#[test]
fn names() {
    assert_eq!(TopTag::MarkupText.name(), "markup text");
    assert_eq!(TopTag::Code.name(), "template code");
    assert_eq!(TopTag::Eof.name(), "end of input");
}

#[test]
fn eof_token_is_empty() {
    assert_eq!(TopToken::EOF.tag, TopTag::Eof);
    assert_eq!(TopToken::EOF.len, 0);
    assert_eq!(TopToken::EOF.lookahead, 0);
}
