//! Token tags produced by the top-level scanner.

/// Kind of a top-level token.
///
/// The scanner partitions a document into exactly two kinds of spans;
/// `Eof` is the exhaustion signal, never part of the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TopTag {
    /// Literal markup between template constructs.
    MarkupText = 0,
    /// A whole template construct: opening delimiter, body and closing
    /// delimiter, or a bare variable reference.
    Code = 1,
    /// End of input. Always has `len == 0`.
    Eof = 255,
}

impl TopTag {
    /// Human-readable name, for logs and test output.
    pub const fn name(self) -> &'static str {
        match self {
            TopTag::MarkupText => "markup text",
            TopTag::Code => "template code",
            TopTag::Eof => "end of input",
        }
    }
}

/// One token: its tag and byte length.
///
/// Spans are implicit: a token starts where the previous one ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopToken {
    pub tag: TopTag,
    /// Length in bytes. Non-zero for every tag but `Eof`.
    pub len: u32,
    /// How many bytes past its end the scanner examined while producing
    /// this token. One more than the remaining input means the token
    /// depends on where the document ends.
    pub lookahead: u32,
}

impl TopToken {
    /// The end-of-input token.
    pub const EOF: TopToken = TopToken {
        tag: TopTag::Eof,
        len: 0,
        lookahead: 0,
    };
}

#[cfg(test)]
mod tests;
