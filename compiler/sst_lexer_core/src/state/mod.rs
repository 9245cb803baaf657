//! Resumable scanner state.
//!
//! A [`ScanState`] is everything the scanner carries from one token to the
//! next. It is a plain `Copy` value with no reference to the cursor or the
//! document, so a host can snapshot it after any token, store it next to
//! the token, compare two snapshots, and restart scanning from a stored one.

/// Where the phase machine is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Start of a document. Behaves like [`Phase::Markup`].
    #[default]
    Init,
    /// Scanning literal markup, looking for an opening delimiter.
    Markup,
    /// An opening delimiter was detected and is being consumed.
    Opening,
    /// Inside a construct, looking for its closing delimiter.
    Code,
    /// The closing delimiter was accepted and is being consumed.
    Closing,
}

/// Which template construct is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpenType {
    /// No construct (markup).
    #[default]
    None,
    /// `<% ... %>`
    Instruction,
    /// `<%-- ... --%>`
    Comment,
    /// `$Name`, ended implicitly.
    Variable,
    /// `{$ ... }`
    EscapedVariable,
}

impl OpenType {
    /// Bytes of the opening delimiter that are consumed when it is detected
    /// in markup, and pushed back when markup precedes it.
    ///
    /// Comments are detected by their instruction prefix, so they count two.
    pub const fn open_len(self) -> u32 {
        match self {
            OpenType::Variable => 1,
            OpenType::None => 0,
            OpenType::Instruction | OpenType::Comment | OpenType::EscapedVariable => 2,
        }
    }

    /// Bytes of the tentative close that are pushed back when a close is
    /// accepted, and left out of the quote scan.
    ///
    /// For a bare variable this is the byte that broke the reference.
    pub const fn close_len(self) -> u32 {
        match self {
            OpenType::Variable | OpenType::EscapedVariable => 1,
            OpenType::None => 0,
            OpenType::Instruction | OpenType::Comment => 2,
        }
    }

    /// Returns `true` if quoted literals inside this construct can hide a
    /// closing delimiter. Comments have no quoting.
    pub const fn has_quotes(self) -> bool {
        !matches!(self, OpenType::Comment | OpenType::None)
    }
}

/// Snapshot of the phase machine: `Phase x OpenType`.
///
/// # Invariant
///
/// `open != OpenType::None` exactly when `phase` is `Opening`, `Code` or
/// `Closing`. The scanner only produces consistent states; see
/// [`is_consistent`](Self::is_consistent).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScanState {
    pub phase: Phase,
    pub open: OpenType,
}

impl ScanState {
    /// State at the start of a document.
    pub const INITIAL: ScanState = ScanState {
        phase: Phase::Init,
        open: OpenType::None,
    };

    /// State between constructs.
    pub const MARKUP: ScanState = ScanState {
        phase: Phase::Markup,
        open: OpenType::None,
    };

    /// Create a state from its parts.
    pub const fn new(phase: Phase, open: OpenType) -> Self {
        ScanState { phase, open }
    }

    /// Returns `true` while a construct is open.
    pub const fn in_construct(self) -> bool {
        matches!(self.phase, Phase::Opening | Phase::Code | Phase::Closing)
    }

    /// Returns `true` if the phase and open type agree.
    pub fn is_consistent(self) -> bool {
        self.in_construct() == (self.open != OpenType::None)
    }
}
