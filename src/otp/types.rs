//! Core types for the OTP input component.

use bubbletea_rs::Msg;
use once_cell::sync::Lazy;
use regex::Regex;

/// Clipboard paste message carrying raw text.
#[derive(Debug, Clone)]
pub struct PasteMsg(pub String);

/// Clipboard paste error message.
#[derive(Debug, Clone)]
pub struct PasteErrMsg(pub String);

/// A pointer press on the input. Carries no position: double-press
/// detection only needs the press itself, the trailing [`ClickMsg`] places
/// the caret.
#[derive(Debug, Clone)]
pub struct PointerDownMsg;

/// A click that landed on a slot. The host resolves the pointer position to
/// a slot index before sending this.
#[derive(Debug, Clone)]
pub struct ClickMsg {
    /// Index of the clicked slot, in `[0, maxlength)`.
    pub slot: usize,
}

/// The pointer entered or left the widget.
#[derive(Debug, Clone)]
pub struct HoverMsg {
    /// Whether the pointer is currently over the widget.
    pub hovering: bool,
}

/// A touch interaction ended on the input.
#[derive(Debug, Clone)]
pub struct TouchEndMsg;

/// The host mirrored a selection change of the underlying native input.
#[derive(Debug, Clone)]
pub struct SelectionMsg {
    /// Selection start, in characters.
    pub start: usize,
    /// Selection end, in characters.
    pub end: usize,
}

impl From<PasteMsg> for Msg {
    fn from(msg: PasteMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<PasteErrMsg> for Msg {
    fn from(msg: PasteErrMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<PointerDownMsg> for Msg {
    fn from(msg: PointerDownMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<ClickMsg> for Msg {
    fn from(msg: ClickMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<HoverMsg> for Msg {
    fn from(msg: HoverMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<TouchEndMsg> for Msg {
    fn from(msg: TouchEndMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<SelectionMsg> for Msg {
    fn from(msg: SelectionMsg) -> Self {
        Box::new(msg) as Msg
    }
}

/// How the current selection range is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionType {
    /// Collapsed selection: a caret between characters.
    Caret,
    /// Exactly one character selected.
    Char,
    /// A range spanning more than one character.
    Multi,
}

/// Keyboard hint for the input, with an implied alphabet when no explicit
/// pattern is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Free-form text.
    Text,
    /// Digits only.
    #[default]
    Numeric,
    /// Decimal entry; filtered to digits here, the widget has no radix
    /// point slot.
    Decimal,
    /// Telephone entry; filtered to digits.
    Tel,
}

impl InputMode {
    /// Whether the mode implies a digits-only filter in the absence of an
    /// explicit pattern.
    pub fn implies_digits(&self) -> bool {
        !matches!(self, InputMode::Text)
    }
}

/// Horizontal alignment of a character inside a slot cell wider than one
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Left-aligned.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Right-aligned.
    Right,
}

/// One rendered character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// The character at this index, if the value reaches it.
    pub char: Option<char>,
    /// Whether the selection covers this index while the input is focused.
    pub is_active: bool,
    /// Whether the fake caret is drawn in this slot. At most one slot at a
    /// time, and only on an empty active slot under a collapsed selection.
    pub has_fake_caret: bool,
    /// Per-index placeholder character, present only while the whole value
    /// is empty.
    pub placeholder: Option<char>,
}

/// Declarative projection handed to an external renderer. Recomputed from
/// scratch on demand; `slots.len()` always equals the configured maxlength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderProps {
    /// The slot descriptors, in order.
    pub slots: Vec<Slot>,
    /// Whether the widget has focus.
    pub is_focused: bool,
    /// Whether the pointer is over the widget.
    pub is_hovering: bool,
}

/// Outbound notifications, drained with `Model::take_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpEvent {
    /// The accepted value changed through user input.
    Input(String),
    /// The accepted value changed (fires alongside `Input`, and alone for
    /// programmatic sets).
    Change(String),
    /// The widget gained focus.
    Focus,
    /// The widget lost focus.
    Blur,
    /// A slot was clicked.
    Click,
    /// Text was pasted into the input.
    Paste,
    /// The selection range changed.
    Select,
    /// The value reached full length. Fires exactly once per transition
    /// into completeness; re-fires only after the value becomes incomplete
    /// again.
    Complete(String),
}

/// Matches values made of digits only.
pub static PATTERN_ONLY_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("digit pattern"));

/// Matches values made of latin letters only.
pub static PATTERN_ONLY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").expect("letter pattern"));

/// Matches values made of digits and latin letters.
pub static PATTERN_ONLY_DIGITS_AND_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("alphanumeric pattern"));
