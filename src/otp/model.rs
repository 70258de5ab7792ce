//! Core model for the OTP input component.

use super::keymap::{default_key_map, KeyMap};
#[cfg(feature = "clipboard-support")]
use super::types::PasteMsg;
use super::types::{InputMode, OtpEvent, PasteErrMsg, TextAlign};
use crate::caret::{self, Model as Caret};
use crate::pwm;
use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
use lipgloss_extras::prelude::*;
use regex::Regex;
use std::time::Duration;
use std::time::Instant;

/// Slot count used by the standalone `bubbletea_rs::Model` impl.
pub const DEFAULT_MAXLENGTH: usize = 6;

/// The OTP input component model.
///
/// A fixed row of single-character slots backed by one canonical value and
/// one emulated selection range. The model consumes key, pointer and paste
/// messages, keeps the selection classified (caret / single character /
/// range), and exposes both a declarative render projection and a styled
/// terminal view.
///
/// # Examples
///
/// ```rust
/// use otp_widgets::otp::{new, OtpEvent};
/// use bubbletea_rs::{KeyMsg, Msg};
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let mut otp = new(4);
/// let _ = otp.focus();
/// for c in ['2', '4', '6', '8'] {
///     let msg: Msg = Box::new(KeyMsg {
///         key: KeyCode::Char(c),
///         modifiers: KeyModifiers::NONE,
///     });
///     otp.update(msg);
/// }
/// assert_eq!(otp.value(), "2468");
/// assert!(otp
///     .take_events()
///     .contains(&OtpEvent::Complete("2468".to_string())));
/// ```
pub struct Model {
    /// Placeholder text; its nth character shows in the nth slot while the
    /// value is empty.
    pub placeholder: String,
    /// Style for filled, inactive slots.
    pub slot_style: Style,
    /// Style for slots covered by the selection.
    pub active_slot_style: Style,
    /// Style for placeholder characters.
    pub placeholder_style: Style,
    /// Separator rendered between slot cells.
    pub separator: String,
    /// Width of a slot cell in terminal columns. Values narrower than the
    /// cell are aligned per `text_align`.
    pub slot_width: usize,
    /// The fake caret drawn in the active empty slot.
    pub caret: Caret,
    /// Key bindings.
    pub key_map: KeyMap,
    /// Alignment of a character inside a slot cell wider than one column.
    pub text_align: TextAlign,
    /// Keyboard hint; implies a digits-only filter unless a pattern is set.
    pub input_mode: InputMode,
    /// Class or attribute hook web hosts scope the fallback stylesheet to.
    pub container_class: Option<String>,
    /// An error that was not silently correctable (clipboard failures).
    pub err: Option<String>,

    pub(super) maxlength: usize,
    pub(super) pattern: Option<Regex>,
    pub(super) value: Vec<char>,
    pub(super) sel_start: usize,
    pub(super) sel_end: usize,
    pub(super) focus: bool,
    pub(super) hovering: bool,
    pub(super) disabled: bool,
    pub(super) allow_navigation: bool,
    pub(super) complete_emitted: bool,
    pub(super) last_click_at: Option<Instant>,
    pub(super) events: Vec<OtpEvent>,
    pub(super) pwm: pwm::Model,
}

/// Creates a new OTP input with the given number of slots.
///
/// `maxlength` is normalized to at least 1. The returned model is not
/// focused; call `focus()` to accept keyboard input.
pub fn new(maxlength: usize) -> Model {
    Model {
        placeholder: String::new(),
        slot_style: Style::new(),
        active_slot_style: Style::new().reverse(true),
        placeholder_style: Style::new().foreground(Color::from("240")),
        separator: " ".to_string(),
        slot_width: 1,
        caret: caret::new(),
        key_map: default_key_map(),
        text_align: TextAlign::default(),
        input_mode: InputMode::default(),
        container_class: None,
        err: None,
        maxlength: maxlength.max(1),
        pattern: None,
        value: Vec::new(),
        sel_start: 0,
        sel_end: 0,
        focus: false,
        hovering: false,
        disabled: false,
        allow_navigation: true,
        complete_emitted: false,
        last_click_at: None,
        events: Vec::new(),
        pwm: pwm::new(pwm::PushStrategy::default()),
    }
}

impl Default for Model {
    fn default() -> Self {
        new(DEFAULT_MAXLENGTH)
    }
}

/// Creates a command that starts the fake caret blinking.
///
/// Return this from your application's `init()` (or when focusing the
/// input) after switching the caret to [`caret::Mode::Blink`].
pub fn blink() -> Cmd {
    caret::blink()
}

/// Creates a command that reads the system clipboard and reports the result
/// as a `PasteMsg` / `PasteErrMsg`.
pub fn paste() -> Cmd {
    use bubbletea_rs::tick as bubbletea_tick;
    bubbletea_tick(Duration::from_nanos(1), |_| {
        #[cfg(feature = "clipboard-support")]
        {
            use clipboard::{ClipboardContext, ClipboardProvider};
            let res: Result<String, String> = (|| {
                let mut ctx: ClipboardContext = ClipboardProvider::new()
                    .map_err(|e| format!("Failed to create clipboard context: {}", e))?;
                ctx.get_contents()
                    .map_err(|e| format!("Failed to read clipboard: {}", e))
            })();
            match res {
                Ok(s) => Box::new(PasteMsg(s)) as Msg,
                Err(e) => Box::new(PasteErrMsg(e)) as Msg,
            }
        }
        #[cfg(not(feature = "clipboard-support"))]
        {
            Box::new(PasteErrMsg("Clipboard support not enabled".to_string())) as Msg
        }
    })
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        let model = new(DEFAULT_MAXLENGTH);
        let cmd = model.init();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
