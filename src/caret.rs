//! Fake caret for the OTP input's slots.
//!
//! The widget hides the native caret by design: the real input is invisible
//! in typical presentations, so a render-layer caret is substituted inside
//! whichever slot is active. This component owns the caret's visibility
//! state and blink scheduling. It is embedded in the OTP model and updated
//! by forwarding messages.
//!
//! The default mode is [`Mode::Static`]: a constantly visible bar, matching
//! presentations where blinking is handled by the render layer itself.
//! Hosts that want timer-driven blinking set [`Mode::Blink`] and execute the
//! returned command.
//!
//! ### Example
//! ```rust
//! use otp_widgets::caret;
//!
//! let mut caret = caret::new();
//! let _ = caret.focus();
//! let _maybe_cmd = caret.set_mode(caret::Mode::Blink);
//! assert!(!caret.view().is_empty());
//! ```

use bubbletea_rs::{tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// Used to ensure that blink messages are only received by the caret that
// scheduled them.
static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed)
}

const DEFAULT_BLINK_SPEED: Duration = Duration::from_millis(530);

/// Glyph drawn for the caret. A thin vertical bar reads as a caret in a
/// single-cell slot.
pub const DEFAULT_GLYPH: &str = "│";

// --- Messages ---

/// Message to start the caret blinking.
#[derive(Debug, Clone)]
pub struct InitialBlinkMsg;

/// Message that signals the caret should toggle its blink phase.
#[derive(Debug, Clone)]
pub struct BlinkMsg {
    /// Identifier of the caret instance this message targets.
    pub id: usize,
    /// Sequence tag rejecting blink messages from a stale schedule.
    pub tag: usize,
}

// --- Mode ---

/// Describes the behavior of the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The caret blinks on a timer.
    Blink,
    /// The caret is constantly visible while focused.
    Static,
    /// The caret is never drawn.
    Hide,
}

// --- Model ---

/// The caret sub-component.
#[derive(Debug, Clone)]
pub struct Model {
    /// The speed at which the caret blinks.
    pub blink_speed: Duration,
    /// Style applied to the caret glyph when visible.
    pub style: Style,
    /// Glyph drawn when the caret is visible.
    pub glyph: String,

    id: usize,
    focus: bool,
    // Inverted: when `blink` is true the caret is in its hidden phase.
    blink: bool,
    blink_tag: usize,
    mode: Mode,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            blink_speed: DEFAULT_BLINK_SPEED,
            style: Style::new(),
            glyph: DEFAULT_GLYPH.to_string(),
            id: next_id(),
            focus: false,
            blink: true,
            blink_tag: 0,
            mode: Mode::Static,
        }
    }
}

impl Model {
    /// Creates a new caret with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the caret should currently be drawn.
    pub fn visible(&self) -> bool {
        self.focus && self.mode != Mode::Hide && !self.blink
    }

    /// Handles caret-related messages. The caret is a sub-component managed
    /// by the OTP model, so this is not a `bubbletea_rs::Model` impl.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if msg.downcast_ref::<InitialBlinkMsg>().is_some() {
            if self.mode != Mode::Blink || !self.focus {
                return None;
            }
            return self.blink_cmd();
        }

        if let Some(blink_msg) = msg.downcast_ref::<BlinkMsg>() {
            if self.mode != Mode::Blink || !self.focus {
                return None;
            }

            // Were we expecting this blink message?
            if blink_msg.id != self.id || blink_msg.tag != self.blink_tag {
                return None;
            }

            self.blink = !self.blink;
            return self.blink_cmd();
        }

        None
    }

    /// Returns the caret's mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Sets the caret's mode, returning a command when blinking must start.
    pub fn set_mode(&mut self, mode: Mode) -> Option<Cmd> {
        self.mode = mode;
        self.blink = self.mode == Mode::Hide || !self.focus;
        if mode == Mode::Blink {
            return Some(blink());
        }
        None
    }

    /// Schedules the next blink toggle.
    fn blink_cmd(&mut self) -> Option<Cmd> {
        if self.mode != Mode::Blink {
            return None;
        }

        self.blink_tag += 1;
        let tag = self.blink_tag;
        let id = self.id;
        let speed = self.blink_speed;

        Some(tick(speed, move |_| Box::new(BlinkMsg { id, tag }) as Msg))
    }

    /// Focuses the caret, making it visible and (in blink mode) scheduling
    /// the blink cycle.
    pub fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        self.blink = self.mode == Mode::Hide;
        if self.mode == Mode::Blink {
            return self.blink_cmd();
        }
        None
    }

    /// Blurs the caret. Pending blink messages become stale and are dropped
    /// on arrival.
    pub fn blur(&mut self) {
        self.focus = false;
        self.blink = true;
    }

    /// Check if the caret is focused.
    pub fn focused(&self) -> bool {
        self.focus
    }

    /// Renders the caret cell: the styled glyph when visible, a space
    /// otherwise so the slot keeps its width.
    pub fn view(&self) -> String {
        if !self.visible() {
            return " ".to_string();
        }
        self.style.clone().inline(true).render(&self.glyph)
    }
}

/// A command to initialize caret blinking.
pub fn blink() -> Cmd {
    tick(Duration::from_millis(0), |_| {
        Box::new(InitialBlinkMsg) as Msg
    })
}

/// Create a new caret model. Equivalent to `Model::new()`.
pub fn new() -> Model {
    Model::new()
}
