#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/otp-widgets/")]

//! # otp-widgets
//!
//! A one-time-password input component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: a row of single-character slots that behaves as one logical
//! text input.
//!
//! ## Overview
//!
//! The widget keeps a single canonical value and projects it onto a fixed
//! number of slots. A hidden, emulated text input owns the selection range;
//! the component derives which slots are "active", classifies the selection
//! (caret, single character, or range), and substitutes a fake caret for the
//! native one. The projection is available both as a declarative
//! [`otp::RenderProps`] for external renderers and as a styled terminal
//! `view()` for bubbletea-rs programs.
//!
//! The component follows the Elm Architecture pattern: `update()` consumes
//! messages (key presses, pointer events, paste payloads, timer ticks) and
//! `view()` renders the current state. Outbound notifications — value
//! changes, completion, focus transitions — accumulate as [`otp::OtpEvent`]s
//! and are drained with [`otp::Model::take_events`].
//!
//! ## Password-manager badge avoidance
//!
//! When the widget is embedded on a web surface (for example through a WASM
//! bridge), browser password-manager extensions may inject a badge over the
//! input's right edge. The [`pwm`] module probes the surface geometry after
//! focus and reports whether the input should grow to push the badge clear
//! of the typed characters. Hosts provide geometry through the
//! [`pwm::SurfaceProbe`] capability trait; terminal hosts simply never set
//! one and the module stays inert.
//!
//! ## Quick Start
//!
//! ```rust
//! use otp_widgets::prelude::*;
//! use bubbletea_rs::{Model, Cmd, Msg};
//!
//! struct App {
//!     otp: OtpInput,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut otp = otp_new(6);
//!         otp.set_placeholder("······");
//!         let focus_cmd = otp.focus();
//!         (Self { otp }, Some(focus_cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         let cmd = self.otp.update(msg);
//!         for event in self.otp.take_events() {
//!             if let OtpEvent::Complete(code) = event {
//!                 // verify `code` against your backend here
//!                 let _ = code;
//!             }
//!         }
//!         cmd
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Enter code: {}", self.otp.view())
//!     }
//! }
//! ```

pub mod caret;
pub mod fallback;
pub mod key;
pub mod otp;
pub mod pwm;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// `focus()` may return a command used to start timers tied to the focused
/// state (caret blinking, badge probing); `blur()` unsets the focused state
/// and invalidates those timers.
pub trait Component {
    /// Sets the component to focused state, optionally returning a command
    /// to be executed by the bubbletea runtime.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use caret::Model as Caret;
pub use key::{
    matches_binding, new_binding, with_help, with_keys, with_keys_str, Binding, KeyPress,
};
pub use otp::{
    blink, default_key_map as otp_default_key_map, new as otp_new, InputMode, KeyMap as OtpKeyMap,
    Model as OtpInput, OtpEvent, PasteErrMsg, PasteMsg, RenderProps, SelectionType, Slot,
    TextAlign,
};
pub use pwm::{PushStrategy, Rect, SurfaceProbe};

/// Prelude module for convenient imports.
///
/// ```rust
/// use otp_widgets::prelude::*;
/// ```
pub mod prelude {
    pub use crate::caret::Model as Caret;
    pub use crate::key::{
        matches_binding, new_binding, with_help, with_keys, with_keys_str, Binding, KeyPress,
    };
    pub use crate::otp::{
        blink, default_key_map as otp_default_key_map, new as otp_new, InputMode,
        KeyMap as OtpKeyMap, Model as OtpInput, OtpEvent, PasteErrMsg, PasteMsg, RenderProps,
        SelectionType, Slot, TextAlign,
    };
    pub use crate::pwm::{PushStrategy, Rect, SurfaceProbe};
    pub use crate::Component;
}
