//! One-time-password input component.
//!
//! A row of single-character slots backed by one canonical value and one
//! emulated selection range. The component classifies the selection as a
//! caret, a single-character selection or a range; derives which slots are
//! active; and substitutes a fake caret for the hidden native one.
//!
//! # Basic Usage
//!
//! ```rust
//! use otp_widgets::otp::new;
//!
//! let mut otp = new(6);
//! otp.set_placeholder("······");
//! let _ = otp.focus();
//! ```
//!
//! # Notifications
//!
//! Value changes, completion, focus transitions and selection changes are
//! queued as [`OtpEvent`]s and drained with [`Model::take_events`]:
//!
//! ```rust
//! use otp_widgets::otp::{new, OtpEvent};
//!
//! let mut otp = new(4);
//! otp.set_value("1234");
//! let events = otp.take_events();
//! assert!(events.contains(&OtpEvent::Complete("1234".to_string())));
//! ```
//!
//! # Pointer input
//!
//! bubbletea-rs carries no pointer events, so hosts synthesize them: a
//! resolved slot index in a [`ClickMsg`], presses as [`PointerDownMsg`]
//! (two presses inside the double-click window select the whole value),
//! hover transitions as [`HoverMsg`].

pub mod keymap;
pub mod methods;
pub mod model;
pub mod selection;
pub mod types;
pub mod view;


// Re-export main types and functions for the public API
pub use keymap::{default_key_map, KeyMap};
pub use model::{blink, new, paste, Model, DEFAULT_MAXLENGTH};
pub use selection::derive_selection_type;
pub use types::{
    ClickMsg, HoverMsg, InputMode, OtpEvent, PasteErrMsg, PasteMsg, PointerDownMsg, RenderProps,
    SelectionMsg, SelectionType, Slot, TextAlign, TouchEndMsg, PATTERN_ONLY_CHARS,
    PATTERN_ONLY_DIGITS, PATTERN_ONLY_DIGITS_AND_CHARS,
};
