//! Key bindings for the OTP input component.

use crate::key::{new_binding, with_help, with_keys_str, Binding};

/// KeyMap is the key bindings for the actions available inside the OTP
/// input.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Move the caret one slot right.
    pub slot_forward: Binding,
    /// Move the caret one slot left.
    pub slot_backward: Binding,
    /// Jump the caret to the first slot.
    pub line_start: Binding,
    /// Jump the caret past the last filled slot.
    pub line_end: Binding,
    /// Delete one character backward, or the selected range.
    pub delete_character_backward: Binding,
    /// Delete one character forward, or the selected range.
    pub delete_character_forward: Binding,
    /// Select the entire value.
    pub select_all: Binding,
    /// Paste from clipboard.
    pub paste: Binding,
}

/// The default set of key bindings for navigating and editing the OTP
/// input.
pub fn default_key_map() -> KeyMap {
    KeyMap {
        slot_forward: new_binding(vec![
            with_keys_str(&["right", "ctrl+f"]),
            with_help("→", "next slot"),
        ]),
        slot_backward: new_binding(vec![
            with_keys_str(&["left", "ctrl+b"]),
            with_help("←", "previous slot"),
        ]),
        line_start: new_binding(vec![
            with_keys_str(&["home"]),
            with_help("home", "first slot"),
        ]),
        line_end: new_binding(vec![
            with_keys_str(&["end"]),
            with_help("end", "last slot"),
        ]),
        delete_character_backward: new_binding(vec![
            with_keys_str(&["backspace", "ctrl+h"]),
            with_help("⌫", "delete"),
        ]),
        delete_character_forward: new_binding(vec![
            with_keys_str(&["delete", "ctrl+d"]),
            with_help("del", "delete forward"),
        ]),
        select_all: new_binding(vec![
            with_keys_str(&["ctrl+a"]),
            with_help("ctrl+a", "select all"),
        ]),
        paste: new_binding(vec![
            with_keys_str(&["ctrl+v"]),
            with_help("ctrl+v", "paste"),
        ]),
    }
}
