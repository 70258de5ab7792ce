//! Type-safe key bindings for the OTP input.
//!
//! Bindings are built with functional options, so key maps read as data:
//!
//! ```rust
//! use otp_widgets::key::{new_binding, with_help, with_keys_str};
//!
//! let forward = new_binding(vec![
//!     with_keys_str(&["right", "ctrl+f"]),
//!     with_help("→", "next slot"),
//! ]);
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key chord: a key code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key itself.
    pub code: KeyCode,
    /// Modifier keys that must be active.
    pub mods: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, mods): (KeyCode, KeyModifiers)) -> Self {
        Self { code, mods }
    }
}

/// A binding: the key presses that trigger an action, plus help text.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help_key: String,
    help_desc: String,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from a list of key presses.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Attaches help text shown by help views.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help_key = key.into();
        self.help_desc = desc.into();
        self
    }

    /// Returns the help text as a `(key, description)` pair.
    pub fn help(&self) -> (&str, &str) {
        (&self.help_key, &self.help_desc)
    }

    /// Enables or disables the binding. Disabled bindings never match.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the binding currently participates in matching.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Whether the given key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled()
            && self
                .keys
                .iter()
                .any(|k| k.code == msg.key && k.mods == msg.modifiers)
    }
}

/// A functional option consumed by [`new_binding`].
#[derive(Debug, Clone)]
pub enum BindingOpt {
    /// Sets the binding's key presses.
    Keys(Vec<KeyPress>),
    /// Sets the binding's help text.
    Help(String, String),
    /// Creates the binding disabled.
    Disabled,
}

/// Builds a [`Binding`] from a list of options.
pub fn new_binding(opts: Vec<BindingOpt>) -> Binding {
    let mut binding = Binding::default();
    for opt in opts {
        match opt {
            BindingOpt::Keys(keys) => binding.keys = keys,
            BindingOpt::Help(key, desc) => {
                binding.help_key = key;
                binding.help_desc = desc;
            }
            BindingOpt::Disabled => binding.disabled = true,
        }
    }
    binding
}

/// Option: bind the given key presses.
pub fn with_keys<K: Into<KeyPress>>(keys: Vec<K>) -> BindingOpt {
    BindingOpt::Keys(keys.into_iter().map(Into::into).collect())
}

/// Option: bind keys given as strings, e.g. `"left"`, `"ctrl+v"`, `"alt+backspace"`.
///
/// Unrecognized strings are skipped; a binding that ends up with no keys
/// never matches.
pub fn with_keys_str(keys: &[&str]) -> BindingOpt {
    BindingOpt::Keys(keys.iter().filter_map(|s| parse_key(s)).collect())
}

/// Option: attach help text.
pub fn with_help(key: impl Into<String>, desc: impl Into<String>) -> BindingOpt {
    BindingOpt::Help(key.into(), desc.into())
}

/// Option: create the binding disabled.
pub fn with_disabled() -> BindingOpt {
    BindingOpt::Disabled
}

/// Whether the key message triggers the binding. Free-function form used by
/// update loops.
pub fn matches_binding(msg: &KeyMsg, binding: &Binding) -> bool {
    binding.matches(msg)
}

fn parse_key(s: &str) -> Option<KeyPress> {
    let mut mods = KeyModifiers::NONE;
    let mut name = s;

    while let Some((prefix, rest)) = name.split_once('+') {
        match prefix {
            "ctrl" => mods |= KeyModifiers::CONTROL,
            "alt" => mods |= KeyModifiers::ALT,
            "shift" => mods |= KeyModifiers::SHIFT,
            _ => return None,
        }
        name = rest;
    }

    let code = match name {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(c)
        }
    };

    Some(KeyPress { code, mods })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: mods,
        }
    }

    #[test]
    fn test_parse_plain_and_modified_keys() {
        let b = new_binding(vec![with_keys_str(&["left", "ctrl+b"])]);
        assert!(b.matches(&key(KeyCode::Left, KeyModifiers::NONE)));
        assert!(b.matches(&key(KeyCode::Char('b'), KeyModifiers::CONTROL)));
        assert!(!b.matches(&key(KeyCode::Char('b'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let b = new_binding(vec![with_keys_str(&["bogus-key", "end"])]);
        assert!(b.matches(&key(KeyCode::End, KeyModifiers::NONE)));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = new_binding(vec![with_keys_str(&["home"])]);
        b.set_enabled(false);
        assert!(!b.matches(&key(KeyCode::Home, KeyModifiers::NONE)));
        b.set_enabled(true);
        assert!(b.matches(&key(KeyCode::Home, KeyModifiers::NONE)));
    }

    #[test]
    fn test_help_text() {
        let b = new_binding(vec![
            with_keys_str(&["ctrl+v"]),
            with_help("ctrl+v", "paste"),
        ]);
        assert_eq!(b.help(), ("ctrl+v", "paste"));
    }
}
