//! Core methods for the OTP input model: the value pipeline, the update
//! loop and configuration.

use super::model::{paste, Model};
use super::types::{
    ClickMsg, HoverMsg, InputMode, OtpEvent, PasteErrMsg, PasteMsg, PointerDownMsg, SelectionMsg,
    SelectionType, TextAlign, TouchEndMsg,
};
use crate::key::matches_binding;
use crate::pwm;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use regex::Regex;
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

impl Model {
    /// Returns the current value.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    /// The configured number of slots.
    pub fn maxlength(&self) -> usize {
        self.maxlength
    }

    /// Whether every slot is filled.
    pub fn is_complete(&self) -> bool {
        self.value.len() == self.maxlength
    }

    /// Drains the outbound notifications accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<OtpEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sets the value programmatically.
    ///
    /// The input is sanitized the same way user input is: characters not
    /// matching the effective filter are dropped and the rest is truncated
    /// to `maxlength`, silently. The caret moves to the end of the accepted
    /// value. Emits `Change` when the accepted value differs from the
    /// current one, and `Complete` on the transition into full length.
    pub fn set_value(&mut self, s: &str) {
        let next = self.sanitize(s);
        let changed = next != self.value;
        self.value = next;
        let end = self.value.len();
        self.set_selection_internal(end, end, false);
        if changed {
            let accepted = self.value();
            self.events.push(OtpEvent::Change(accepted));
        }
        self.update_completion();
    }

    /// Clears the value and resets the caret to the first slot.
    pub fn reset(&mut self) {
        self.set_value("");
    }

    /// Changes the slot count. The value is truncated to fit, silently.
    pub fn set_maxlength(&mut self, maxlength: usize) {
        self.maxlength = maxlength.max(1);
        if self.value.len() > self.maxlength {
            self.value.truncate(self.maxlength);
            let end = self.value.len();
            self.set_selection_internal(end, end, false);
            let accepted = self.value();
            self.events.push(OtpEvent::Change(accepted));
        }
        self.update_completion();
    }

    /// Sets the placeholder text shown while the value is empty.
    pub fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    /// Sets the accepted-character pattern from a compiled regex.
    ///
    /// The pattern is tested per character. See also
    /// [`PATTERN_ONLY_DIGITS`](super::PATTERN_ONLY_DIGITS) and friends.
    pub fn set_pattern(&mut self, pattern: Regex) {
        self.pattern = Some(pattern);
    }

    /// Compiles and sets the accepted-character pattern.
    pub fn set_pattern_str(&mut self, pattern: &str) -> Result<(), regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(())
    }

    /// Removes the explicit pattern; the input-mode filter applies again.
    pub fn clear_pattern(&mut self) {
        self.pattern = None;
    }

    /// Sets the keyboard hint / implied filter.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    /// Sets the in-cell text alignment.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
    }

    /// Enables or disables the widget. A disabled widget ignores input but
    /// still renders and still answers badge-space polls.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether the widget is disabled.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Enables or disables caret navigation keys.
    pub fn set_allow_navigation(&mut self, allow: bool) {
        self.allow_navigation = allow;
    }

    /// Sets the password-manager badge strategy.
    pub fn set_strategy(&mut self, strategy: pwm::PushStrategy) {
        self.pwm.set_strategy(strategy);
    }

    /// The configured password-manager badge strategy.
    pub fn strategy(&self) -> pwm::PushStrategy {
        self.pwm.strategy()
    }

    /// Installs the surface-geometry capability used for badge detection
    /// and returns the command arming the badge-space poll.
    pub fn set_surface_probe(&mut self, probe: Box<dyn pwm::SurfaceProbe>) -> Option<Cmd> {
        self.pwm.set_probe(probe)
    }

    /// Whether a password-manager badge has been detected. Sticky.
    pub fn has_pwm_badge(&self) -> bool {
        self.pwm.has_badge()
    }

    /// Whether the renderer should currently widen the input to push a
    /// detected badge clear of the typed characters.
    pub fn will_push_pwm_badge(&self) -> bool {
        self.pwm.will_push_badge()
    }

    /// The no-script fallback stylesheet for this input, rescoped to the
    /// configured container class when one is set.
    pub fn fallback_style(&self) -> String {
        match &self.container_class {
            Some(class) => crate::fallback::style_for(&format!(".{class}")),
            None => crate::fallback::FALLBACK_STYLE.to_string(),
        }
    }

    /// Returns whether the input currently has focus.
    pub fn focused(&self) -> bool {
        self.focus
    }

    /// Whether the pointer is currently over the widget.
    pub fn hovering(&self) -> bool {
        self.hovering
    }

    /// Initializes the component's background timers (the badge-space
    /// poll, when a surface capability is configured).
    pub fn init(&self) -> Option<Cmd> {
        self.pwm.init()
    }

    /// Focuses the input.
    ///
    /// The caret lands after the last filled slot; on a full value the last
    /// character is selected instead, so typing replaces it. Returns the
    /// command arming the badge-probe session when one is due, otherwise
    /// the caret's own command (or a resolved no-op).
    pub fn focus(&mut self) -> Cmd {
        self.focus = true;
        self.events.push(OtpEvent::Focus);
        let len = self.value.len();
        if len == self.maxlength && len > 0 {
            self.set_selection_internal(len - 1, len, false);
        } else {
            self.set_selection_internal(len, len, false);
        }
        let caret_cmd = self.caret.focus();
        if let Some(cmd) = self.pwm.focus_gained() {
            return cmd;
        }
        caret_cmd.unwrap_or_else(|| Box::pin(async { None }))
    }

    /// Removes focus from the input. Pending caret and probe timers become
    /// stale and are dropped on arrival.
    pub fn blur(&mut self) {
        self.focus = false;
        self.events.push(OtpEvent::Blur);
        self.caret.blur();
        self.pwm.focus_lost();
    }

    /// Processes a message and updates the input state.
    ///
    /// Handles key presses, pointer interactions, paste payloads, selection
    /// mirroring and the component's own timer messages. Notifications
    /// produced along the way are queued for [`take_events`](Model::take_events).
    pub fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        // Hover tracking works regardless of focus or disabled state.
        if let Some(hover) = msg.downcast_ref::<HoverMsg>() {
            self.hovering = hover.hovering;
            return None;
        }

        // Badge probing runs on its own timers, focused or not. A positive
        // detection mid-focus asks for a defensive refocus.
        let pwm_cmd = self.pwm.update(&msg);
        if self.pwm.take_refocus_request() {
            self.refocus_for_badge();
        }
        if pwm_cmd.is_some() {
            return pwm_cmd;
        }

        if self.disabled {
            return None;
        }

        if msg.downcast_ref::<PointerDownMsg>().is_some() {
            self.pointer_down(Instant::now());
            return None;
        }

        if let Some(click) = msg.downcast_ref::<ClickMsg>() {
            self.click_slot(click.slot);
            return None;
        }

        if msg.downcast_ref::<TouchEndMsg>().is_some() {
            // Touch selection can drift past the filled region; snap back.
            let (start, end) = (self.sel_start, self.sel_end);
            self.set_selection_internal(start, end, true);
            return None;
        }

        if let Some(sel) = msg.downcast_ref::<SelectionMsg>() {
            self.set_selection_range(sel.start, sel.end);
            return None;
        }

        if !self.focus {
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if matches_binding(key_msg, &self.key_map.paste) {
                return Some(paste());
            }
            if matches_binding(key_msg, &self.key_map.select_all) {
                self.select_all();
                return None;
            }

            self.handle_navigation_keys(key_msg);
            self.handle_deletion_keys(key_msg);
            self.handle_character_input(key_msg);
        }

        if let Some(paste_msg) = msg.downcast_ref::<PasteMsg>() {
            self.insert_paste(&paste_msg.0);
        }

        if let Some(paste_err) = msg.downcast_ref::<PasteErrMsg>() {
            self.err = Some(paste_err.0.clone());
        }

        // Forward blink timing to the caret.
        self.caret.update(&msg)
    }

    fn handle_navigation_keys(&mut self, key_msg: &KeyMsg) {
        if !self.allow_navigation {
            return;
        }
        let len = self.value.len();

        if matches_binding(key_msg, &self.key_map.slot_backward) {
            let pos = match self.selection_type() {
                // A range collapses to its left edge first.
                SelectionType::Char | SelectionType::Multi => self.sel_start,
                SelectionType::Caret => self.sel_start.saturating_sub(1),
            };
            self.caret_to(pos);
        } else if matches_binding(key_msg, &self.key_map.slot_forward) {
            let pos = match self.selection_type() {
                SelectionType::Char | SelectionType::Multi => self.sel_end,
                SelectionType::Caret => (self.sel_start + 1).min(len),
            };
            self.caret_to(pos);
        } else if matches_binding(key_msg, &self.key_map.line_start) {
            self.caret_to(0);
        } else if matches_binding(key_msg, &self.key_map.line_end) {
            self.caret_to(len);
        }
    }

    fn handle_deletion_keys(&mut self, key_msg: &KeyMsg) {
        if matches_binding(key_msg, &self.key_map.delete_character_backward) {
            match self.selection_type() {
                SelectionType::Char | SelectionType::Multi => self.delete_selected_range(),
                SelectionType::Caret => {
                    if self.sel_start > 0 {
                        let pos = self.sel_start - 1;
                        self.value.remove(pos);
                        self.set_selection_internal(pos, pos, true);
                        self.after_value_mutation();
                    }
                }
            }
        } else if matches_binding(key_msg, &self.key_map.delete_character_forward) {
            match self.selection_type() {
                SelectionType::Char | SelectionType::Multi => self.delete_selected_range(),
                SelectionType::Caret => {
                    if self.sel_start < self.value.len() {
                        self.value.remove(self.sel_start);
                        self.after_value_mutation();
                    }
                }
            }
        }
    }

    fn delete_selected_range(&mut self) {
        let (start, end) = (self.sel_start, self.sel_end);
        self.value.drain(start..end);
        self.set_selection_internal(start, start, true);
        self.after_value_mutation();
    }

    fn handle_character_input(&mut self, key_msg: &KeyMsg) {
        let ch = match key_msg.key {
            KeyCode::Char(c) => c,
            _ => return,
        };
        if key_msg.modifiers.contains(KeyModifiers::CONTROL)
            || key_msg.modifiers.contains(KeyModifiers::ALT)
        {
            return;
        }
        // Filtering is silent: a rejected character changes nothing.
        if !self.char_allowed(ch) {
            return;
        }

        match self.selection_type() {
            SelectionType::Char | SelectionType::Multi => {
                let (start, end) = (self.sel_start, self.sel_end);
                self.value.splice(start..end, std::iter::once(ch));
                self.set_selection_internal(start + 1, start + 1, true);
                self.after_value_mutation();
            }
            SelectionType::Caret => {
                if self.value.len() < self.maxlength {
                    self.value.insert(self.sel_start, ch);
                    let pos = self.sel_start + 1;
                    self.set_selection_internal(pos, pos, true);
                    self.after_value_mutation();
                }
                // Full with nothing selected: native maxlength behavior,
                // the keystroke is dropped.
            }
        }
    }

    /// Inserts pasted text at the current selection: the selected range is
    /// replaced, trailing characters shift right, overflow past `maxlength`
    /// is truncated.
    pub(super) fn insert_paste(&mut self, raw: &str) {
        self.events.push(OtpEvent::Paste);
        let pasted = self.sanitize(raw);
        if pasted.is_empty() {
            return;
        }

        let (start, end) = (self.sel_start, self.sel_end);
        let mut next: Vec<char> = Vec::with_capacity(self.value.len() + pasted.len());
        next.extend_from_slice(&self.value[..start]);
        next.extend_from_slice(&pasted);
        next.extend_from_slice(&self.value[end..]);
        next.truncate(self.maxlength);

        let caret = (start + pasted.len()).min(next.len());
        if next != self.value {
            self.value = next;
            self.set_selection_internal(caret, caret, true);
            self.after_value_mutation();
        } else {
            self.set_selection_internal(caret, caret, true);
        }
    }

    /// Applies the sanitation pipeline: single-scalar graphemes only, the
    /// effective character filter, then the length clamp.
    pub(super) fn sanitize(&self, raw: &str) -> Vec<char> {
        raw.graphemes(true)
            .filter_map(|g| {
                let mut chars = g.chars();
                let first = chars.next()?;
                // Multi-scalar graphemes cannot occupy a single slot.
                if chars.next().is_some() {
                    return None;
                }
                Some(first)
            })
            .filter(|c| self.char_allowed(*c))
            .take(self.maxlength)
            .collect()
    }

    fn char_allowed(&self, ch: char) -> bool {
        if let Some(re) = &self.pattern {
            let mut buf = [0u8; 4];
            re.is_match(ch.encode_utf8(&mut buf))
        } else if self.input_mode.implies_digits() {
            ch.is_ascii_digit()
        } else {
            true
        }
    }

    pub(super) fn after_value_mutation(&mut self) {
        self.err = None;
        let accepted = self.value();
        self.events.push(OtpEvent::Input(accepted.clone()));
        self.events.push(OtpEvent::Change(accepted));
        self.update_completion();
    }

    fn update_completion(&mut self) {
        if self.value.len() == self.maxlength {
            if !self.complete_emitted {
                self.complete_emitted = true;
                self.events.push(OtpEvent::Complete(self.value()));
            }
        } else {
            self.complete_emitted = false;
        }
    }

    /// Works around browsers that glitch the caret when a badge is
    /// injected mid-focus: blur, refocus, restore the selection range.
    fn refocus_for_badge(&mut self) {
        if !self.focus {
            return;
        }
        let (start, end) = (self.sel_start, self.sel_end);
        self.blur();
        let _ = self.focus();
        self.set_selection_internal(start, end, false);
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        Some(Model::focus(self))
    }

    fn blur(&mut self) {
        Model::blur(self)
    }

    fn focused(&self) -> bool {
        Model::focused(self)
    }
}
