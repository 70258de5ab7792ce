//! Selection derivation and pointer interaction.
//!
//! The emulated native input owns one selection range; everything the
//! renderer needs (active slots, fake caret placement) derives from it.

use super::model::Model;
use super::types::{OtpEvent, SelectionType};
use std::time::{Duration, Instant};

/// Two pointer presses within this window count as a double click.
pub(super) const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Classifies a selection range against a value length: a collapsed range
/// is a caret, a one-character range selects a single char, anything wider
/// is a multi-selection. An empty value always reads as a caret.
pub fn derive_selection_type(start: usize, end: usize, len: usize) -> SelectionType {
    if len == 0 || start == end {
        SelectionType::Caret
    } else if end - start == 1 {
        SelectionType::Char
    } else {
        SelectionType::Multi
    }
}

impl Model {
    /// The current selection range, in characters.
    pub fn selection(&self) -> (usize, usize) {
        (self.sel_start, self.sel_end)
    }

    /// Classification of the current selection.
    pub fn selection_type(&self) -> SelectionType {
        derive_selection_type(self.sel_start, self.sel_end, self.value.len())
    }

    /// Sets the selection range, clamped into the filled region, and
    /// notifies on change. Used by hosts mirroring a native `select` event.
    pub fn set_selection_range(&mut self, start: usize, end: usize) {
        self.set_selection_internal(start, end, true);
    }

    pub(super) fn set_selection_internal(&mut self, start: usize, end: usize, notify: bool) {
        let len = self.value.len();
        let end = end.min(len);
        let start = start.min(end);
        if (start, end) == (self.sel_start, self.sel_end) {
            return;
        }
        self.sel_start = start;
        self.sel_end = end;
        if notify {
            self.events.push(OtpEvent::Select);
        }
    }

    pub(super) fn caret_to(&mut self, pos: usize) {
        self.set_selection_internal(pos, pos, true);
    }

    /// Selects the entire value. A no-op while the value is empty.
    pub fn select_all(&mut self) {
        let len = self.value.len();
        if len == 0 {
            return;
        }
        self.set_selection_internal(0, len, true);
    }

    pub(super) fn pointer_down(&mut self, now: Instant) {
        let double = self
            .last_click_at
            .map_or(false, |prev| now.duration_since(prev) <= DOUBLE_CLICK_WINDOW);
        self.last_click_at = Some(now);
        if double {
            self.select_all();
        }
    }

    pub(super) fn click_slot(&mut self, slot: usize) {
        self.events.push(OtpEvent::Click);
        let len = self.value.len();
        // A fresh double-click selection survives the trailing click of the
        // same gesture.
        if len > 0
            && self.sel_start == 0
            && self.sel_end == len
            && self.selection_type() != SelectionType::Caret
        {
            return;
        }
        // The caret lands adjacent to the clicked slot, clamped to the
        // filled region: the clicked cell may be empty while earlier slots
        // hold characters.
        self.caret_to(slot.min(len));
    }

    /// The half-open range of slot indices covered by the selection while
    /// the input is focused.
    pub(super) fn active_range(&self) -> Option<(usize, usize)> {
        if !self.focus {
            return None;
        }
        match self.selection_type() {
            SelectionType::Caret => {
                let i = self.sel_start.min(self.maxlength - 1);
                Some((i, i + 1))
            }
            _ => Some((self.sel_start, self.sel_end)),
        }
    }
}
