//! Render projection and terminal view for the OTP input.

use super::model::Model;
use super::types::{RenderProps, Slot, TextAlign};
use unicode_width::UnicodeWidthChar;

impl Model {
    /// Recomputes the declarative render projection.
    ///
    /// The projection always carries exactly `maxlength` slots, whatever
    /// the current value length. External renderers consume this; the
    /// crate's own [`view`](Model::view) is one such consumer.
    pub fn render(&self) -> RenderProps {
        let caret_selection = matches!(
            self.selection_type(),
            super::types::SelectionType::Caret
        );
        let active = self.active_range();

        let slots = (0..self.maxlength)
            .map(|i| {
                let ch = self.value.get(i).copied();
                let is_active = active.map_or(false, |(start, end)| i >= start && i < end);
                let has_fake_caret = is_active && caret_selection && ch.is_none();
                let placeholder = if self.value.is_empty() {
                    self.placeholder.chars().nth(i)
                } else {
                    None
                };
                Slot {
                    char: ch,
                    is_active,
                    has_fake_caret,
                    placeholder,
                }
            })
            .collect();

        RenderProps {
            slots,
            is_focused: self.focus,
            is_hovering: self.hovering,
        }
    }

    /// View renders the slot row in its current state.
    pub fn view(&self) -> String {
        let props = self.render();
        let mut out = String::new();
        for (i, slot) in props.slots.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separator);
            }
            out.push_str(&self.render_slot(slot));
        }
        out
    }

    fn render_slot(&self, slot: &Slot) -> String {
        if slot.has_fake_caret {
            let (left, right) = self.cell_padding(1);
            return format!(
                "{}{}{}",
                " ".repeat(left),
                self.caret.view(),
                " ".repeat(right)
            );
        }

        if let Some(ch) = slot.char {
            let cell = self.pad_cell(ch);
            if slot.is_active {
                return self.active_slot_style.clone().inline(true).render(&cell);
            }
            return self.slot_style.clone().inline(true).render(&cell);
        }

        if let Some(ph) = slot.placeholder {
            return self
                .placeholder_style
                .clone()
                .inline(true)
                .render(&self.pad_cell(ph));
        }

        let cell = " ".repeat(self.slot_width.max(1));
        if slot.is_active {
            return self.active_slot_style.clone().inline(true).render(&cell);
        }
        self.slot_style.clone().inline(true).render(&cell)
    }

    fn pad_cell(&self, ch: char) -> String {
        let width = UnicodeWidthChar::width(ch).unwrap_or(0);
        let (left, right) = self.cell_padding(width);
        format!("{}{}{}", " ".repeat(left), ch, " ".repeat(right))
    }

    fn cell_padding(&self, content_width: usize) -> (usize, usize) {
        let target = self.slot_width.max(1);
        if content_width >= target {
            return (0, 0);
        }
        let pad = target - content_width;
        match self.text_align {
            TextAlign::Left => (0, pad),
            TextAlign::Center => (pad / 2, pad - pad / 2),
            TextAlign::Right => (pad, 0),
        }
    }
}
