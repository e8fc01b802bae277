//! Mask Widget
//!
//! Draws a [`MaskView`] as a full-area opaque overlay with the typed
//! message centered on it.
//!
//! ```text
//!   ┌────────────────────────────────────┐
//!   │░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░│
//!   │░░░░░░░ Reticulating splines_ ░░░░░░│
//!   │░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░│
//!   └────────────────────────────────────┘
//! ```
//!
//! A hidden view renders nothing, leaving whatever is underneath intact.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Clear, Widget};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use memeload_core::MaskView;

use crate::theme::{background_color, MASK_TEXT};

/// Horizontal breathing room on each side of the message
const SIDE_MARGIN: u16 = 2;

/// Full-screen loading overlay
pub struct MaskWidget<'a> {
    view: &'a MaskView,
    text_color: Color,
}

impl<'a> MaskWidget<'a> {
    pub fn new(view: &'a MaskView) -> Self {
        Self {
            view,
            text_color: MASK_TEXT,
        }
    }

    /// Message lines wrapped to the usable width
    fn lines(&self, width: u16) -> Vec<String> {
        let text = self.view.display_text();
        if text.is_empty() {
            return Vec::new();
        }
        let usable = width.saturating_sub(SIDE_MARGIN * 2).max(1) as usize;
        wrap(&text, usable)
            .into_iter()
            .map(|cow| cow.into_owned())
            .collect()
    }
}

impl Widget for MaskWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.view.is_visible() || area.is_empty() {
            return;
        }

        let bg = background_color(&self.view.background);
        Clear.render(area, buf);
        buf.set_style(area, Style::default().bg(bg));

        let lines = self.lines(area.width);
        let shown = lines.len().min(area.height as usize);
        let top = area.y + (area.height - shown as u16) / 2;
        let style = Style::default().fg(self.text_color).bg(bg);

        for (i, line) in lines.iter().take(shown).enumerate() {
            let width = (line.width() as u16).min(area.width);
            let x = area.x + (area.width - width) / 2;
            buf.set_stringn(x, top + i as u16, line, area.width as usize, style);
        }
    }
}
