//! Render Snapshot
//!
//! What a surface needs to draw the mask: visibility, the opaque
//! background value, and the text typed so far plus its cursor.

use std::fmt;

use serde::Serialize;

use crate::machine::PhaseKind;

/// Whether the mask is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Self::Visible
        } else {
            Self::Hidden
        }
    }

    /// CSS-style keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }

    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of everything a surface renders
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MaskView {
    /// Phase the snapshot was taken in
    pub phase: PhaseKind,
    pub visibility: Visibility,
    /// Background value, passed through untouched
    pub background: String,
    /// Revealed prefix of the message (empty in safe mode)
    pub fragment: String,
    /// Trailing cursor, if one is shown
    pub cursor: Option<char>,
}

impl MaskView {
    /// Hidden, empty mask
    pub fn hidden(background: impl Into<String>) -> Self {
        Self {
            phase: PhaseKind::Off,
            visibility: Visibility::Hidden,
            background: background.into(),
            fragment: String::new(),
            cursor: None,
        }
    }

    /// Fragment followed by the cursor
    pub fn display_text(&self) -> String {
        let mut text = self.fragment.clone();
        if let Some(cursor) = self.cursor {
            text.push(cursor);
        }
        text
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }
}

impl Default for MaskView {
    fn default() -> Self {
        Self::hidden(String::new())
    }
}
