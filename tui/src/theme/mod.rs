//! Theme and Colors
//!
//! The mask palette plus the translation from a free-form background value
//! to a terminal color.
//!
//! Background values come from web-flavored config, so they may be named
//! colors, `#rrggbb`, or CSS `rgb()`/`rgba()`. Terminals can't blend, so
//! alpha is dropped and the mask is always drawn opaque.

use std::str::FromStr;

use ratatui::style::Color;

// ============================================================================
// Mask Palette
// ============================================================================

/// Default mask background when none is configured (near-black slate)
pub const MASK_BACKGROUND: Color = Color::Rgb(18, 18, 24);

/// Typed message text
pub const MASK_TEXT: Color = Color::Rgb(235, 235, 235);

// ============================================================================
// UI Colors
// ============================================================================

/// Title/accent
pub const ACCENT_MAGENTA: Color = Color::Magenta;

/// Secondary text (command output, hints)
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Failed job
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Finished job
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Running job
pub const RUNNING_BLUE: Color = Color::Rgb(150, 180, 255);

// ============================================================================
// Background Parsing
// ============================================================================

/// Resolve a configured background to a terminal color
///
/// Empty or unparseable values fall back to [`MASK_BACKGROUND`].
pub fn background_color(value: &str) -> Color {
    parse_color(value).unwrap_or(MASK_BACKGROUND)
}

/// Parse a background value, `None` when it isn't understood
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(color) = parse_css_rgb(value) {
        return Some(color);
    }
    Color::from_str(value).ok()
}

/// `rgb(r, g, b)` or `rgba(r, g, b, a)`, alpha ignored
fn parse_css_rgb(value: &str) -> Option<Color> {
    let lower = value.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let mut parts = inner.split(',').map(str::trim);
    let r = parts.next()?.parse::<u8>().ok()?;
    let g = parts.next()?.parse::<u8>().ok()?;
    let b = parts.next()?.parse::<u8>().ok()?;
    Some(Color::Rgb(r, g, b))
}
