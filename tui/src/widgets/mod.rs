//! Widgets
//!
//! - [`MaskWidget`]: the loading overlay itself
//! - [`JobPanel`]: command list drawn underneath the overlay

mod jobs;
mod mask;

pub use jobs::JobPanel;
pub use mask::MaskWidget;
