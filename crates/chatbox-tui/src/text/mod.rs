//! Text layout utilities.
//!
//! - [`visual_width`], [`truncate_to_width`] - unicode-aware widths
//! - [`wrap_text`] - word wrapping for message bodies

mod width;
mod wrap;

pub use width::{truncate_to_width, visual_width};
pub use wrap::wrap_text;
