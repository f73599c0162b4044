//! Font loading and glyph atlas packing.

pub(crate) mod atlas;
mod font_system;

pub use font_system::{FontId, FontLoadError, FontSource, FontSystem, SYSTEM_FONT_PATHS};
