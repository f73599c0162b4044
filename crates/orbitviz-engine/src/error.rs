use std::fmt;
use std::path::PathBuf;

use crate::text::FontLoadError;

/// Errors reported at the library boundary.
///
/// Nothing in the engine exits the process on its own; binaries that want the
/// terminate-on-failure behavior route these through [`crate::fatal::OrExit`].
#[derive(Debug, Clone, PartialEq)]
pub enum VizError {
    /// Tessellation needs at least a 2 × 2 sample grid.
    GridTooSmall { rows: usize, cols: usize },

    /// Backing storage length does not match `rows * cols`.
    GridShape { rows: usize, cols: usize, len: usize },

    /// An image file could not be read or decoded.
    ImageLoad { path: PathBuf, reason: String },

    /// Raw RGBA8 pixel data does not match the declared texture size.
    TextureSize { width: u32, height: u32, len: usize },

    /// Font bytes could not be read or parsed.
    FontLoad(FontLoadError),

    /// No usable font was found among the probed system paths.
    FontNotFound,
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VizError::GridTooSmall { rows, cols } => {
                write!(f, "sample grid must be at least 2x2, got {rows}x{cols}")
            }
            VizError::GridShape { rows, cols, len } => {
                write!(f, "grid of {rows}x{cols} needs {} samples, got {len}", rows * cols)
            }
            VizError::ImageLoad { path, reason } => {
                write!(f, "can't load image {}: {reason}", path.display())
            }
            VizError::TextureSize { width, height, len } => write!(
                f,
                "texture of {width}x{height} needs {} bytes of RGBA8, got {len}",
                *width as usize * *height as usize * 4
            ),
            VizError::FontLoad(e) => e.fmt(f),
            VizError::FontNotFound => write!(f, "no usable system font found"),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VizError::FontLoad(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FontLoadError> for VizError {
    fn from(e: FontLoadError) -> Self {
        VizError::FontLoad(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_too_small_names_both_dimensions() {
        let msg = VizError::GridTooSmall { rows: 1, cols: 5 }.to_string();
        assert_eq!(msg, "sample grid must be at least 2x2, got 1x5");
    }

    #[test]
    fn texture_size_reports_expected_byte_count() {
        let msg = VizError::TextureSize { width: 2, height: 3, len: 7 }.to_string();
        assert!(msg.contains("24 bytes"), "{msg}");
    }

    #[test]
    fn font_errors_keep_their_source() {
        use std::error::Error;
        let err = VizError::from(FontLoadError("bad table".into()));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "font load error: bad table");
    }
}
