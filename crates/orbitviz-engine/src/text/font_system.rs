use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::VizError;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Where the overlay font comes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FontSource {
    /// First readable entry of [`SYSTEM_FONT_PATHS`].
    #[default]
    System,
    /// A specific TrueType/OpenType file.
    Path(PathBuf),
    /// Font bytes already in memory.
    Bytes(Vec<u8>),
    /// No text rendering at all.
    Disabled,
}

/// Monospace fonts probed by [`FontSource::System`], in order.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/Library/Fonts/Courier New.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. Text renderers borrow the system each
/// flush so new glyphs can be rasterized on demand.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    /// Reads and loads a font file.
    pub fn load_path(&mut self, path: &Path) -> Result<FontId, VizError> {
        let bytes = std::fs::read(path)
            .map_err(|e| FontLoadError(format!("{}: {e}", path.display())))?;
        Ok(self.load_font(&bytes)?)
    }

    /// Loads the first usable font from `candidates`.
    pub fn load_first_of<P: AsRef<Path>>(&mut self, candidates: &[P]) -> Result<FontId, VizError> {
        for path in candidates {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            match self.load_path(path) {
                Ok(id) => {
                    log::debug!("using font {}", path.display());
                    return Ok(id);
                }
                Err(e) => log::warn!("skipping font {}: {e}", path.display()),
            }
        }
        Err(VizError::FontNotFound)
    }

    /// Resolves a [`FontSource`]. `Ok(None)` means text is disabled.
    pub fn load_source(&mut self, source: &FontSource) -> Result<Option<FontId>, VizError> {
        match source {
            FontSource::System => self.load_first_of(SYSTEM_FONT_PATHS).map(Some),
            FontSource::Path(path) => self.load_path(path).map(Some),
            FontSource::Bytes(bytes) => Ok(Some(self.load_font(bytes)?)),
            FontSource::Disabled => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Returns a reference to the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"not a font").is_err());
        assert!(fonts.is_empty());
    }

    #[test]
    fn disabled_source_loads_nothing() {
        let mut fonts = FontSystem::new();
        assert_eq!(fonts.load_source(&FontSource::Disabled), Ok(None));
        assert_eq!(fonts.len(), 0);
    }

    #[test]
    fn missing_candidates_report_not_found() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_first_of(&["/no/such/font.ttf", "/nor/this.otf"]).unwrap_err();
        assert_eq!(err, VizError::FontNotFound);
    }

    #[test]
    fn unreadable_path_is_a_load_error() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_path(Path::new("/no/such/font.ttf")).unwrap_err();
        assert!(matches!(err, VizError::FontLoad(_)), "{err:?}");
    }
}
