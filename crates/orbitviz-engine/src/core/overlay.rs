use glam::{Vec2, Vec4};

use crate::camera::{OrbitCamera, ViewProjection};
use crate::error::VizError;
use crate::render::{axes_segments, ColorLines, LineMode, RenderCtx, RenderTarget, Text};
use crate::text::{FontSource, FontSystem};

/// Where the fps counter sits, in logical px from the top-left corner.
pub const FPS_TEXT_ORIGIN: Vec2 = Vec2::new(25.0, 25.0);

/// Axis length relative to the camera distance.
pub const AXES_SCALE: f32 = 0.1;

/// Runtime-drawn overlays.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Draw the fps counter in the top-left corner.
    pub show_fps: bool,
    /// Draw orientation axes at the focus point while a drag is active.
    pub show_axes: bool,
    /// Overlay text size in logical px.
    pub font_size: f32,
    pub font: FontSource,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_fps: true,
            show_axes: true,
            font_size: 18.0,
            font: FontSource::System,
        }
    }
}

/// Text and axes drawn by the runtime after the application's own frame.
pub struct Overlay {
    config: OverlayConfig,
    fonts: FontSystem,
    text: Option<Text>,
    axes: ColorLines,
}

impl Overlay {
    /// Loads the overlay font.
    ///
    /// A missing system font only disables text; an explicit font that cannot
    /// be loaded is an error.
    pub fn new(config: OverlayConfig) -> Result<Self, VizError> {
        let mut fonts = FontSystem::new();
        let font = match fonts.load_source(&config.font) {
            Ok(font) => font,
            Err(VizError::FontNotFound) => {
                log::warn!("no system font found, overlay text disabled");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            text: font.map(|id| Text::new(id, config.font_size)),
            config,
            fonts,
            axes: ColorLines::new(),
        })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn text_enabled(&self) -> bool {
        self.text.is_some()
    }

    /// Queues extra overlay text for the current frame. Ignored when text is
    /// disabled.
    pub fn queue_text(&mut self, text: impl Into<String>, origin: Vec2, color: Vec4) {
        if let Some(t) = self.text.as_mut() {
            t.queue(text, origin, color);
        }
    }

    pub(crate) fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: &ViewProjection,
        camera: &OrbitCamera,
        interacting: bool,
        fps: f32,
    ) {
        if self.config.show_axes && interacting {
            let axes = axes_segments(camera.center(), AXES_SCALE * camera.distance());
            self.axes.update(ctx, &axes[..]);
            self.axes.draw(ctx, target, view_proj, LineMode::LineStrip);
        }

        if self.config.show_fps {
            self.queue_text(fps_label(fps), FPS_TEXT_ORIGIN, Vec4::ONE);
        }

        if let Some(text) = self.text.as_mut() {
            text.flush(ctx, target, &self.fonts);
        }
    }
}

pub(crate) fn fps_label(fps: f32) -> String {
    format!("{fps:.1} fps")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_label_has_one_decimal() {
        assert_eq!(fps_label(59.94), "59.9 fps");
        assert_eq!(fps_label(0.0), "0.0 fps");
    }

    #[test]
    fn disabled_font_means_no_text() {
        let mut overlay = Overlay::new(OverlayConfig {
            font: FontSource::Disabled,
            ..Default::default()
        })
        .unwrap();
        assert!(!overlay.text_enabled());
        overlay.queue_text("ignored", Vec2::ZERO, Vec4::ONE);
    }

    #[test]
    fn unreadable_explicit_font_is_an_error() {
        let res = Overlay::new(OverlayConfig {
            font: FontSource::Path("/no/such/font.ttf".into()),
            ..Default::default()
        });
        assert!(matches!(res, Err(VizError::FontLoad(_))));
    }
}
