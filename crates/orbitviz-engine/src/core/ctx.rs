use glam::{Vec2, Vec4};
use winit::window::{Window, WindowId};

use crate::camera::{OrbitCamera, ViewProjection};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputState;
use crate::render::{RenderCtx, RenderTarget, Viewport};
use crate::time::FrameTime;

use super::app::AppControl;
use super::overlay::Overlay;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size.
    pub fn viewport(&self) -> Viewport {
        let phys = self.window.inner_size();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(self.window.scale_factor());
        Viewport::new(logi.width as f32, logi.height as f32)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub time: FrameTime,
    pub camera: &'a mut OrbitCamera,
    /// True while any camera drag is active.
    pub interacting: bool,
    pub clear_color: wgpu::Color,
    pub(crate) overlay: &'a mut Overlay,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// View + projection for the current camera and window size.
    pub fn view_projection(&self) -> ViewProjection {
        ViewProjection::new(&*self.camera, self.window.viewport())
    }

    /// Queues overlay text for this frame (logical px, top-left origin).
    pub fn overlay_text(&mut self, text: impl Into<String>, origin: Vec2, color: Vec4) {
        self.overlay.queue_text(text, origin, color);
    }

    /// Renders one frame.
    ///
    /// Acquires the surface, clears color and depth, calls `draw` with a ready
    /// [`RenderCtx`], [`RenderTarget`] and the camera transforms, draws the
    /// runtime overlays on top and presents.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>, &ViewProjection),
    {
        let viewport = self.window.viewport();
        let scale_factor = self.window.window.scale_factor() as f32;

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface unavailable: {err}");
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("surface out of memory");
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.depth_format(),
            viewport,
            scale_factor,
        );
        let view_proj = ViewProjection::new(&*self.camera, viewport);

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, &frame.depth_view);
            target.clear(self.clear_color);
            draw(&rctx, &mut target, &view_proj);
            self.overlay.draw(
                &rctx,
                &mut target,
                &view_proj,
                &*self.camera,
                self.interacting,
                self.time.fps,
            );
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
