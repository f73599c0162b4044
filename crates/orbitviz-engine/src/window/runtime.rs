use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::camera::OrbitCamera;
use crate::core::{App as CoreApp, AppControl, FrameCtx, Overlay, OverlayConfig, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::InputState;
use crate::interaction::{Interaction, InteractionNotice};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub clear_color: wgpu::Color,
    /// Camera state when the window opens.
    pub camera: OrbitCamera,
    pub overlay: OverlayConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "orbitviz".to_string(),
            initial_size: LogicalSize::new(0.7 * 1920.0, 0.7 * 1080.0),
            clear_color: wgpu::Color::BLACK,
            camera: OrbitCamera::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the visualization window and drives `app` until it is closed.
    ///
    /// Returns an error when the window, GPU or overlay font could not be set up,
    /// or when the event loop itself fails.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,
    interaction: Interaction,
    camera: OrbitCamera,
    overlay: Overlay,
    clear_color: wgpu::Color,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    started: bool,
    exit_requested: bool,
    startup_error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            started: false,
            exit_requested: false,
            startup_error: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let config = self.config.clone();

        let overlay = Overlay::new(config.overlay).context("failed to load overlay font")?;

        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            interaction: Interaction::new(),
            camera: config.camera,
            overlay,
            clear_color: config.clear_color,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn window_matches(&self, id: WindowId) -> bool {
        self.window
            .as_ref()
            .is_some_and(|entry| entry.with_window(|w| w.id()) == id)
    }

    fn close_window(&mut self, event_loop: &ActiveEventLoop) {
        self.window = None;
        log::debug!("window closed");
        self.request_exit(event_loop);
    }

    /// Drives one frame: drains key presses into the app, then `on_frame`.
    fn redraw(&mut self) -> AppControl {
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let time: FrameTime = fields.clock.tick();

            for key in fields.interaction.drain_keypresses() {
                app.on_keypress(key, fields.camera);
            }

            let interacting = fields.interaction.is_interacting();
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input_state,
                time,
                camera: fields.camera,
                interacting,
                clear_color: *fields.clear_color,
                overlay: fields.overlay,
            };

            app.on_frame(&mut ctx)
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create initial window: {e:#}");
                self.startup_error = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        if !self.window_matches(window_id) {
            return;
        }

        // Input first: state tracking, then the camera interaction layer.
        let mut close_from_input = false;
        if let Some(entry) = self.window.as_mut() {
            entry.with_mut(|fields| {
                let Some(ev) = translate_window_event(fields.window, fields.input_state, &event)
                else {
                    return;
                };
                fields.input_state.apply_event(&ev);
                if let Some(InteractionNotice::CloseRequested) =
                    fields.interaction.handle_event(fields.camera, &ev)
                {
                    close_from_input = true;
                }
            });
        }

        if close_from_input {
            self.close_window(event_loop);
            return;
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => self.close_window(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.close_window(event_loop);
                }
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_seventy_percent_of_full_hd() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.title, "orbitviz");
        assert_eq!(cfg.initial_size, LogicalSize::new(1344.0, 756.0));
        assert_eq!(cfg.clear_color, wgpu::Color::BLACK);
        assert!(cfg.overlay.show_fps);
    }
}
