//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! visualization: the [`App`] trait, the per-frame context, and the overlays
//! the runtime draws on its own.

mod app;
mod ctx;
mod overlay;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
pub use overlay::{Overlay, OverlayConfig, AXES_SCALE, FPS_TEXT_ORIGIN};
