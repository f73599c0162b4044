//! Orbit-camera debug visualization engine.
//!
//! A window with an orbit camera driven by the mouse, plus a handful of GPU
//! primitives for looking at 3D data: uniform-color and per-vertex-color line
//! sets, a textured grid surface, a flat-shaded column ("cube") surface and a
//! screen-space text overlay.
//!
//! Layering, bottom-up:
//! - `camera`, `mesh` are pure math with no GPU or window dependency
//! - `input`, `interaction` turn window events into camera mutations
//! - `render`, `text`, `device` own everything wgpu
//! - `core`, `window` run the frame loop and call into an [`core::App`]

pub mod camera;
pub mod core;
pub mod device;
pub mod error;
pub mod fatal;
pub mod input;
pub mod interaction;
pub mod logging;
pub mod mesh;
pub mod render;
pub mod text;
pub mod time;
pub mod window;

pub use error::VizError;
