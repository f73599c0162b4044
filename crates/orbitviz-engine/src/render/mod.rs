//! GPU rendering of the debug primitives.
//!
//! Every primitive owns its GPU resources (pipelines, bind groups, buffers)
//! and creates them lazily on first use. The lifecycle is always the same:
//! `update` uploads new geometry through [`sync`], `draw` binds whatever the
//! last update left and records one render pass into the frame's encoder.
//!
//! Convention:
//! - Scene primitives are in world space and go through the camera's
//!   view-projection with depth testing.
//! - [`Text`] is in logical pixels (top-left origin, +Y down) and is drawn
//!   without depth, on top of the scene.

mod color_lines;
mod common;
mod ctx;
mod cubemesh;
mod gridmesh;
mod lines;
pub mod sync;
mod text;
mod viewport;

pub use color_lines::{axes_segments, ColorLines, ColoredVertex};
pub use common::LineMode;
pub use ctx::{RenderCtx, RenderTarget};
pub use cubemesh::Cubemesh;
pub use gridmesh::{Gridmesh, TextureImage};
pub use lines::Lines;
pub use sync::SyncOutcome;
pub use text::Text;
pub use viewport::Viewport;
