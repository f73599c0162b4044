//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the visualization window, and wires them to
//! the input, interaction and GPU layers.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
