//! Pointer/keyboard interaction layer driving the orbit camera.
//!
//! | Button | Drag action                 | Release                 |
//! |--------|-----------------------------|-------------------------|
//! | Left   | `OrbitCamera::rotate`       | –                       |
//! | Right  | `OrbitCamera::translate_xy` | focus-changed notice    |
//! | Middle | `OrbitCamera::translate_z`  | focus-changed notice    |
//!
//! Escape requests close; other key presses are queued for the application to
//! drain once per frame.

mod controller;
mod drag;

pub use controller::{Interaction, InteractionNotice};
pub use drag::{DragMode, DragState};
