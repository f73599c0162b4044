//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per presented frame to
//! obtain a `FrameTime` (delta time plus the fps estimate shown by the
//! overlay).

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
