//! Orbit camera.
//!
//! Pure state and spherical-to-Cartesian math; no I/O. The interaction layer
//! mutates it from pointer drags, applications may drive it directly.

mod orbit;
mod view;

pub use orbit::{
    OrbitCamera, MAX_DISTANCE, MAX_ELEVATION_DEG, MIN_DISTANCE, MIN_ELEVATION_DEG, SCROLL_STEP,
    TRANSLATE_SCALE,
};
pub(crate) use view::CameraUniform;
pub use view::{perspective, view_matrix, ViewProjection, FAR_CLIP, FOV_Y_DEG, NEAR_CLIP};
