use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use super::OrbitCamera;
use crate::render::Viewport;

/// Vertical field of view of the perspective projection.
pub const FOV_Y_DEG: f32 = 45.0;

/// Clip planes.
pub const NEAR_CLIP: f32 = 1e-3;
pub const FAR_CLIP: f32 = 1e4;

/// World "up" as seen by the look-at transform (+Z points down).
const VIEW_UP: Vec3 = Vec3::NEG_Z;

/// View + projection transforms for one frame.
///
/// The projection maps depth to `[0, 1]`, which is what wgpu expects, so no
/// GL-style clip-space correction is needed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewProjection {
    pub view: Mat4,
    pub proj: Mat4,
}

impl ViewProjection {
    pub fn new(camera: &OrbitCamera, viewport: Viewport) -> Self {
        Self {
            view: view_matrix(camera),
            proj: perspective(viewport),
        }
    }

    pub(crate) fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view.to_cols_array_2d(),
            proj: self.proj.to_cols_array_2d(),
        }
    }
}

/// Right-handed look-at from the camera eye towards its focus.
pub fn view_matrix(camera: &OrbitCamera) -> Mat4 {
    Mat4::look_at_rh(camera.eye(), camera.center(), VIEW_UP)
}

/// Perspective projection for a viewport; degenerate sizes are clamped to 1.
pub fn perspective(viewport: Viewport) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEG.to_radians(), viewport.aspect(), NEAR_CLIP, FAR_CLIP)
}

/// GPU layout of [`ViewProjection`] (128 bytes, column-major).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_projects_to_screen_center() {
        let cam = OrbitCamera::default();
        let vp = ViewProjection::new(&cam, Viewport::new(800.0, 600.0));
        let clip = vp.proj * vp.view * cam.center().extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "{ndc:?}");
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn zero_sized_viewport_does_not_produce_nan() {
        let proj = perspective(Viewport::new(0.0, 0.0));
        assert!(proj.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
