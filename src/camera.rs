use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Camera parameters read by every vertex and fragment of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub projection_view: Mat4,
    pub world_position: Vec3,
}

impl CameraState {
    pub fn new(projection_view: Mat4, world_position: Vec3) -> Self {
        Self {
            projection_view,
            world_position,
        }
    }

    /// Builds a right-handed perspective camera looking from `eye` at `target`.
    pub fn perspective_look_at(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_radians: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let view = Mat4::look_at_rh(eye, target, up);
        let projection = Mat4::perspective_rh_gl(fov_y_radians, aspect.max(0.01), near, far);
        Self::new(projection * view, eye)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ZERO)
    }
}
