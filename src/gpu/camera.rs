//! Camera for 3D orbit view.

use glam::{Mat4, Vec3};

/// Orbit camera around the galactic center.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    /// Vertical field of view in radians.
    pub const FOV_Y: f32 = 60.0 * std::f32::consts::PI / 180.0;
    /// Near clip plane.
    pub const Z_NEAR: f32 = 0.1;
    /// Far clip plane.
    pub const Z_FAR: f32 = 100.0;

    /// Create a camera at the opening viewpoint (0, 2, 3).
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: (2.0_f32 / 3.0).atan(),
            distance: 13.0_f32.sqrt(),
            target: Vec3::ZERO,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Calculate the projection matrix for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(Self::FOV_Y, aspect, Self::Z_NEAR, Self::Z_FAR)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_viewpoint() {
        let cam = Camera::new();
        let pos = cam.position();
        assert!((pos - Vec3::new(0.0, 2.0, 3.0)).length() < 1e-5);
    }
}
