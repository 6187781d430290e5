use crate::constants::*;
use glam::{Mat4, Vec2, Vec3};

/// Right-handed perspective camera with a clamped dolly distance and a
/// smoothed parallax offset on x/y.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
    parallax_target: Vec2,
}

impl Camera {
    pub fn new(distance: f32, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance.clamp(CAMERA_MIN_Z, CAMERA_MAX_Z)),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: aspect.max(1e-3),
            fovy_radians: CAMERA_FOVY_RADIANS,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
            parallax_target: Vec2::ZERO,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }

    /// Set the parallax destination from a normalized pointer position in
    /// [-1, 1] on both axes. The eye only moves during `step`.
    pub fn set_parallax_target(&mut self, norm: Vec2) {
        let clamped = norm.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        self.parallax_target = clamped * PARALLAX_RANGE;
    }

    /// Move the eye toward the zoom distance and parallax offset.
    /// Exponential smoothing keeps the step frame-rate independent.
    pub fn step(&mut self, zoom_target: f32, dt: f32) {
        let za = 1.0 - (-dt * ZOOM_SMOOTHING_PER_SEC).exp();
        let zt = zoom_target.clamp(CAMERA_MIN_Z, CAMERA_MAX_Z);
        self.eye.z = (self.eye.z + (zt - self.eye.z) * za).clamp(CAMERA_MIN_Z, CAMERA_MAX_Z);

        let pa = 1.0 - (-dt * PARALLAX_SMOOTHING_PER_SEC).exp();
        self.eye.x += (self.parallax_target.x - self.eye.x) * pa;
        self.eye.y += (self.parallax_target.y - self.eye.y) * pa;
    }
}
