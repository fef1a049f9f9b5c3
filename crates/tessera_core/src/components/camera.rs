//! Camera parameters and matrices.
//!
//! The camera does not store its own placement; pair it with a
//! [`Transform`](super::Transform) and feed that into [`Camera::view_matrix`].

use glam::{Mat4, Vec3};

pub const DEFAULT_FOV_DEG: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 200.0;
pub const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective,
    Orthographic { left: f32, right: f32, bottom: f32, top: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub active: bool,
    /// Higher wins when several cameras are active.
    pub priority: i32,
    pub projection: Projection,
}

crate::define_component!(Camera);

impl Camera {
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            ..Self::default()
        }
    }

    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Projection::Perspective;
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
    }

    pub fn set_orthographic(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.projection = Projection::Orthographic {
            left,
            right,
            bottom,
            top,
        };
        self.near = near;
        self.far = far;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far),
        }
    }

    pub fn view_matrix(&self, position: Vec3, forward: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(position, position + forward, up)
    }

    /// Projection * view.
    pub fn view_projection(&self, position: Vec3, forward: Vec3, up: Vec3) -> Mat4 {
        self.projection_matrix() * self.view_matrix(position, forward, up)
    }

    pub fn should_render(&self) -> bool {
        self.active
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV_DEG,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: DEFAULT_ASPECT,
            active: true,
            priority: 0,
            projection: Projection::Perspective,
        }
    }
}
