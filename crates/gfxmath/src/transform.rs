//! 2D affine transforms embedded in 4×4 matrices, plus a pixel viewport.
//!
//! Transforms compose in application order: `combine(first, second)` moves a
//! point by `first` and then by `second`, which is the row-vector product
//! `p * first * second`. `glam` stores matrices for column vectors, so the
//! product is formed as `second * first` internally; callers never see the
//! difference as long as they go through [`transform_point`] and
//! [`transform_direction`].

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Rotation about the z axis, counter-clockwise for positive angles.
pub fn rotation(angle_radians: f32) -> Mat4 {
    Mat4::from_rotation_z(angle_radians)
}

pub fn scale(sx: f32, sy: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(sx, sy, 1.0))
}

pub fn uniform_scale(factor: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(factor))
}

pub fn translate(tx: f32, ty: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(tx, ty, 0.0))
}

/// Transform that applies `first` and then `second`.
pub fn combine(first: Mat4, second: Mat4) -> Mat4 {
    second * first
}

/// Folds `transforms` so that `transforms[0]` is applied first.
///
/// An empty slice yields the identity.
pub fn combine_all(transforms: &[Mat4]) -> Mat4 {
    transforms
        .iter()
        .fold(Mat4::IDENTITY, |acc, next| combine(acc, *next))
}

/// Transforms a location (`w = 1`), so translation applies.
pub fn transform_point(point: Vec2, transform: Mat4) -> Vec2 {
    let result = transform * Vec4::new(point.x, point.y, 0.0, 1.0);
    Vec2::new(result.x, result.y)
}

/// Transforms a direction (`w = 0`), so translation is ignored.
pub fn transform_direction(direction: Vec2, transform: Mat4) -> Vec2 {
    let result = transform * Vec4::new(direction.x, direction.y, 0.0, 0.0);
    Vec2::new(result.x, result.y)
}

/// Pixel dimensions of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height; zero-sized dimensions count as one pixel.
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Height over width.
    pub fn inv_aspect_ratio(&self) -> f32 {
        self.height.max(1) as f32 / self.width.max(1) as f32
    }

    /// Maps pixel coordinates (origin top-left, y down) to normalized device
    /// coordinates: `(0, 0)` becomes `(-1, 1)` and `(w - 1, h - 1)` becomes
    /// `(1, -1)`.
    pub fn inv_viewport_matrix(&self) -> Mat4 {
        let span_x = (self.width.max(2) - 1) as f32;
        let span_y = (self.height.max(2) - 1) as f32;
        combine(scale(2.0 / span_x, -2.0 / span_y), translate(-1.0, 1.0))
    }
}
