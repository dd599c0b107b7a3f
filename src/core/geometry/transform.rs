//! Transformations

#![allow(dead_code)]

use super::matrix::*;
use super::quaternion::*;
use super::vector::*;
use crate::core::common::*;

/// An affine transformation stored as separable translation, rotation and
/// scale components. The composed matrix is `T * R * S` and is cached along
/// with its inverse.
#[derive(Copy, Clone, Debug)]
pub struct Transform {
    position: Vector3,
    orientation: Quaternion,
    scale: Vector3,
    cached: Matrix4,
    cached_inverse: Matrix4,
}

impl Default for Transform {
    /// Returns the identity transform.
    fn default() -> Self {
        Self::new(Vector3::ZERO, Quaternion::IDENTITY, Vector3::new(1.0, 1.0, 1.0))
    }
}

impl Transform {
    /// Return a new `Transform` from its components.
    ///
    /// * `position`    - The translation.
    /// * `orientation` - The rotation.
    /// * `scale`       - The per-axis scale. Components must be non-zero.
    pub fn new(position: Vector3, orientation: Quaternion, scale: Vector3) -> Self {
        let mut t = Self {
            position,
            orientation,
            scale,
            cached: Matrix4::IDENTITY,
            cached_inverse: Matrix4::IDENTITY,
        };
        t.update_matrix();
        t
    }

    /// Return a pure translation.
    ///
    /// * `position` - The translation.
    pub fn translate(position: Vector3) -> Self {
        Self::new(position, Quaternion::IDENTITY, Vector3::new(1.0, 1.0, 1.0))
    }

    /// Return a rotation of `angle` radians about the x-axis.
    ///
    /// * `angle` - The rotation angle in radians.
    pub fn rotate_x(angle: Float) -> Self {
        Self::new(
            Vector3::ZERO,
            Quaternion::from_axis_angle(&Vector3::UNIT_X, angle),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    /// Return a rotation of `angle` radians about the y-axis.
    ///
    /// * `angle` - The rotation angle in radians.
    pub fn rotate_y(angle: Float) -> Self {
        Self::new(
            Vector3::ZERO,
            Quaternion::from_axis_angle(&Vector3::UNIT_Y, angle),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    fn update_matrix(&mut self) {
        let r = Matrix4::from(self.orientation.to_matrix());
        let mut s = Matrix4::IDENTITY;
        s.m[0][0] = self.scale.x;
        s.m[1][1] = self.scale.y;
        s.m[2][2] = self.scale.z;
        let mut t = Matrix4::IDENTITY;
        t.m[0][3] = self.position.x;
        t.m[1][3] = self.position.y;
        t.m[2][3] = self.position.z;

        self.cached = t * r * s;
        // The composition is invertible as long as the scale is non-zero, so
        // fall back to identity only on degenerate input.
        self.cached_inverse = self.cached.inverse().unwrap_or_else(|| {
            warn!("Degenerate transform scale {:?}, using identity inverse", self.scale);
            Matrix4::IDENTITY
        });
    }

    /// Returns the translation component.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Returns the rotation component.
    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// Returns the scale component.
    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    /// Replace the translation component.
    ///
    /// * `position` - The translation.
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.update_matrix();
    }

    /// Replace the rotation component.
    ///
    /// * `orientation` - The rotation.
    pub fn set_orientation(&mut self, orientation: Quaternion) {
        self.orientation = orientation;
        self.update_matrix();
    }

    /// Returns the composed matrix.
    pub fn matrix(&self) -> Matrix4 {
        self.cached
    }

    /// Apply the transform to a point.
    ///
    /// * `p` - The point.
    pub fn on_point(&self, p: &Vector3) -> Vector3 {
        self.cached.transform_point(p)
    }

    /// Apply the transform to a direction.
    ///
    /// * `v` - The direction.
    pub fn on_vector(&self, v: &Vector3) -> Vector3 {
        self.cached.transform_vector(v)
    }

    /// Apply the transform to a surface normal using the inverse transpose.
    /// The result is not normalized.
    ///
    /// * `n` - The normal.
    pub fn on_normal(&self, n: &Vector3) -> Vector3 {
        self.cached_inverse.transpose().transform_vector(n)
    }

    /// Apply the inverse transform to a point.
    ///
    /// * `p` - The point.
    pub fn invert_point(&self, p: &Vector3) -> Vector3 {
        self.cached_inverse.transform_point(p)
    }

    /// Apply the inverse transform to a direction.
    ///
    /// * `v` - The direction.
    pub fn invert_vector(&self, v: &Vector3) -> Vector3 {
        self.cached_inverse.transform_vector(v)
    }

    /// Apply the inverse transform to a surface normal. The result is not
    /// normalized.
    ///
    /// * `n` - The normal.
    pub fn invert_normal(&self, n: &Vector3) -> Vector3 {
        self.cached.transpose().transform_vector(n)
    }

    /// Returns `true` if the per-axis scale components are equal to within
    /// `eps`, i.e. the transform preserves relative areas.
    ///
    /// * `eps` - The tolerance.
    pub fn is_uniform_scale(&self, eps: Float) -> bool {
        abs(self.scale.x - self.scale.y) <= eps && abs(self.scale.y - self.scale.z) <= eps
    }
}

/// Build the orientation that maps the +z axis onto `dir`.
///
/// * `dir` - The target direction. Assumed normalized.
pub fn orientation_towards(dir: &Vector3) -> Quaternion {
    let (x_axis, y_axis) = super::coordinate_system(dir);
    Quaternion::from(Matrix3::from_columns(&x_axis, &y_axis, dir))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
