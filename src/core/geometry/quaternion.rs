//! Quaternions

#![allow(dead_code)]

use super::matrix::*;
use super::vector::*;
use crate::core::common::*;
use std::ops::Mul;

/// A unit quaternion representing a rotation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quaternion {
    /// Scalar part.
    pub w: Float,

    /// Vector part.
    pub v: Vector3,
}

impl Quaternion {
    /// Identity rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        v: Vector3::ZERO,
    };

    /// Return a new `Quaternion` from its components.
    ///
    /// * `w` - Scalar part.
    /// * `x` - Vector part x.
    /// * `y` - Vector part y.
    /// * `z` - Vector part z.
    pub fn new(w: Float, x: Float, y: Float, z: Float) -> Self {
        Self {
            w,
            v: Vector3::new(x, y, z),
        }
    }

    /// Return the rotation of `angle` radians about `axis`.
    ///
    /// * `axis`  - The rotation axis. Assumed normalized.
    /// * `angle` - The rotation angle in radians.
    pub fn from_axis_angle(axis: &Vector3, angle: Float) -> Self {
        let half = 0.5 * angle;
        Self {
            w: half.cos(),
            v: *axis * half.sin(),
        }
    }

    /// Returns the quaternion length.
    pub fn length(&self) -> Float {
        (self.w * self.w + self.v.squared_length()).sqrt()
    }

    /// Returns the normalized quaternion.
    pub fn normalize(&self) -> Quaternion {
        let len = self.length();
        Quaternion {
            w: self.w / len,
            v: self.v / len,
        }
    }

    /// Returns the conjugate, which for a unit quaternion is the inverse
    /// rotation.
    pub fn conjugate(&self) -> Quaternion {
        Quaternion {
            w: self.w,
            v: -self.v,
        }
    }

    /// Rotate a vector by this quaternion.
    ///
    /// * `p` - The vector.
    pub fn rotate(&self, p: &Vector3) -> Vector3 {
        // q p q* expanded to avoid the full quaternion products.
        let t = 2.0 * self.v.cross(p);
        *p + self.w * t + self.v.cross(&t)
    }

    /// Returns the rotation matrix of this quaternion.
    pub fn to_matrix(&self) -> Matrix3 {
        let (x, y, z, w) = (self.v.x, self.v.y, self.v.z, self.w);
        Matrix3::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - z * w),
            2.0 * (x * z + y * w),
            2.0 * (x * y + z * w),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - x * w),
            2.0 * (x * z - y * w),
            2.0 * (y * z + x * w),
            1.0 - 2.0 * (x * x + y * y),
        )
    }
}

impl From<Matrix3> for Quaternion {
    /// Convert a rotation matrix to a quaternion.
    ///
    /// * `m` - The rotation matrix.
    fn from(mat: Matrix3) -> Self {
        let m = &mat.m;
        let trace = m[0][0] + m[1][1] + m[2][2];
        if trace > 0.0 {
            let s = (trace + 1.0).sqrt();
            let w = 0.5 * s;
            let k = 0.5 / s;
            Quaternion::new(
                w,
                (m[2][1] - m[1][2]) * k,
                (m[0][2] - m[2][0]) * k,
                (m[1][0] - m[0][1]) * k,
            )
        } else {
            // Pick the largest diagonal element to keep the sqrt stable.
            let next = [1, 2, 0];
            let mut i = 0;
            if m[1][1] > m[0][0] {
                i = 1;
            }
            if m[2][2] > m[i][i] {
                i = 2;
            }
            let j = next[i];
            let k = next[j];
            let s = ((m[i][i] - (m[j][j] + m[k][k])) + 1.0).sqrt();
            let mut q = [0.0 as Float; 3];
            q[i] = s * 0.5;
            let s = if s != 0.0 { 0.5 / s } else { s };
            let w = (m[k][j] - m[j][k]) * s;
            q[j] = (m[j][i] + m[i][j]) * s;
            q[k] = (m[k][i] + m[i][k]) * s;
            Quaternion::new(w, q[0], q[1], q[2])
        }
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * rhs.w - self.v.dot(&rhs.v),
            v: self.w * rhs.v + rhs.w * self.v + self.v.cross(&rhs.v),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn_about_z() {
        let q = Quaternion::from_axis_angle(&Vector3::UNIT_Z, PI_OVER_TWO);
        let r = q.rotate(&Vector3::UNIT_X);
        assert!((r - Vector3::UNIT_Y).length() < 1e-5);
    }

    #[test]
    fn matrix_round_trip() {
        let q = Quaternion::from_axis_angle(&Vector3::new(1.0, 2.0, 3.0).normalize(), 0.7);
        let q2 = Quaternion::from(q.to_matrix());
        let v = Vector3::new(0.3, -0.4, 0.5);
        assert!((q.rotate(&v) - q2.rotate(&v)).length() < 1e-5);
    }

    #[test]
    fn conjugate_inverts_rotation() {
        let q = Quaternion::from_axis_angle(&Vector3::UNIT_Y, 1.2);
        let v = Vector3::new(1.0, 2.0, 3.0);
        let r = q.conjugate().rotate(&q.rotate(&v));
        assert!((r - v).length() < 1e-5);
    }
}
