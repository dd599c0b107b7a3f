//! Geometry

mod bbox;
mod matrix;
mod quaternion;
mod ray;
mod transform;
mod vector;

// Re-export.
pub use bbox::*;
pub use matrix::*;
pub use quaternion::*;
pub use ray::*;
pub use transform::*;
pub use vector::*;

use crate::core::common::*;

/// Construct two unit vectors that form an orthonormal basis with `v1`.
///
/// * `v1` - The first basis vector. Assumed normalized.
pub fn coordinate_system(v1: &Vector3) -> (Vector3, Vector3) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Returns the spherical coordinate θ ∈ [0, π] of a direction. The convention
/// is z-up: θ is measured from the +z axis.
///
/// * `v` - The direction. Assumed normalized.
#[inline]
pub fn spherical_theta(v: &Vector3) -> Float {
    clamp(v.z, -1.0, 1.0).acos()
}

/// Returns the spherical coordinate φ ∈ [0, 2π) of a direction.
///
/// * `v` - The direction. Assumed normalized.
#[inline]
pub fn spherical_phi(v: &Vector3) -> Float {
    let p = v.y.atan2(v.x);
    if p < 0.0 {
        p + TWO_PI
    } else {
        p
    }
}

/// Returns the unit direction for the given spherical coordinates.
///
/// * `sin_theta` - Sine of the colatitude.
/// * `cos_theta` - Cosine of the colatitude.
/// * `phi`       - The azimuth.
#[inline]
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3 {
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_system_is_orthonormal() {
        let v1 = Vector3::new(0.3, -0.5, 0.8).normalize();
        let (v2, v3) = coordinate_system(&v1);
        assert!(v1.dot(&v2).abs() < 1e-5);
        assert!(v1.dot(&v3).abs() < 1e-5);
        assert!(v2.dot(&v3).abs() < 1e-5);
        assert!((v2.length() - 1.0).abs() < 1e-5);
        assert!((v3.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn spherical_round_trip() {
        let v = Vector3::new(0.48, -0.6, 0.64).normalize();
        let theta = spherical_theta(&v);
        let phi = spherical_phi(&v);
        let w = spherical_direction(theta.sin(), theta.cos(), phi);
        assert!((v - w).length() < 1e-5);
    }
}
