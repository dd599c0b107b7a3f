//! Surface shading point.

#![allow(dead_code)]

use crate::core::geometry::*;

/// The differential surface record at a ray hit: position, geometric and
/// shading normals, parametric coordinates and the tangent frame. Produced by
/// shape intersection and read-only afterwards, except for the bump-mapping
/// `set_normal` hook.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fragment {
    position: Vector3,
    normal: Vector3,
    geometric_normal: Vector3,
    uv: Vector2,
    dpdu: Vector3,
    dpdv: Vector3,
}

impl Fragment {
    /// Return a new `Fragment`. The shading normal starts out equal to the
    /// geometric normal.
    ///
    /// * `position` - Hit position.
    /// * `normal`   - Geometric surface normal. Assumed normalized.
    /// * `uv`       - Parametric surface coordinates.
    /// * `dpdu`     - Partial derivative of position with respect to u.
    /// * `dpdv`     - Partial derivative of position with respect to v.
    pub fn new(position: Vector3, normal: Vector3, uv: Vector2, dpdu: Vector3, dpdv: Vector3) -> Self {
        Self {
            position,
            normal,
            geometric_normal: normal,
            uv,
            dpdu,
            dpdv,
        }
    }

    /// Returns the hit position.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Returns the shading normal.
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Returns the geometric normal.
    pub fn geometric_normal(&self) -> Vector3 {
        self.geometric_normal
    }

    /// Returns the parametric surface coordinates.
    pub fn uv(&self) -> Vector2 {
        self.uv
    }

    /// Returns the partial derivative of position with respect to u.
    pub fn dpdu(&self) -> Vector3 {
        self.dpdu
    }

    /// Returns the partial derivative of position with respect to v.
    pub fn dpdv(&self) -> Vector3 {
        self.dpdv
    }

    /// Replace the shading normal. This is the hook materials use to apply
    /// bump perturbation; the geometric normal is unaffected.
    ///
    /// * `n` - The new shading normal. Assumed normalized.
    pub fn set_normal(&mut self, n: Vector3) {
        self.normal = n;
    }

    /// Map this fragment through a transform, renormalizing the normals.
    ///
    /// * `t` - The transform.
    pub fn transformed_by(&self, t: &Transform) -> Fragment {
        Fragment {
            position: t.on_point(&self.position),
            normal: t.on_normal(&self.normal).normalize(),
            geometric_normal: t.on_normal(&self.geometric_normal).normalize(),
            uv: self.uv,
            dpdu: t.on_vector(&self.dpdu),
            dpdv: t.on_vector(&self.dpdv),
        }
    }
}
