//! Shape interface.

#![allow(dead_code)]

use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use std::sync::Arc;

/// Shape interface. Shapes live in their own object space; primitives carry
/// them into world space.
///
/// An intersectable shape answers ray queries and reports its area; a
/// non-intersectable shape (a triangle mesh) refines into intersectable
/// children instead. All shapes provide uniform area sampling with and
/// without a reference shading point, plus the matching solid-angle pdf.
pub trait Shape: Send + Sync {
    /// Returns whether the shape can be intersected directly.
    fn intersectable(&self) -> bool {
        true
    }

    /// Split a non-intersectable shape into intersectable children. The
    /// default is a defect guard for shapes that never refine.
    fn refine(&self) -> Vec<ArcShape> {
        vec![]
    }

    /// Intersect a ray with the shape. Returns the hit parameter and the
    /// surface fragment for the closest hit inside `[ray.mint, ray.maxt]`.
    ///
    /// * `ray` - The ray in object space.
    fn intersect(&self, ray: &Ray) -> Option<(Float, Fragment)>;

    /// Returns `true` if the ray hits the shape inside `[ray.mint, ray.maxt]`.
    ///
    /// * `ray` - The ray in object space.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// Returns the surface area of the shape.
    fn area(&self) -> Float;

    /// Returns the object-space bounding box.
    fn bbox(&self) -> BBox;

    /// Uniformly sample a point on the surface. Returns the point and its
    /// surface normal.
    ///
    /// * `u1` - First random sample.
    /// * `u2` - Second random sample.
    fn sample(&self, u1: Float, u2: Float) -> (Vector3, Vector3);

    /// Sample a point on the surface as seen from a reference point. The
    /// default ignores the reference point.
    ///
    /// * `p`  - The reference point.
    /// * `u1` - First random sample.
    /// * `u2` - Second random sample.
    fn sample_wrt(&self, _p: &Vector3, u1: Float, u2: Float) -> (Vector3, Vector3) {
        self.sample(u1, u2)
    }

    /// Returns the solid-angle pdf at the reference point for sampling the
    /// direction `wi` towards the shape. The default converts the uniform
    /// area density through the visible point.
    ///
    /// * `p`  - The reference point.
    /// * `wi` - The direction. Assumed normalized.
    fn pdf(&self, p: &Vector3, wi: &Vector3) -> Float {
        let ray = Ray::new(*p, *wi, 1e-3);
        match self.intersect(&ray) {
            Some((t, fragment)) => {
                let cos_theta = fragment.normal().abs_dot(wi);
                if cos_theta == 0.0 {
                    0.0
                } else {
                    // pdf_w = d² / (|cosθ| · area)
                    t * t / (cos_theta * self.area())
                }
            }
            None => 0.0,
        }
    }
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;
