//! Axis-aligned bounding boxes

#![allow(dead_code)]

use super::ray::*;
use super::vector::*;
use crate::core::common::*;

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BBox {
    /// Minimum corner.
    pub p_min: Vector3,

    /// Maximum corner.
    pub p_max: Vector3,
}

impl Default for BBox {
    /// Returns an empty box that unions correctly with anything.
    fn default() -> Self {
        Self {
            p_min: Vector3::new(INFINITY, INFINITY, INFINITY),
            p_max: Vector3::new(-INFINITY, -INFINITY, -INFINITY),
        }
    }
}

impl BBox {
    /// Return a new `BBox` spanning two corner points.
    ///
    /// * `p1` - First corner.
    /// * `p2` - Second corner.
    pub fn new(p1: Vector3, p2: Vector3) -> Self {
        Self {
            p_min: Vector3::new(min(p1.x, p2.x), min(p1.y, p2.y), min(p1.z, p2.z)),
            p_max: Vector3::new(max(p1.x, p2.x), max(p1.y, p2.y), max(p1.z, p2.z)),
        }
    }

    /// Returns the union of this box and a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Vector3) -> BBox {
        BBox {
            p_min: Vector3::new(
                min(self.p_min.x, p.x),
                min(self.p_min.y, p.y),
                min(self.p_min.z, p.z),
            ),
            p_max: Vector3::new(
                max(self.p_max.x, p.x),
                max(self.p_max.y, p.y),
                max(self.p_max.z, p.z),
            ),
        }
    }

    /// Returns the union of two boxes.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &BBox) -> BBox {
        self.union_point(&other.p_min).union_point(&other.p_max)
    }

    /// Returns the center point of the box.
    pub fn centroid(&self) -> Vector3 {
        0.5 * (self.p_min + self.p_max)
    }

    /// Returns the surface area of the box, or zero when the box is empty.
    pub fn surface_area(&self) -> Float {
        if self.p_max.x < self.p_min.x {
            return 0.0;
        }
        let d = self.p_max - self.p_min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Returns the axis along which the box is longest.
    pub fn max_extent_axis(&self) -> usize {
        (self.p_max - self.p_min).max_axis()
    }

    /// Returns the bounding sphere of the box as a center and radius.
    pub fn bounding_sphere(&self) -> (Vector3, Float) {
        let center = self.centroid();
        let radius = if self.p_max.x < self.p_min.x {
            0.0
        } else {
            (self.p_max - center).length()
        };
        (center, radius)
    }

    /// Ray-slab intersection. Returns the parametric overlap `(t_near, t_far)`
    /// of the ray's `[mint, maxt]` interval with the box, or `None` when the
    /// ray misses.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0 = ray.mint;
        let mut t1 = ray.maxt;
        for axis in 0..3 {
            let inv_dir = 1.0 / ray.d[axis];
            let mut t_near = (self.p_min[axis] - ray.o[axis]) * inv_dir;
            let mut t_far = (self.p_max[axis] - ray.o[axis]) * inv_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Returns `true` when the point is inside the box.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: &Vector3) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
