//! Rays

#![allow(dead_code)]

use super::vector::*;
use crate::core::common::*;
use std::fmt;

/// A ray with a parametric interval `[mint, maxt]` and a recursion depth. The
/// direction is not required to be normalized; a hit at parameter `t` is at
/// `o + t * d`.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    /// Origin.
    pub o: Vector3,

    /// Direction.
    pub d: Vector3,

    /// Minimum extent of the ray.
    pub mint: Float,

    /// Maximum extent of the ray.
    pub maxt: Float,

    /// Recursion depth for rays spawned at intersections.
    pub depth: u32,
}

impl Ray {
    /// Return a new `Ray` covering `[mint, ∞)` at depth 0.
    ///
    /// * `o`    - Origin.
    /// * `d`    - Direction.
    /// * `mint` - Minimum extent of the ray.
    pub fn new(o: Vector3, d: Vector3, mint: Float) -> Self {
        debug_assert!(mint >= 0.0);
        Self {
            o,
            d,
            mint,
            maxt: INFINITY,
            depth: 0,
        }
    }

    /// Return a new `Ray` covering a bounded segment.
    ///
    /// * `o`    - Origin.
    /// * `d`    - Direction.
    /// * `mint` - Minimum extent of the ray.
    /// * `maxt` - Maximum extent of the ray.
    pub fn segment(o: Vector3, d: Vector3, mint: Float, maxt: Float) -> Self {
        debug_assert!(0.0 <= mint && mint <= maxt);
        Self {
            o,
            d,
            mint,
            maxt,
            depth: 0,
        }
    }

    /// Return a child ray spawned from a shading point.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `mint`  - Minimum extent (the surface epsilon).
    /// * `depth` - Recursion depth of the child ray.
    pub fn spawn(o: Vector3, d: Vector3, mint: Float, depth: u32) -> Self {
        Self {
            o,
            d,
            mint,
            maxt: INFINITY,
            depth,
        }
    }

    /// Get the position along the ray at the given parameter.
    ///
    /// * `t` - Parameter to evaluate.
    pub fn at(&self, t: Float) -> Vector3 {
        self.o + self.d * t
    }

    /// Returns `true` if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.maxt.is_nan()
    }
}

impl Default for Ray {
    /// Returns a degenerate ray at the origin pointing along +z.
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::UNIT_Z, 0.0)
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "o: {} d: {} [{}, {}] depth: {}",
            self.o, self.d, self.mint, self.maxt, self.depth
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_evaluates_parametric_form() {
        let r = Ray::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0), 0.0);
        assert_eq!(r.at(0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(r.at(1.5), Vector3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn spawn_carries_depth() {
        let r = Ray::spawn(Vector3::ZERO, Vector3::UNIT_X, 1e-3, 4);
        assert_eq!(r.depth, 4);
        assert_eq!(r.mint, 1e-3);
        assert_eq!(r.maxt, INFINITY);
    }
}
