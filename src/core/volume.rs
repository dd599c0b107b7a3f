//! Participating volume region.

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;

/// A homogeneous participating medium bound to an axis-aligned extent.
pub struct VolumeRegion {
    /// Absorption coefficient.
    sigma_a: Color,

    /// Scattering coefficient.
    sigma_s: Color,

    /// Emitted radiance per unit length.
    le: Color,

    /// Henyey-Greenstein asymmetry parameter.
    g: Float,

    /// World-space extent of the medium.
    extent: BBox,
}

impl VolumeRegion {
    /// Return a new `VolumeRegion`.
    ///
    /// * `sigma_a` - Absorption coefficient.
    /// * `sigma_s` - Scattering coefficient.
    /// * `le`      - Emitted radiance per unit length.
    /// * `g`       - Henyey-Greenstein asymmetry parameter.
    /// * `extent`  - World-space extent of the medium.
    pub fn new(sigma_a: Color, sigma_s: Color, le: Color, g: Float, extent: BBox) -> Self {
        Self {
            sigma_a,
            sigma_s,
            le,
            g,
            extent,
        }
    }

    /// Returns the extinction coefficient.
    pub fn sigma_t(&self) -> Color {
        self.sigma_a + self.sigma_s
    }

    /// Returns the emitted radiance per unit length.
    pub fn emission(&self) -> Color {
        self.le
    }

    /// Returns the world-space extent.
    pub fn extent(&self) -> BBox {
        self.extent
    }

    /// Returns the beam transmittance along the segment of `ray` that
    /// overlaps the medium.
    ///
    /// * `ray` - The ray.
    pub fn transmittance(&self, ray: &Ray) -> Color {
        match self.extent.intersect(ray) {
            Some((t0, t1)) => {
                let length = (t1 - t0) * ray.d.length();
                let tau = self.sigma_t() * length;
                Color::new((-tau.r).exp(), (-tau.g).exp(), (-tau.b).exp())
            }
            None => Color::WHITE,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
