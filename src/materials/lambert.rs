//! Lambert Material

use crate::core::color::*;
use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use crate::core::material::*;
use crate::core::sampling::*;
use crate::core::texture::*;

/// An ideal diffuse reflector.
pub struct Lambert {
    /// Albedo texture.
    albedo: ArcColorTexture,
}

impl Lambert {
    /// Return a new `Lambert`.
    ///
    /// * `albedo` - Albedo texture.
    pub fn new(albedo: ArcColorTexture) -> Self {
        Self { albedo }
    }

    const TYPE: BsdfType = BsdfType::REFLECTION.union(BsdfType::DIFFUSE);

    fn matches(mask: BsdfType) -> bool {
        mask.contains(Self::TYPE)
    }

    fn same_hemisphere(n: &Vector3, wo: &Vector3, wi: &Vector3) -> bool {
        n.dot(wo) * n.dot(wi) > 0.0
    }
}

impl Material for Lambert {
    fn bsdf(&self, fragment: &Fragment, wo: &Vector3, wi: &Vector3, mask: BsdfType) -> Color {
        let n = fragment.normal();
        if Self::matches(mask) && Self::same_hemisphere(&n, wo, wi) {
            self.albedo.lookup(fragment) * INV_PI
        } else {
            Color::BLACK
        }
    }

    fn sample_bsdf(
        &self,
        fragment: &Fragment,
        wo: &Vector3,
        sample: &BsdfSample,
        mask: BsdfType,
    ) -> BsdfSampled {
        if !Self::matches(mask) {
            return BsdfSampled::zero();
        }

        let mut n = fragment.normal();
        // Sample on the hemisphere wo lies in.
        if n.dot(wo) < 0.0 {
            n = -n;
        }
        let (tangent, bitangent) = coordinate_system(&n);
        let local = cosine_sample_hemisphere(sample.u_direction[0], sample.u_direction[1]);
        let wi = local.x * tangent + local.y * bitangent + local.z * n;

        BsdfSampled {
            f: self.albedo.lookup(fragment) * INV_PI,
            wi,
            pdf: cosine_hemisphere_pdf(local.z),
            sampled_type: Self::TYPE,
        }
    }

    fn pdf(&self, fragment: &Fragment, wo: &Vector3, wi: &Vector3, mask: BsdfType) -> Float {
        let n = fragment.normal();
        if Self::matches(mask) && Self::same_hemisphere(&n, wo, wi) {
            cosine_hemisphere_pdf(n.abs_dot(wi))
        } else {
            0.0
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
