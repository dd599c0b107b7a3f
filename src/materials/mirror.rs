//! Mirror Material

use crate::core::color::*;
use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use crate::core::material::*;
use crate::core::texture::*;

/// A perfect specular reflector.
pub struct Mirror {
    /// Reflectance texture.
    reflectance: ArcColorTexture,
}

impl Mirror {
    /// Return a new `Mirror`.
    ///
    /// * `reflectance` - Reflectance texture.
    pub fn new(reflectance: ArcColorTexture) -> Self {
        Self { reflectance }
    }

    const TYPE: BsdfType = BsdfType::REFLECTION.union(BsdfType::SPECULAR);

    fn matches(mask: BsdfType) -> bool {
        mask.contains(Self::TYPE)
    }
}

impl Material for Mirror {
    fn bsdf(&self, _fragment: &Fragment, _wo: &Vector3, _wi: &Vector3, _mask: BsdfType) -> Color {
        // Delta distribution: direct evaluation never hits the lobe.
        Color::BLACK
    }

    fn sample_bsdf(
        &self,
        fragment: &Fragment,
        wo: &Vector3,
        _sample: &BsdfSample,
        mask: BsdfType,
    ) -> BsdfSampled {
        if !Self::matches(mask) {
            return BsdfSampled::zero();
        }

        let mut n = fragment.normal();
        if n.dot(wo) < 0.0 {
            n = -n;
        }
        let wi = specular_reflect_direction(wo, &n);
        let cos_theta = n.abs_dot(&wi);
        if cos_theta == 0.0 {
            return BsdfSampled::zero();
        }

        BsdfSampled {
            // The delta lobe divides out the cosine the estimator applies.
            f: self.reflectance.lookup(fragment) / cos_theta,
            wi,
            pdf: 1.0,
            sampled_type: Self::TYPE,
        }
    }

    fn pdf(&self, _fragment: &Fragment, _wo: &Vector3, _wi: &Vector3, _mask: BsdfType) -> Float {
        0.0
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::ConstantTexture;
    use std::sync::Arc;

    fn fragment() -> Fragment {
        Fragment::new(
            Vector3::ZERO,
            Vector3::UNIT_Z,
            Vector2::ZERO,
            Vector3::UNIT_X,
            Vector3::UNIT_Y,
        )
    }

    #[test]
    fn samples_the_mirror_direction() {
        let m = Mirror::new(Arc::new(ConstantTexture::new(Color::WHITE)));
        let wo = Vector3::new(1.0, 0.0, 1.0).normalize();
        let sampled = m.sample_bsdf(&fragment(), &wo, &BsdfSample::default(), BsdfType::all());
        assert_eq!(sampled.pdf, 1.0);
        assert!(sampled.sampled_type.is_specular());
        assert!((sampled.wi - Vector3::new(-1.0, 0.0, 1.0).normalize()).length() < 1e-5);
        // f = R / cosθ so that f·cosθ = R.
        assert!((sampled.f.r * sampled.wi.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn delta_lobe_evaluates_and_queries_to_zero() {
        let m = Mirror::new(Arc::new(ConstantTexture::new(Color::WHITE)));
        let wo = Vector3::UNIT_Z;
        let wi = Vector3::UNIT_Z;
        assert!(m.bsdf(&fragment(), &wo, &wi, BsdfType::all()).is_black());
        assert_eq!(m.pdf(&fragment(), &wo, &wi, BsdfType::all()), 0.0);
    }
}
