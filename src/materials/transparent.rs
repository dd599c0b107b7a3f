//! Transparent Material

use super::fresnel_dielectric;
use crate::core::color::*;
use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use crate::core::material::*;
use crate::core::texture::*;

/// A specular dielectric with a reflective and a refractive lobe, split by
/// the Fresnel term.
pub struct Transparent {
    /// Reflectance texture.
    reflectance: ArcColorTexture,

    /// Transmittance texture.
    transmittance: ArcColorTexture,

    /// Index of refraction of the interior.
    eta: Float,
}

impl Transparent {
    /// Return a new `Transparent`.
    ///
    /// * `reflectance`   - Reflectance texture.
    /// * `transmittance` - Transmittance texture.
    /// * `eta`           - Index of refraction of the interior.
    pub fn new(reflectance: ArcColorTexture, transmittance: ArcColorTexture, eta: Float) -> Self {
        Self {
            reflectance,
            transmittance,
            eta,
        }
    }

    fn reflect(&self, fragment: &Fragment, wo: &Vector3, n: &Vector3, fr: Float) -> BsdfSampled {
        let wi = specular_reflect_direction(wo, n);
        let cos_theta = n.abs_dot(&wi);
        if cos_theta == 0.0 {
            return BsdfSampled::zero();
        }
        BsdfSampled {
            f: fr * self.reflectance.lookup(fragment) / cos_theta,
            wi,
            pdf: 1.0,
            sampled_type: BsdfType::SPECULAR | BsdfType::REFLECTION,
        }
    }

    fn refract(
        &self,
        fragment: &Fragment,
        wo: &Vector3,
        n: &Vector3,
        eta: Float,
        fr: Float,
    ) -> BsdfSampled {
        let wi = match specular_refract_direction(wo, n, eta) {
            Some(wi) => wi,
            None => return BsdfSampled::zero(),
        };
        let cos_theta = n.abs_dot(&wi);
        if cos_theta == 0.0 {
            return BsdfSampled::zero();
        }
        BsdfSampled {
            f: (1.0 - fr) * self.transmittance.lookup(fragment) / cos_theta,
            wi,
            pdf: 1.0,
            sampled_type: BsdfType::SPECULAR | BsdfType::TRANSMISSION,
        }
    }
}

impl Material for Transparent {
    fn bsdf(&self, _fragment: &Fragment, _wo: &Vector3, _wi: &Vector3, _mask: BsdfType) -> Color {
        Color::BLACK
    }

    fn sample_bsdf(
        &self,
        fragment: &Fragment,
        wo: &Vector3,
        sample: &BsdfSample,
        mask: BsdfType,
    ) -> BsdfSampled {
        if !mask.contains(BsdfType::SPECULAR) {
            return BsdfSampled::zero();
        }

        // Orient the normal to wo's side and pick the matching eta ratio.
        let mut n = fragment.normal();
        let entering = n.dot(wo) > 0.0;
        let (eta_i, eta_t) = if entering {
            (1.0, self.eta)
        } else {
            n = -n;
            (self.eta, 1.0)
        };
        let fr = fresnel_dielectric(n.dot(wo), eta_i, eta_t);

        let want_reflection = mask.contains(BsdfType::REFLECTION);
        let want_transmission = mask.contains(BsdfType::TRANSMISSION);

        if want_reflection && want_transmission {
            // Choose the lobe in proportion to the Fresnel split; the
            // probability cancels against the lobe weight.
            if sample.u_component < fr {
                let mut s = self.reflect(fragment, wo, &n, fr);
                if s.pdf > 0.0 {
                    s.pdf = fr;
                }
                s
            } else {
                let mut s = self.refract(fragment, wo, &n, eta_i / eta_t, fr);
                if s.pdf > 0.0 {
                    s.pdf = 1.0 - fr;
                }
                s
            }
        } else if want_reflection {
            self.reflect(fragment, wo, &n, fr)
        } else if want_transmission {
            self.refract(fragment, wo, &n, eta_i / eta_t, fr)
        } else {
            BsdfSampled::zero()
        }
    }

    fn pdf(&self, _fragment: &Fragment, _wo: &Vector3, _wi: &Vector3, _mask: BsdfType) -> Float {
        0.0
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
