//! Material interface.

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use crate::core::rng::*;
use crate::core::sampler::*;
use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    /// BSDF component bit-set used to restrict evaluation and sampling to a
    /// subset of a material's lobes.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct BsdfType: u32 {
        const REFLECTION = 1 << 0;
        const TRANSMISSION = 1 << 1;
        const DIFFUSE = 1 << 2;
        const GLOSSY = 1 << 3;
        const SPECULAR = 1 << 4;
    }
}

impl BsdfType {
    /// Returns whether this component set includes the specular flag.
    pub fn is_specular(&self) -> bool {
        self.contains(BsdfType::SPECULAR)
    }
}

/// The random variates a material needs for one BSDF sampling decision: a
/// component pick plus a 2D direction sample.
#[derive(Copy, Clone, Debug, Default)]
pub struct BsdfSample {
    /// Variate picking among the material's components.
    pub u_component: Float,

    /// Variates for sampling a direction from the picked component.
    pub u_direction: [Float; 2],
}

impl BsdfSample {
    /// Build a sample from raw RNG draws.
    ///
    /// * `rng` - Random number generator.
    pub fn from_rng(rng: &mut Rng) -> Self {
        Self {
            u_component: rng.uniform_float(),
            u_direction: [rng.uniform_float(), rng.uniform_float()],
        }
    }

    /// Build the n-th sample from a pixel sample's registered arrays.
    ///
    /// * `sample` - The pixel sample.
    /// * `index`  - The registered index for this request.
    /// * `n`      - Which of the `index.samples_num` samples to take.
    pub fn from_sample(sample: &Sample, index: &BsdfSampleIndex, n: usize) -> Self {
        Self {
            u_component: sample.u1d[index.component_index][n],
            u_direction: [
                sample.u2d[index.direction_index][2 * n],
                sample.u2d[index.direction_index][2 * n + 1],
            ],
        }
    }
}

/// Registered quota indices for a run of `BsdfSample`s.
#[derive(Copy, Clone, Debug, Default)]
pub struct BsdfSampleIndex {
    /// Number of samples registered.
    pub samples_num: usize,

    /// Index of the component-pick 1D array.
    pub component_index: usize,

    /// Index of the direction 2D array.
    pub direction_index: usize,
}

impl BsdfSampleIndex {
    /// Register quotas for `request_num` BSDF samples.
    ///
    /// * `quota`       - The sample quota.
    /// * `request_num` - The number of samples.
    pub fn new(quota: &mut SampleQuota, request_num: usize) -> Self {
        let one_d = quota.request_1d_quota(request_num);
        let two_d = quota.request_2d_quota(request_num);
        Self {
            samples_num: min(one_d.sample_num, two_d.sample_num),
            component_index: one_d.offset,
            direction_index: two_d.offset,
        }
    }
}

/// Result of importance-sampling a material's BSDF.
#[derive(Clone, Debug)]
pub struct BsdfSampled {
    /// The BSDF value for the sampled direction.
    pub f: Color,

    /// The sampled incident direction.
    pub wi: Vector3,

    /// The solid-angle pdf of the sampled direction.
    pub pdf: Float,

    /// The component the sample was drawn from.
    pub sampled_type: BsdfType,
}

impl BsdfSampled {
    /// Returns a zero-contribution sample.
    pub fn zero() -> Self {
        Self {
            f: Color::BLACK,
            wi: Vector3::ZERO,
            pdf: 0.0,
            sampled_type: BsdfType::empty(),
        }
    }
}

/// Material interface: a black-box BSDF capability set over a surface
/// fragment.
pub trait Material: Send + Sync {
    /// Evaluate the BSDF for a pair of directions, restricted to the given
    /// component set. Delta components evaluate to black.
    ///
    /// * `fragment` - The shading point.
    /// * `wo`       - Outgoing direction. Assumed normalized.
    /// * `wi`       - Incident direction. Assumed normalized.
    /// * `mask`     - Components to include.
    fn bsdf(&self, fragment: &Fragment, wo: &Vector3, wi: &Vector3, mask: BsdfType) -> Color;

    /// Importance-sample an incident direction for the given outgoing
    /// direction, restricted to the given component set.
    ///
    /// * `fragment` - The shading point.
    /// * `wo`       - Outgoing direction. Assumed normalized.
    /// * `sample`   - The random variates to use.
    /// * `mask`     - Components to include.
    fn sample_bsdf(
        &self,
        fragment: &Fragment,
        wo: &Vector3,
        sample: &BsdfSample,
        mask: BsdfType,
    ) -> BsdfSampled;

    /// Returns the solid-angle pdf `sample_bsdf` would report for the pair of
    /// directions. Zero for delta components.
    ///
    /// * `fragment` - The shading point.
    /// * `wo`       - Outgoing direction. Assumed normalized.
    /// * `wi`       - Incident direction. Assumed normalized.
    /// * `mask`     - Components to include.
    fn pdf(&self, fragment: &Fragment, wo: &Vector3, wi: &Vector3, mask: BsdfType) -> Float;

    /// Perturb the fragment's shading normal (bump mapping). The default
    /// leaves the fragment untouched.
    ///
    /// * `fragment` - The shading point.
    fn perturb(&self, _fragment: &mut Fragment) {}
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;

/// Returns the mirror reflection of `wo` about the normal `n`.
///
/// * `wo` - Outgoing direction, pointing away from the surface.
/// * `n`  - Surface normal.
#[inline]
pub fn specular_reflect_direction(wo: &Vector3, n: &Vector3) -> Vector3 {
    2.0 * wo.dot(n) * *n - *wo
}

/// Returns the refracted direction of `wo` about the normal `n`, or `None`
/// on total internal reflection.
///
/// * `wo`  - Outgoing direction, pointing away from the surface.
/// * `n`   - Surface normal on the same side as `wo`.
/// * `eta` - Relative index of refraction (incident over transmitted).
pub fn specular_refract_direction(wo: &Vector3, n: &Vector3, eta: Float) -> Option<Vector3> {
    let cos_i = n.dot(wo);
    let sin2_i = max(0.0, 1.0 - cos_i * cos_i);
    let sin2_t = eta * eta * sin2_i;
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(eta * -*wo + (eta * cos_i - cos_t) * *n)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
