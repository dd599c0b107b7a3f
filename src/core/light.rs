//! Light interface.

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::material::BsdfType;
use crate::core::rng::*;
use crate::core::sampler::*;
use crate::core::scene::Scene;
use std::sync::Arc;

/// The random variates a light needs for one sampling decision: a component
/// pick (e.g. which piece of an area light) plus a 2D surface/direction
/// sample.
#[derive(Copy, Clone, Debug, Default)]
pub struct LightSample {
    /// Variate picking among the light's components.
    pub u_component: Float,

    /// Variates for sampling the light's surface or direction.
    pub u_geometry: [Float; 2],
}

impl LightSample {
    /// Build a sample from raw RNG draws.
    ///
    /// * `rng` - Random number generator.
    pub fn from_rng(rng: &mut Rng) -> Self {
        Self {
            u_component: rng.uniform_float(),
            u_geometry: [rng.uniform_float(), rng.uniform_float()],
        }
    }

    /// Build the n-th sample from a pixel sample's registered arrays.
    ///
    /// * `sample` - The pixel sample.
    /// * `index`  - The registered index for this request.
    /// * `n`      - Which of the `index.samples_num` samples to take.
    pub fn from_sample(sample: &Sample, index: &LightSampleIndex, n: usize) -> Self {
        Self {
            u_component: sample.u1d[index.component_index][n],
            u_geometry: [
                sample.u2d[index.geometry_index][2 * n],
                sample.u2d[index.geometry_index][2 * n + 1],
            ],
        }
    }
}

/// Registered quota indices for a run of `LightSample`s.
#[derive(Copy, Clone, Debug, Default)]
pub struct LightSampleIndex {
    /// Number of samples registered.
    pub samples_num: usize,

    /// Index of the component-pick 1D array.
    pub component_index: usize,

    /// Index of the geometry 2D array.
    pub geometry_index: usize,
}

impl LightSampleIndex {
    /// Register quotas for `request_num` light samples.
    ///
    /// * `quota`       - The sample quota.
    /// * `request_num` - The number of samples.
    pub fn new(quota: &mut SampleQuota, request_num: usize) -> Self {
        let one_d = quota.request_1d_quota(request_num);
        let two_d = quota.request_2d_quota(request_num);
        Self {
            samples_num: min(one_d.sample_num, two_d.sample_num),
            component_index: one_d.offset,
            geometry_index: two_d.offset,
        }
    }
}

/// Light interface. The sampling, evaluation and pdf routines are mutually
/// consistent: the pdf reported by a sampling routine equals the matching
/// `pdf*` query on the same arguments, modulo delta distributions.
pub trait Light: Send + Sync {
    /// Returns the light's stable id, assigned at scene build time.
    fn id(&self) -> usize;

    /// Returns whether the light's distribution is a Dirac delta. Delta
    /// lights take no BSDF-sampled contribution in the direct lighting
    /// estimator.
    fn is_delta(&self) -> bool;

    /// Sample an incident direction at a shading point. Returns the radiance
    /// arriving along `wi`, the direction itself, its solid-angle pdf, and
    /// the shadow ray to test for occlusion.
    ///
    /// * `p`       - The shading point.
    /// * `epsilon` - Surface offset for the shadow ray.
    /// * `sample`  - The random variates to use.
    fn sample_l(
        &self,
        p: &Vector3,
        epsilon: Float,
        sample: &LightSample,
    ) -> (Color, Vector3, Float, Ray);

    /// Sample a point on the light's surface. Returns the point, its surface
    /// normal (zero for lights without a meaningful one), and the area pdf.
    ///
    /// * `scene`  - The scene, for lights whose extent derives from it.
    /// * `sample` - The random variates to use.
    fn sample_position(&self, scene: &Scene, sample: &LightSample) -> (Vector3, Vector3, Float);

    /// Sample an outgoing direction from a point on the light. Returns the
    /// direction and its solid-angle pdf.
    ///
    /// * `surface_normal` - Normal at the sampled light position.
    /// * `u1`             - First random sample.
    /// * `u2`             - Second random sample.
    fn sample_direction(&self, surface_normal: &Vector3, u1: Float, u2: Float) -> (Vector3, Float);

    /// Returns the area pdf `sample_position` would report.
    ///
    /// * `scene` - The scene.
    fn pdf_position(&self, scene: &Scene) -> Float;

    /// Returns the solid-angle pdf `sample_direction` would report.
    ///
    /// * `p`  - The sampled light position.
    /// * `n`  - Normal at the sampled light position.
    /// * `wo` - The outgoing direction.
    fn pdf_direction(&self, p: &Vector3, n: &Vector3, wo: &Vector3) -> Float;

    /// Returns the solid-angle pdf at `p` for sampling the direction `wi`
    /// towards the light with `sample_l`. Zero for delta lights.
    ///
    /// * `p`  - The shading point.
    /// * `wi` - The direction. Assumed normalized.
    fn pdf(&self, p: &Vector3, wi: &Vector3) -> Float;

    /// Evaluate the radiance emitted from a light surface point towards a
    /// receiving point.
    ///
    /// * `p_light`   - Point on the light.
    /// * `n_light`   - Normal at the light point.
    /// * `p_surface` - The receiving point.
    fn eval_l(&self, p_light: &Vector3, n_light: &Vector3, p_surface: &Vector3) -> Color;

    /// Returns the radiance the light contributes along a ray that escaped
    /// the scene. Only environment lights respond; everything else is black.
    ///
    /// * `ray`  - The escaped ray.
    /// * `pdf`  - The pdf the direction was sampled with, for filtered
    ///   lookups.
    /// * `mask` - The BSDF component the ray was spawned from.
    fn le(&self, _ray: &Ray, _pdf: Float, _mask: BsdfType) -> Color {
        Color::BLACK
    }

    /// Returns the total emitted power, used to build the scene's pick-light
    /// distribution.
    ///
    /// * `scene` - The scene.
    fn power(&self, scene: &Scene) -> Color;

    /// Returns the number of samples the direct lighting estimator should
    /// take for this light.
    fn samples_num(&self) -> usize {
        1
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light + Send + Sync>;

/// AreaLight extends `Light` with the emitted-radiance query used when a ray
/// hits the light's geometry directly.
pub trait AreaLight: Light {
    /// Returns the radiance emitted at a surface point in a direction.
    ///
    /// * `p` - Point on the light surface.
    /// * `n` - Surface normal at the point.
    /// * `w` - Outgoing direction.
    fn l(&self, p: &Vector3, n: &Vector3, w: &Vector3) -> Color;
}

/// Atomic reference counted `AreaLight`.
pub type ArcAreaLight = Arc<dyn AreaLight + Send + Sync>;
