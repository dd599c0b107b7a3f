//! Integrator interface and the shared direct lighting estimator.

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::material::*;
use crate::core::primitive::*;
use crate::core::rng::*;
use crate::core::sampler::*;
use crate::core::sampling::*;
use crate::core::scene::Scene;

/// Light transport integrator interface. `li` estimates the radiance
/// arriving at the ray origin; `query_sample_quota` registers the sample
/// arrays the estimate consumes, once, before rendering starts.
pub trait Integrator: Send + Sync {
    /// Register this integrator's per-sample array requests.
    ///
    /// * `scene` - The scene about to be rendered.
    /// * `quota` - The quota to register on.
    fn query_sample_quota(&mut self, scene: &Scene, quota: &mut SampleQuota);

    /// Returns the incident radiance at the origin of the ray.
    ///
    /// * `scene`  - The scene.
    /// * `ray`    - The ray.
    /// * `sample` - The pixel sample carrying the registered arrays.
    /// * `rng`    - Random number generator for decisions past the
    ///   registered arrays (Russian roulette, deep bounces).
    fn li(&self, scene: &Scene, ray: &Ray, sample: &Sample, rng: &mut Rng) -> Color;
}

/// Estimate one light's contribution at a shading point by combining the
/// light-sampling and BSDF-sampling strategies with power-heuristic MIS.
///
/// Delta lights take the light-sampling strategy only. The BSDF-sampling
/// strategy counts the light's emission only when the continuation ray's
/// closest hit carries this very light, which keeps the two strategies from
/// double counting.
///
/// * `scene`        - The scene.
/// * `ray`          - The incoming ray; `-ray.d` is the outgoing direction.
/// * `epsilon`      - Surface offset for spawned rays.
/// * `intersection` - The shading intersection.
/// * `light`        - The light to estimate.
/// * `ls`           - Variates for the light-sampling strategy.
/// * `bs`           - Variates for the BSDF-sampling strategy.
/// * `mask`         - BSDF components to include.
#[allow(clippy::too_many_arguments)]
pub fn estimate_ld(
    scene: &Scene,
    ray: &Ray,
    epsilon: Float,
    intersection: &Intersection,
    light: &ArcLight,
    ls: &LightSample,
    bs: &BsdfSample,
    mask: BsdfType,
) -> Color {
    let mut ld = Color::BLACK;
    let material = &intersection.material;
    let fragment = &intersection.fragment;
    let wo = -ray.d.normalize();
    let p = fragment.position();
    let n = fragment.normal();

    // Light-sampling strategy.
    let (l, wi, light_pdf, shadow_ray) = light.sample_l(&p, epsilon, ls);
    if !l.is_black() && light_pdf > 0.0 {
        let f = material.bsdf(fragment, &wo, &wi, mask);
        if !f.is_black() && !scene.occluded(&shadow_ray) {
            if light.is_delta() {
                // A delta light cannot be reached by BSDF sampling, so this
                // one strategy carries the full estimate.
                return f * l * n.abs_dot(&wi) / light_pdf;
            }
            let bsdf_pdf = material.pdf(fragment, &wo, &wi, mask);
            let weight = power_heuristic(1, light_pdf, 1, bsdf_pdf);
            ld += f * l * n.abs_dot(&wi) * weight / light_pdf;
        }
    }

    // BSDF-sampling strategy.
    let sampled = material.sample_bsdf(fragment, &wo, bs, mask);
    if !sampled.f.is_black() && sampled.pdf > 0.0 {
        let mut weight = 1.0;
        if !sampled.sampled_type.is_specular() {
            let light_pdf = light.pdf(&p, &sampled.wi);
            if light_pdf == 0.0 {
                return ld;
            }
            weight = power_heuristic(1, sampled.pdf, 1, light_pdf);
        }

        let mut continuation = Ray::spawn(p, sampled.wi, epsilon, ray.depth + 1);
        if let Some(light_hit) = scene.intersect(&mut continuation) {
            let same_light = light_hit
                .area_light
                .as_ref()
                .is_some_and(|area| area.id() == light.id());
            if same_light {
                let li = light_hit.le(&-sampled.wi);
                if !li.is_black() {
                    ld += sampled.f * li * n.abs_dot(&sampled.wi) * weight / sampled.pdf;
                }
            }
        }
    }

    ld
}

/// Estimate direct lighting by picking one light from the scene's power
/// distribution; the pick probability divides out. Used by the path tracer
/// at every vertex.
///
/// * `scene`        - The scene.
/// * `ray`          - The incoming ray.
/// * `epsilon`      - Surface offset for spawned rays.
/// * `intersection` - The shading intersection.
/// * `ls`           - Variates for the light-sampling strategy.
/// * `bs`           - Variates for the BSDF-sampling strategy.
/// * `pick`         - Variate picking the light.
/// * `mask`         - BSDF components to include.
#[allow(clippy::too_many_arguments)]
pub fn single_sample_ld(
    scene: &Scene,
    ray: &Ray,
    epsilon: Float,
    intersection: &Intersection,
    ls: &LightSample,
    bs: &BsdfSample,
    pick: Float,
    mask: BsdfType,
) -> Color {
    match scene.sample_light(pick) {
        Some((light, pick_pdf)) => {
            estimate_ld(scene, ray, epsilon, intersection, light, ls, bs, mask) / pick_pdf
        }
        None => Color::BLACK,
    }
}

/// Estimate direct lighting from every light, averaging each light's
/// registered number of stratified samples. Used by the Whitted integrator
/// at the primary hit.
///
/// * `scene`         - The scene.
/// * `ray`           - The incoming ray.
/// * `epsilon`       - Surface offset for spawned rays.
/// * `intersection`  - The shading intersection.
/// * `sample`        - The pixel sample carrying the registered arrays.
/// * `light_indexes` - Per-light registered light sample indices.
/// * `bsdf_indexes`  - Per-light registered BSDF sample indices.
/// * `mask`          - BSDF components to include.
#[allow(clippy::too_many_arguments)]
pub fn multi_sample_ld(
    scene: &Scene,
    ray: &Ray,
    epsilon: Float,
    intersection: &Intersection,
    sample: &Sample,
    light_indexes: &[LightSampleIndex],
    bsdf_indexes: &[BsdfSampleIndex],
    mask: BsdfType,
) -> Color {
    let mut total = Color::BLACK;
    for (i, light) in scene.lights().iter().enumerate() {
        let samples_num = light_indexes[i].samples_num;
        let mut ld = Color::BLACK;
        for k in 0..samples_num {
            let ls = LightSample::from_sample(sample, &light_indexes[i], k);
            let bs = BsdfSample::from_sample(sample, &bsdf_indexes[i], k);
            ld += estimate_ld(scene, ray, epsilon, intersection, light, &ls, &bs, mask);
        }
        total += ld / samples_num as Float;
    }
    total
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
