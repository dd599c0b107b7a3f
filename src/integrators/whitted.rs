//! Whitted Integrator

use super::direct_lighting_mask;
use crate::core::color::*;
use crate::core::geometry::*;
use crate::core::integrator::*;
use crate::core::light::*;
use crate::core::material::*;
use crate::core::primitive::*;
use crate::core::rng::*;
use crate::core::sampler::*;
use crate::core::scene::Scene;

/// Whitted-style ray tracing: direct lighting from every light at the hit,
/// plus recursive perfect specular reflection and refraction. No indirect
/// diffuse transport.
pub struct WhittedIntegrator {
    /// Maximum specular recursion depth.
    max_ray_depth: u32,

    /// Per-light registered light sample indices.
    light_sample_indexes: Vec<LightSampleIndex>,

    /// Per-light registered BSDF sample indices.
    bsdf_sample_indexes: Vec<BsdfSampleIndex>,
}

impl WhittedIntegrator {
    /// Create a new `WhittedIntegrator`.
    ///
    /// * `max_ray_depth` - Maximum specular recursion depth.
    pub fn new(max_ray_depth: u32) -> Self {
        Self {
            max_ray_depth,
            light_sample_indexes: vec![],
            bsdf_sample_indexes: vec![],
        }
    }

    /// Trace the perfect specular reflection ray and recurse.
    fn specular_reflect(
        &self,
        scene: &Scene,
        ray: &Ray,
        intersection: &Intersection,
        sample: &Sample,
        rng: &mut Rng,
    ) -> Color {
        self.specular_bounce(
            scene,
            ray,
            intersection,
            sample,
            rng,
            BsdfType::SPECULAR | BsdfType::REFLECTION,
        )
    }

    /// Trace the perfect specular refraction ray and recurse.
    fn specular_refract(
        &self,
        scene: &Scene,
        ray: &Ray,
        intersection: &Intersection,
        sample: &Sample,
        rng: &mut Rng,
    ) -> Color {
        self.specular_bounce(
            scene,
            ray,
            intersection,
            sample,
            rng,
            BsdfType::SPECULAR | BsdfType::TRANSMISSION,
        )
    }

    fn specular_bounce(
        &self,
        scene: &Scene,
        ray: &Ray,
        intersection: &Intersection,
        sample: &Sample,
        rng: &mut Rng,
        mask: BsdfType,
    ) -> Color {
        let fragment = &intersection.fragment;
        let wo = -ray.d.normalize();
        let n = fragment.normal();

        // A delta lobe has a single outgoing direction, so the sample
        // variates are irrelevant.
        let sampled =
            intersection
                .material
                .sample_bsdf(fragment, &wo, &BsdfSample::default(), mask);
        if sampled.f.is_black() || sampled.pdf == 0.0 || n.abs_dot(&sampled.wi) == 0.0 {
            return Color::BLACK;
        }

        let bounce = Ray::spawn(
            fragment.position(),
            sampled.wi,
            intersection.epsilon,
            ray.depth + 1,
        );
        let li = self.li(scene, &bounce, sample, rng);
        sampled.f * li * n.abs_dot(&sampled.wi) / sampled.pdf
    }
}

impl Integrator for WhittedIntegrator {
    fn query_sample_quota(&mut self, scene: &Scene, quota: &mut SampleQuota) {
        self.light_sample_indexes = scene
            .lights()
            .iter()
            .map(|light| LightSampleIndex::new(quota, light.samples_num()))
            .collect();
        self.bsdf_sample_indexes = scene
            .lights()
            .iter()
            .map(|light| BsdfSampleIndex::new(quota, light.samples_num()))
            .collect();
    }

    fn li(&self, scene: &Scene, ray: &Ray, sample: &Sample, rng: &mut Rng) -> Color {
        let mut traced = *ray;
        let intersection = match scene.intersect(&mut traced) {
            Some(intersection) => intersection,
            None => return scene.eval_environment_light(ray),
        };

        let wo = -ray.d.normalize();

        // Emission at the hit plus direct lighting from every light.
        let mut l = intersection.le(&wo);
        l += multi_sample_ld(
            scene,
            ray,
            intersection.epsilon,
            &intersection,
            sample,
            &self.light_sample_indexes,
            &self.bsdf_sample_indexes,
            direct_lighting_mask(),
        );

        if ray.depth + 1 < self.max_ray_depth {
            l += self.specular_reflect(scene, ray, &intersection, sample, rng);
            l += self.specular_refract(scene, ray, &intersection, sample, rng);
        }

        l
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accelerators::{Bvh, SplitMethod};
    use crate::core::common::*;
    use crate::core::shape::*;
    use crate::core::test_utils::*;
    use crate::lights::DirectionalLight;
    use crate::materials::Mirror;
    use crate::shapes::Disk;
    use crate::textures::ConstantTexture;
    use std::sync::Arc;

    fn run_li(scene: &Scene, integrator: &mut WhittedIntegrator, ray: &Ray) -> Color {
        let mut quota = SampleQuota::default();
        integrator.query_sample_quota(scene, &mut quota);
        let mut sampler = Sampler::new(0, 1, 0, 1, 1, quota, 7);
        let mut buf = sampler.allocate_sample_buffer();
        assert!(sampler.request_samples(&mut buf) > 0);
        let mut rng = Rng::new(1);
        integrator.li(scene, ray, &buf[0], &mut rng)
    }

    #[test]
    fn directional_radiometry_on_a_lambert_disk() {
        // Albedo 0.5 disk facing +z, unit radiance light along -z: the
        // reflected radiance is albedo/π.
        let light: ArcLight = Arc::new(DirectionalLight::new(
            0,
            Color::WHITE,
            Vector3::new(0.0, 0.0, -1.0),
        ));
        let shape: ArcShape = Arc::new(Disk::new(1.0));
        let model: ArcPrimitive = Arc::new(Model::new(shape, grey_lambert(0.5), None));
        let aggregate: ArcPrimitive = Arc::new(Bvh::new(&[model], 1, SplitMethod::EqualCount));
        let scene = Scene::new(aggregate, fixture_camera(), vec![light], None);

        let mut integrator = WhittedIntegrator::new(5);
        let ray = Ray::new(Vector3::new(0.0, 0.0, 3.0), -Vector3::UNIT_Z, 0.0);
        let l = run_li(&scene, &mut integrator, &ray);

        let expected = 0.5 * INV_PI;
        assert!((l.r - expected).abs() < 0.01 * expected, "l {}", l.r);
    }

    #[test]
    fn misses_return_environment_emission() {
        let scene = empty_scene(vec![]);
        let mut integrator = WhittedIntegrator::new(5);
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Z, 0.0);
        assert!(run_li(&scene, &mut integrator, &ray).is_black());
    }

    #[test]
    fn mirror_reflects_the_environment_map() {
        use crate::lights::ImageBasedLight;

        // A perfect mirror under a constant-radiance environment: the
        // reflected ray escapes and must read the map value exactly.
        let ibl: ArcLight = Arc::new(ImageBasedLight::new(
            0,
            vec![Color::grey(3.0); 8],
            4,
            2,
            Color::WHITE,
            Quaternion::IDENTITY,
            1,
            1,
        ));
        let mirror_material: ArcMaterial =
            Arc::new(Mirror::new(Arc::new(ConstantTexture::new(Color::WHITE))));
        let mirror: ArcPrimitive = Arc::new(Model::new(
            Arc::new(Disk::new(1.0)) as ArcShape,
            mirror_material,
            None,
        ));
        let aggregate: ArcPrimitive = Arc::new(Bvh::new(&[mirror], 1, SplitMethod::EqualCount));
        let scene = Scene::new(aggregate, fixture_camera(), vec![ibl], None);

        let mut integrator = WhittedIntegrator::new(3);
        let ray = Ray::new(Vector3::new(0.3, 0.1, 2.0), -Vector3::UNIT_Z, 0.0);
        let l = run_li(&scene, &mut integrator, &ray);
        assert!((l.r - 3.0).abs() < 1e-3, "l {}", l.r);
    }

    #[test]
    fn mirror_reflects_the_light_below_the_depth_limit() {
        // Mirror disk at z=0 facing +z; directional light along -z. The
        // mirror ray leaves the scene upward, so only the light's absence
        // matters; with a second Lambert disk above, the mirror sees it.
        let light: ArcLight = Arc::new(DirectionalLight::new(
            0,
            Color::WHITE,
            Vector3::new(0.0, 0.0, 1.0),
        ));

        let mirror_material: ArcMaterial =
            Arc::new(Mirror::new(Arc::new(ConstantTexture::new(Color::WHITE))));
        let mirror: ArcPrimitive = Arc::new(Model::new(
            Arc::new(Disk::new(1.0)) as ArcShape,
            mirror_material,
            None,
        ));

        // A Lambert ceiling at z=4 facing down (rotated π about x), large
        // enough to catch the shallow mirror bounce.
        let ceiling: ArcPrimitive = Arc::new(Instance::new(
            Arc::new(Model::new(
                Arc::new(Disk::new(20.0)) as ArcShape,
                grey_lambert(0.5),
                None,
            )),
            Transform::new(
                Vector3::new(0.0, 0.0, 4.0),
                Quaternion::from_axis_angle(&Vector3::UNIT_X, PI),
                Vector3::new(1.0, 1.0, 1.0),
            ),
        ));

        let aggregate: ArcPrimitive =
            Arc::new(Bvh::new(&[mirror, ceiling], 1, SplitMethod::EqualCount));
        let scene = Scene::new(aggregate, fixture_camera(), vec![light], None);

        // Down the axis onto the mirror from just below the ceiling edge.
        let ray = Ray::new(Vector3::new(2.0, 0.0, 0.5), (-Vector3::UNIT_X * 2.0 - Vector3::UNIT_Z * 0.5).normalize(), 0.0);
        let mut deep = WhittedIntegrator::new(5);
        let l_deep = run_li(&scene, &mut deep, &ray);

        let mut shallow = WhittedIntegrator::new(1);
        let l_shallow = run_li(&scene, &mut shallow, &ray);

        // The shallow integrator cannot follow the mirror bounce.
        assert!(l_deep.r > 0.0);
        assert!(l_shallow.is_black());
    }
}
