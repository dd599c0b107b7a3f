//! Path Tracing Integrator

use super::direct_lighting_mask;
use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::integrator::*;
use crate::core::light::*;
use crate::core::material::*;
use crate::core::rng::*;
use crate::core::sampler::*;
use crate::core::scene::Scene;

/// Iterative unidirectional path tracer with next-event estimation at every
/// vertex and Russian roulette termination.
pub struct PathIntegrator {
    /// Maximum number of bounces.
    max_ray_depth: u32,

    /// Per-vertex registered pick-light indices.
    pick_light_indexes: Vec<SampleIndex>,

    /// Per-vertex registered light sample indices.
    light_sample_indexes: Vec<LightSampleIndex>,

    /// Per-vertex registered BSDF sample indices.
    bsdf_sample_indexes: Vec<BsdfSampleIndex>,
}

impl PathIntegrator {
    /// Bounce count after which Russian roulette starts.
    const RR_START: u32 = 3;

    /// Russian roulette survival probability floor.
    const RR_MIN_SURVIVAL: Float = 0.05;

    /// Create a new `PathIntegrator`.
    ///
    /// * `max_ray_depth` - Maximum number of bounces.
    pub fn new(max_ray_depth: u32) -> Self {
        Self {
            max_ray_depth,
            pick_light_indexes: vec![],
            light_sample_indexes: vec![],
            bsdf_sample_indexes: vec![],
        }
    }
}

impl Integrator for PathIntegrator {
    fn query_sample_quota(&mut self, _scene: &Scene, quota: &mut SampleQuota) {
        // One pick-light variate and one light/BSDF sample pair per path
        // vertex.
        let vertices = self.max_ray_depth as usize + 1;
        self.pick_light_indexes = (0..vertices).map(|_| quota.request_1d_quota(1)).collect();
        self.light_sample_indexes = (0..vertices)
            .map(|_| LightSampleIndex::new(quota, 1))
            .collect();
        self.bsdf_sample_indexes = (0..vertices)
            .map(|_| BsdfSampleIndex::new(quota, 1))
            .collect();
    }

    fn li(&self, scene: &Scene, ray: &Ray, sample: &Sample, rng: &mut Rng) -> Color {
        let mut l = Color::BLACK;
        let mut throughput = Color::WHITE;
        let mut specular_bounce = true;
        let mut current = *ray;

        for bounces in 0..=self.max_ray_depth {
            let intersection = match scene.intersect(&mut current) {
                Some(intersection) => intersection,
                None => {
                    // Environment emission only for camera and specular
                    // rays; light sampling already accounts for it
                    // elsewhere.
                    if bounces == 0 || specular_bounce {
                        l += throughput * scene.eval_environment_light(&current);
                    }
                    break;
                }
            };

            let wo = -current.d.normalize();

            // Emission when the path arrived here without a chance for
            // next-event estimation to have counted it.
            if bounces == 0 || specular_bounce {
                l += throughput * intersection.le(&wo);
            }

            // Next-event estimation at this vertex.
            let v = bounces as usize;
            let pick = sample.u1d[self.pick_light_indexes[v].offset][0];
            let ls = LightSample::from_sample(sample, &self.light_sample_indexes[v], 0);
            let bs = BsdfSample::from_sample(sample, &self.bsdf_sample_indexes[v], 0);
            l += throughput
                * single_sample_ld(
                    scene,
                    &current,
                    intersection.epsilon,
                    &intersection,
                    &ls,
                    &bs,
                    pick,
                    direct_lighting_mask(),
                );

            // Extend the path by sampling the full BSDF.
            let fragment = &intersection.fragment;
            let sampled = intersection.material.sample_bsdf(
                fragment,
                &wo,
                &BsdfSample::from_rng(rng),
                BsdfType::all(),
            );
            if sampled.f.is_black() || sampled.pdf == 0.0 {
                break;
            }
            throughput *= sampled.f * fragment.normal().abs_dot(&sampled.wi) / sampled.pdf;
            specular_bounce = sampled.sampled_type.is_specular();
            current = Ray::spawn(
                fragment.position(),
                sampled.wi,
                intersection.epsilon,
                current.depth + 1,
            );

            // Russian roulette on the path throughput.
            if bounces >= Self::RR_START {
                let q = clamp(throughput.max_component(), Self::RR_MIN_SURVIVAL, 1.0);
                if rng.uniform_float() > q {
                    break;
                }
                throughput /= q;
            }
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
    use crate::core::primitive::*;
    use crate::core::shape::*;
    use crate::core::test_utils::*;
    use crate::lights::{DiffuseAreaLight, ImageBasedLight};
    use crate::shapes::Sphere;
    use std::sync::Arc;

    fn mean_li(scene: &Scene, integrator: &mut PathIntegrator, ray: &Ray, spp: usize) -> Color {
        let mut quota = SampleQuota::default();
        integrator.query_sample_quota(scene, &mut quota);
        let mut sampler = Sampler::new(0, 1, 0, 1, spp, quota, 1234);
        let mut buf = sampler.allocate_sample_buffer();
        let mut rng = Rng::new(99);

        let mut sum = Color::BLACK;
        let mut count = 0;
        loop {
            let n = sampler.request_samples(&mut buf);
            if n == 0 {
                break;
            }
            for s in &buf[..n] {
                sum += integrator.li(scene, ray, s, &mut rng);
                count += 1;
            }
        }
        sum / count as Float
    }

    #[test]
    fn environment_light_reaches_camera_rays() {
        // An environment of constant radiance 2 with no geometry: every
        // camera ray escapes and reads the map.
        let ibl: ArcLight = Arc::new(ImageBasedLight::new(
            0,
            vec![Color::grey(2.0); 8],
            4,
            2,
            Color::WHITE,
            Quaternion::IDENTITY,
            1,
            1,
        ));
        let scene = empty_scene(vec![ibl]);
        let mut integrator = PathIntegrator::new(3);
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_X, 0.0);
        let l = mean_li(&scene, &mut integrator, &ray, 4);
        assert!((l.r - 2.0).abs() < 1e-3, "l {}", l.r);
    }

    /// Inward-facing icosahedral shell approximating an integrating sphere.
    fn inward_shell(radius: Float) -> crate::shapes::TriangleMesh {
        let phi = (1.0 + (5.0 as Float).sqrt()) / 2.0;
        let scale = radius / (1.0 + phi * phi).sqrt();
        let vertices: Vec<Vector3> = [
            (-1.0, phi, 0.0),
            (1.0, phi, 0.0),
            (-1.0, -phi, 0.0),
            (1.0, -phi, 0.0),
            (0.0, -1.0, phi),
            (0.0, 1.0, phi),
            (0.0, -1.0, -phi),
            (0.0, 1.0, -phi),
            (phi, 0.0, -1.0),
            (phi, 0.0, 1.0),
            (-phi, 0.0, -1.0),
            (-phi, 0.0, 1.0),
        ]
        .iter()
        .map(|&(x, y, z)| Vector3::new(x, y, z) * scale)
        .collect();

        let faces = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        // Force every face normal to point at the interior.
        let indices = faces
            .iter()
            .map(|&[a, b, c]: &[usize; 3]| {
                let n = (vertices[b] - vertices[a]).cross(&(vertices[c] - vertices[a]));
                let centroid = (vertices[a] + vertices[b] + vertices[c]) / 3.0;
                if n.dot(&centroid) > 0.0 {
                    [a, c, b]
                } else {
                    [a, b, c]
                }
            })
            .collect();

        crate::shapes::TriangleMesh::new(vertices, None, indices)
    }

    /// A closed white Lambertian shell that also emits uniformly: the
    /// equilibrium radiance inside an integrating sphere is Le / (1 - albedo).
    #[test]
    fn energy_conserves_in_an_integrating_sphere() {
        let albedo = 0.5;
        let le = 1.0;
        let shell: ArcShape = Arc::new(inward_shell(10.0));
        let area = Arc::new(DiffuseAreaLight::new(
            0,
            Color::grey(le),
            Arc::clone(&shell),
            Transform::default(),
            1,
        ));
        let emitter: ArcPrimitive = Arc::new(Model::new(
            shell,
            grey_lambert(albedo),
            Some(area.clone()),
        ));
        let aggregate: ArcPrimitive = Arc::new(Bvh::new(&[emitter], 1, SplitMethod::EqualCount));
        let scene = Scene::new(aggregate, fixture_camera(), vec![area], None);

        let mut integrator = PathIntegrator::new(16);
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Z, 0.0);
        let l = mean_li(&scene, &mut integrator, &ray, 1024);

        let expected = le / (1.0 - albedo);
        assert!(
            (l.r - expected).abs() < 0.1 * expected,
            "l {} expected {expected}",
            l.r
        );
    }

    #[test]
    fn single_bounce_depth_zero_sees_only_direct_light() {
        // A Lambert floor sphere and a small area light above it.
        let light_shape: ArcShape = Arc::new(Sphere::new(0.25));
        let to_light = Transform::translate(Vector3::new(0.0, 0.0, 5.0));
        let area = Arc::new(DiffuseAreaLight::new(
            0,
            Color::grey(50.0),
            Arc::clone(&light_shape),
            to_light,
            1,
        ));
        let emitter: ArcPrimitive = Arc::new(Instance::new(
            Arc::new(Model::new(light_shape, grey_lambert(0.0), Some(area.clone()))),
            to_light,
        ));
        let floor: ArcPrimitive = Arc::new(Model::new(
            Arc::new(Sphere::new(1.0)) as ArcShape,
            grey_lambert(0.6),
            None,
        ));
        let aggregate: ArcPrimitive =
            Arc::new(Bvh::new(&[emitter, floor], 1, SplitMethod::EqualCount));
        let scene = Scene::new(aggregate, fixture_camera(), vec![area], None);

        let ray = Ray::new(Vector3::new(0.0, 0.0, 3.0), -Vector3::UNIT_Z, 0.0);

        let mut shallow = PathIntegrator::new(0);
        let l0 = mean_li(&scene, &mut shallow, &ray, 64);
        assert!(l0.r > 0.0);

        // Adding bounces adds energy (interreflection), never removes it;
        // allow for Monte Carlo noise between the two runs.
        let mut deep = PathIntegrator::new(4);
        let l4 = mean_li(&scene, &mut deep, &ray, 64);
        assert!(l4.r >= 0.8 * l0.r, "l0 {} l4 {}", l0.r, l4.r);
    }

    #[test]
    fn camera_ray_hitting_the_light_reads_its_emission() {
        let light_shape: ArcShape = Arc::new(Sphere::new(1.0));
        let area = Arc::new(DiffuseAreaLight::new(
            0,
            Color::grey(5.0),
            Arc::clone(&light_shape),
            Transform::default(),
            1,
        ));
        let emitter: ArcPrimitive = Arc::new(Model::new(
            light_shape,
            grey_lambert(0.0),
            Some(area.clone()),
        ));
        let aggregate: ArcPrimitive = Arc::new(Bvh::new(&[emitter], 1, SplitMethod::EqualCount));
        let scene = Scene::new(aggregate, fixture_camera(), vec![area], None);

        let mut integrator = PathIntegrator::new(2);
        let ray = Ray::new(Vector3::new(0.0, 0.0, 4.0), -Vector3::UNIT_Z, 0.0);
        let l = mean_li(&scene, &mut integrator, &ray, 16);
        assert!((l.r - 5.0).abs() < 1e-3, "l {}", l.r);
    }
}
