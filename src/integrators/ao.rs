//! Ambient Occlusion Integrator

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::integrator::*;
use crate::core::material::BsdfType;
use crate::core::rng::*;
use crate::core::sampler::*;
use crate::core::sampling::*;
use crate::core::scene::Scene;

/// Ambient occlusion: the fraction of the cosine-weighted hemisphere above
/// the primary hit that reaches the sky, times the surface albedo. No
/// recursion, no lights.
pub struct AoIntegrator {
    /// Number of occlusion rays per primary hit.
    ao_samples: usize,

    /// Registered index of the occlusion direction array.
    sample_index: SampleIndex,
}

impl AoIntegrator {
    /// Create a new `AoIntegrator`.
    ///
    /// * `ao_samples` - Number of occlusion rays per primary hit.
    pub fn new(ao_samples: usize) -> Self {
        Self {
            ao_samples: max(ao_samples, 1),
            sample_index: SampleIndex::default(),
        }
    }
}

impl Integrator for AoIntegrator {
    fn query_sample_quota(&mut self, _scene: &Scene, quota: &mut SampleQuota) {
        self.sample_index = quota.request_2d_quota(self.ao_samples);
    }

    fn li(&self, scene: &Scene, ray: &Ray, sample: &Sample, _rng: &mut Rng) -> Color {
        let mut traced = *ray;
        let intersection = match scene.intersect(&mut traced) {
            Some(intersection) => intersection,
            None => return Color::BLACK,
        };

        let fragment = &intersection.fragment;
        let wo = -ray.d.normalize();
        let mut n = fragment.normal();
        if n.dot(&wo) < 0.0 {
            n = -n;
        }
        let (tangent, bitangent) = coordinate_system(&n);

        let pairs = &sample.u2d[self.sample_index.offset];
        let mut unoccluded = 0_usize;
        for k in 0..self.sample_index.sample_num {
            let local = cosine_sample_hemisphere(pairs[2 * k], pairs[2 * k + 1]);
            let dir = local.x * tangent + local.y * bitangent + local.z * n;
            let occlusion_ray = Ray::spawn(
                fragment.position(),
                dir,
                intersection.epsilon,
                ray.depth + 1,
            );
            if !scene.occluded(&occlusion_ray) {
                unoccluded += 1;
            }
        }

        let fraction = unoccluded as Float / self.sample_index.sample_num as Float;
        let albedo = PI * intersection.material.bsdf(fragment, &wo, &wo, BsdfType::all());
        albedo * fraction
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
    use crate::core::scene::Scene;
    use crate::core::shape::*;
    use crate::core::test_utils::*;
    use crate::shapes::{Disk, Sphere};
    use std::sync::Arc;

    /// A big ground disk with a unit sphere resting on it at the origin.
    fn sphere_on_plane() -> Scene {
        let ground: ArcPrimitive = Arc::new(Model::new(
            Arc::new(Disk::new(100.0)) as ArcShape,
            grey_lambert(1.0),
            None,
        ));
        let ball: ArcPrimitive = Arc::new(Instance::new(
            Arc::new(Model::new(
                Arc::new(Sphere::new(1.0)) as ArcShape,
                grey_lambert(1.0),
                None,
            )),
            Transform::translate(Vector3::new(0.0, 0.0, 1.0)),
        ));
        let aggregate: ArcPrimitive =
            Arc::new(Bvh::new(&[ground, ball], 1, SplitMethod::EqualCount));
        Scene::new(aggregate, fixture_camera(), vec![], None)
    }

    fn run_li(scene: &Scene, integrator: &mut AoIntegrator, ray: &Ray) -> Color {
        let mut quota = SampleQuota::default();
        integrator.query_sample_quota(scene, &mut quota);
        let mut sampler = Sampler::new(0, 1, 0, 1, 1, quota, 31);
        let mut buf = sampler.allocate_sample_buffer();
        assert!(sampler.request_samples(&mut buf) > 0);
        let mut rng = Rng::new(2);
        integrator.li(scene, ray, &buf[0], &mut rng)
    }

    #[test]
    fn contact_point_is_fully_occluded() {
        let scene = sphere_on_plane();
        let mut integrator = AoIntegrator::new(64);
        // Graze in under the sphere towards the ground next to the contact
        // point; a vertical probe would hit the sphere's top instead.
        let origin = Vector3::new(5.0, 0.0, 0.2);
        let target = Vector3::new(0.05, 0.0, 0.0);
        let ray = Ray::new(origin, (target - origin).normalize(), 0.0);
        let l = run_li(&scene, &mut integrator, &ray);
        // Nearly the whole hemisphere is blocked by the resting sphere.
        assert!(l.r < 0.1, "l {}", l.r);
    }

    #[test]
    fn occlusion_recovers_with_distance_from_the_sphere() {
        let scene = sphere_on_plane();
        let mut integrator = AoIntegrator::new(64);
        // One sphere radius away from the contact point on the ground.
        let ray = Ray::new(Vector3::new(1.0, 0.0, 5.0), -Vector3::UNIT_Z, 0.0);
        let near = run_li(&scene, &mut integrator, &ray);
        assert!(near.r > 0.3 && near.r < 0.9, "near {}", near.r);

        let ray = Ray::new(Vector3::new(4.0, 0.0, 5.0), -Vector3::UNIT_Z, 0.0);
        let far = run_li(&scene, &mut integrator, &ray);
        assert!(far.r > near.r, "near {} far {}", near.r, far.r);
    }

    #[test]
    fn fully_open_ground_reads_the_albedo() {
        let scene = sphere_on_plane();
        let mut integrator = AoIntegrator::new(64);
        let ray = Ray::new(Vector3::new(50.0, 0.0, 5.0), -Vector3::UNIT_Z, 0.0);
        let l = run_li(&scene, &mut integrator, &ray);
        assert!((l.r - 1.0).abs() < 0.05, "l {}", l.r);
    }

    #[test]
    fn misses_are_black() {
        let scene = empty_scene(vec![]);
        let mut integrator = AoIntegrator::new(4);
        let ray = Ray::new(Vector3::ZERO, Vector3::UNIT_Z, 0.0);
        assert!(run_li(&scene, &mut integrator, &ray).is_black());
    }
}
