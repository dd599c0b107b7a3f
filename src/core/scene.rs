//! Scene

#![allow(dead_code)]

use crate::core::camera::*;
use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::material::BsdfType;
use crate::core::primitive::*;
use crate::core::sampling::*;
use crate::core::volume::*;
use std::sync::Arc;

/// The renderable scene: the primitive aggregate, the camera, the light set,
/// an optional participating volume, and the power-weighted distribution used
/// to pick a light at each shading event. Immutable once built.
pub struct Scene {
    /// Aggregate of all primitives in the scene.
    aggregate: ArcPrimitive,

    /// The camera.
    camera: ArcCamera,

    /// All light sources in the scene.
    lights: Vec<ArcLight>,

    /// Optional participating volume.
    volume: Option<VolumeRegion>,

    /// Discrete distribution over lights weighted by emitted power.
    power_distribution: Cdf1D,
}

impl Scene {
    /// Create a new `Scene`. The pick-light distribution is derived from the
    /// luminance of each light's power.
    ///
    /// * `aggregate` - Aggregate of all primitives in the scene.
    /// * `camera`    - The camera.
    /// * `lights`    - All light sources in the scene.
    /// * `volume`    - Optional participating volume.
    pub fn new(
        aggregate: ArcPrimitive,
        camera: ArcCamera,
        lights: Vec<ArcLight>,
        volume: Option<VolumeRegion>,
    ) -> Self {
        let mut scene = Self {
            aggregate,
            camera,
            lights,
            volume,
            power_distribution: Cdf1D::new(vec![]),
        };
        let powers: Vec<Float> = scene
            .lights
            .iter()
            .map(|light| light.power(&scene).luminance())
            .collect();
        scene.power_distribution = Cdf1D::new(powers);
        scene
    }

    /// Returns the camera.
    pub fn camera(&self) -> &ArcCamera {
        &self.camera
    }

    /// Returns the scene's light sources.
    pub fn lights(&self) -> &[ArcLight] {
        &self.lights
    }

    /// Returns the participating volume, if the scene has one.
    pub fn volume(&self) -> Option<&VolumeRegion> {
        self.volume.as_ref()
    }

    /// Returns the bounding sphere of the scene geometry.
    pub fn bounding_sphere(&self) -> (Vector3, Float) {
        self.aggregate.bbox().bounding_sphere()
    }

    /// Trace the ray into the scene. On the closest hit the hit material's
    /// normal perturbation is applied to the fragment before it is returned.
    ///
    /// * `ray` - The ray. `ray.maxt` is tightened to the hit.
    pub fn intersect(&self, ray: &mut Ray) -> Option<Intersection> {
        let mut hit = self.aggregate.intersect(ray)?;
        let material = Arc::clone(&hit.material);
        material.perturb(&mut hit.fragment);
        Some(hit)
    }

    /// Returns `true` if anything blocks the ray.
    ///
    /// * `ray` - The shadow ray.
    pub fn occluded(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }

    /// Pick a light according to the power distribution. Returns the light
    /// and the probability it was picked with, or `None` for a lightless
    /// scene.
    ///
    /// * `u` - The random sample.
    pub fn sample_light(&self, u: Float) -> Option<(&ArcLight, Float)> {
        if self.lights.is_empty() {
            return None;
        }
        let (index, pdf) = self.power_distribution.sample_discrete(u);
        if pdf == 0.0 {
            return None;
        }
        Some((&self.lights[index], pdf))
    }

    /// Sum the environment emission of every light along an escaped ray.
    ///
    /// * `ray` - The escaped ray.
    pub fn eval_environment_light(&self, ray: &Ray) -> Color {
        let mut l = Color::BLACK;
        for light in &self.lights {
            l += light.le(ray, 1.0, BsdfType::SPECULAR);
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
    use crate::cameras::PerspectiveCamera;
    use crate::core::material::*;
    use crate::core::shape::*;
    use crate::lights::PointLight;
    use crate::materials::Lambert;
    use crate::shapes::Sphere;
    use crate::textures::ConstantTexture;

    fn test_camera() -> ArcCamera {
        Arc::new(PerspectiveCamera::new(
            Transform::translate(Vector3::new(0.0, 0.0, -5.0)),
            radians(60.0),
            0.0,
            1.0,
            16,
            16,
        ))
    }

    fn grey_material() -> ArcMaterial {
        Arc::new(Lambert::new(Arc::new(ConstantTexture::new(Color::grey(0.5)))))
    }

    fn sphere_scene(lights: Vec<ArcLight>) -> Scene {
        let shape: ArcShape = Arc::new(Sphere::new(1.0));
        let model: ArcPrimitive = Arc::new(Model::new(shape, grey_material(), None));
        let aggregate: ArcPrimitive =
            Arc::new(Bvh::new(&[model], 1, SplitMethod::EqualCount));
        Scene::new(aggregate, test_camera(), lights, None)
    }

    #[test]
    fn intersect_and_occlusion_agree() {
        let scene = sphere_scene(vec![]);
        let mut ray = Ray::new(Vector3::new(0.0, 0.0, -4.0), Vector3::UNIT_Z, 0.0);
        assert!(scene.intersect(&mut ray).is_some());
        assert!((ray.maxt - 3.0).abs() < 1e-4);
        assert!(scene.occluded(&Ray::new(
            Vector3::new(0.0, 0.0, -4.0),
            Vector3::UNIT_Z,
            0.0
        )));
    }

    #[test]
    fn lightless_scene_has_no_pickable_light() {
        let scene = sphere_scene(vec![]);
        assert!(scene.sample_light(0.5).is_none());
    }

    #[test]
    fn power_distribution_prefers_brighter_lights() {
        let dim: ArcLight = Arc::new(PointLight::new(
            0,
            Color::grey(1.0),
            Vector3::new(0.0, 5.0, 0.0),
        ));
        let bright: ArcLight = Arc::new(PointLight::new(
            1,
            Color::grey(100.0),
            Vector3::new(0.0, -5.0, 0.0),
        ));
        let scene = sphere_scene(vec![dim, bright]);

        let mut rng = crate::core::rng::Rng::new(12);
        let mut bright_picks = 0;
        let n = 10_000;
        for _ in 0..n {
            let (light, pdf) = scene.sample_light(rng.uniform_float()).unwrap();
            assert!(pdf > 0.0);
            if light.id() == 1 {
                bright_picks += 1;
            }
        }
        let fraction = bright_picks as Float / n as Float;
        assert!((fraction - 100.0 / 101.0).abs() < 0.02, "fraction {fraction}");
    }

    #[test]
    fn bounding_sphere_covers_geometry() {
        let scene = sphere_scene(vec![]);
        let (center, radius) = scene.bounding_sphere();
        assert!(center.length() < 1e-4);
        assert!(radius >= 1.0);
    }
}
