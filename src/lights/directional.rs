//! Directional Light

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::sampling::*;
use crate::core::scene::Scene;

/// A light infinitely far away emitting constant radiance along one
/// direction.
pub struct DirectionalLight {
    /// Light id.
    id: usize,

    /// Emitted radiance.
    radiance: Color,

    /// Emission direction. Normalized.
    direction: Vector3,
}

impl DirectionalLight {
    /// Return a new `DirectionalLight`.
    ///
    /// * `id`        - Light id.
    /// * `radiance`  - Emitted radiance.
    /// * `direction` - Emission direction.
    pub fn new(id: usize, radiance: Color, direction: Vector3) -> Self {
        Self {
            id,
            radiance,
            direction: direction.normalize(),
        }
    }
}

impl Light for DirectionalLight {
    fn id(&self) -> usize {
        self.id
    }

    fn is_delta(&self) -> bool {
        true
    }

    fn sample_l(
        &self,
        p: &Vector3,
        epsilon: Float,
        _sample: &LightSample,
    ) -> (Color, Vector3, Float, Ray) {
        let wi = -self.direction;
        let shadow_ray = Ray::new(*p, wi, epsilon);
        (self.radiance, wi, 1.0, shadow_ray)
    }

    /// Approximate position sampling over the scene's bounding sphere: pick
    /// a point on the disk perpendicular to the light direction and push it
    /// back out a world radius.
    fn sample_position(&self, scene: &Scene, sample: &LightSample) -> (Vector3, Vector3, Float) {
        let (world_center, world_radius) = scene.bounding_sphere();
        let (x_axis, y_axis) = coordinate_system(&self.direction);
        let disk = uniform_sample_disk(sample.u_geometry[0], sample.u_geometry[1]);
        let disk_point = world_center + world_radius * (disk.x * x_axis + disk.y * y_axis);
        let pdf_area = 1.0 / (PI * world_radius * world_radius);
        (
            disk_point - self.direction * world_radius,
            Vector3::ZERO,
            pdf_area,
        )
    }

    fn sample_direction(&self, _surface_normal: &Vector3, _u1: Float, _u2: Float) -> (Vector3, Float) {
        (self.direction, 1.0)
    }

    fn pdf_position(&self, scene: &Scene) -> Float {
        let (_, world_radius) = scene.bounding_sphere();
        1.0 / (PI * world_radius * world_radius)
    }

    fn pdf_direction(&self, _p: &Vector3, _n: &Vector3, _wo: &Vector3) -> Float {
        0.0
    }

    fn pdf(&self, _p: &Vector3, _wi: &Vector3) -> Float {
        0.0
    }

    fn eval_l(&self, _p_light: &Vector3, _n_light: &Vector3, _p_surface: &Vector3) -> Color {
        self.radiance
    }

    /// The world cannot be infinitely big; approximate the power through the
    /// scene's bounding sphere cross-section.
    fn power(&self, scene: &Scene) -> Color {
        let (_, radius) = scene.bounding_sphere();
        radius * radius * PI * self.radiance
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::*;

    #[test]
    fn samples_against_the_emission_direction() {
        let light = DirectionalLight::new(0, Color::WHITE, Vector3::new(0.0, -1.0, 0.0));
        let (l, wi, pdf, shadow) = light.sample_l(&Vector3::ZERO, 1e-3, &LightSample::default());
        assert_eq!(l, Color::WHITE);
        assert_eq!(pdf, 1.0);
        assert!((wi - Vector3::UNIT_Y).length() < 1e-5);
        // The shadow ray is unbounded.
        assert_eq!(shadow.maxt, INFINITY);
        assert!(light.is_delta());
        assert_eq!(light.pdf(&Vector3::ZERO, &wi), 0.0);
    }

    #[test]
    fn position_samples_sit_outside_the_scene() {
        let scene = unit_sphere_scene(vec![]);
        let light = DirectionalLight::new(0, Color::WHITE, Vector3::UNIT_Z);
        let (_, radius) = scene.bounding_sphere();

        let mut rng = crate::core::rng::Rng::new(3);
        for _ in 0..100 {
            let sample = LightSample::from_rng(&mut rng);
            let (p, _, pdf_area) = light.sample_position(&scene, &sample);
            assert!((pdf_area - light.pdf_position(&scene)).abs() < 1e-6);
            // Behind the scene with respect to the light direction.
            assert!(p.z <= -radius + 1e-4);
        }
    }

    #[test]
    fn power_scales_with_world_cross_section() {
        let scene = unit_sphere_scene(vec![]);
        let light = DirectionalLight::new(0, Color::grey(1.0), Vector3::UNIT_Z);
        let (_, radius) = scene.bounding_sphere();
        let power = light.power(&scene);
        assert!((power.r - PI * radius * radius).abs() < 1e-4);
    }
}
