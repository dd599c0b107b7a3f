//! Point Light

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::sampling::*;
use crate::core::scene::Scene;

/// An isotropic point light emitting the same intensity in all directions.
pub struct PointLight {
    /// Light id.
    id: usize,

    /// Intensity.
    intensity: Color,

    /// Position.
    position: Vector3,
}

impl PointLight {
    /// Return a new `PointLight`.
    ///
    /// * `id`        - Light id.
    /// * `intensity` - Intensity.
    /// * `position`  - Position.
    pub fn new(id: usize, intensity: Color, position: Vector3) -> Self {
        Self {
            id,
            intensity,
            position,
        }
    }
}

impl Light for PointLight {
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
        let dir = self.position - *p;
        let squared_distance = dir.squared_length();
        let wi = dir / squared_distance.sqrt();
        let shadow_ray = Ray::segment(*p, wi, epsilon, squared_distance.sqrt() - epsilon);
        (self.intensity / squared_distance, wi, 1.0, shadow_ray)
    }

    fn sample_position(&self, _scene: &Scene, _sample: &LightSample) -> (Vector3, Vector3, Float) {
        // There is only one possible position for a point light.
        (self.position, Vector3::ZERO, 1.0)
    }

    fn sample_direction(&self, _surface_normal: &Vector3, u1: Float, u2: Float) -> (Vector3, Float) {
        (uniform_sample_sphere(u1, u2), uniform_sphere_pdf())
    }

    fn pdf_position(&self, _scene: &Scene) -> Float {
        0.0
    }

    fn pdf_direction(&self, _p: &Vector3, _n: &Vector3, _wo: &Vector3) -> Float {
        uniform_sphere_pdf()
    }

    fn pdf(&self, _p: &Vector3, _wi: &Vector3) -> Float {
        0.0
    }

    fn eval_l(&self, _p_light: &Vector3, _n_light: &Vector3, p_surface: &Vector3) -> Color {
        let squared_distance = (self.position - *p_surface).squared_length();
        self.intensity / squared_distance
    }

    fn power(&self, _scene: &Scene) -> Color {
        FOUR_PI * self.intensity
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
