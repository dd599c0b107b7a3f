//! Spot Light

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::sampling::*;
use crate::core::scene::Scene;

/// A point light restricted to a cone, with a smooth falloff between the hot
/// cone and the cutoff.
pub struct SpotLight {
    /// Light id.
    id: usize,

    /// Intensity.
    intensity: Color,

    /// Position.
    position: Vector3,

    /// Orientation mapping local +z onto the cone axis.
    orientation: Quaternion,

    /// Cosine of the cutoff angle.
    cos_theta_max: Float,

    /// Cosine of the angle where the falloff starts.
    cos_falloff_start: Float,
}

impl SpotLight {
    /// Return a new `SpotLight`.
    ///
    /// * `id`                - Light id.
    /// * `intensity`         - Intensity.
    /// * `position`          - Position.
    /// * `direction`         - Cone axis.
    /// * `cos_theta_max`     - Cosine of the cutoff angle.
    /// * `cos_falloff_start` - Cosine of the angle where the falloff starts.
    pub fn new(
        id: usize,
        intensity: Color,
        position: Vector3,
        direction: Vector3,
        cos_theta_max: Float,
        cos_falloff_start: Float,
    ) -> Self {
        debug_assert!(cos_theta_max <= cos_falloff_start);
        Self {
            id,
            intensity,
            position,
            orientation: orientation_towards(&direction.normalize()),
            cos_theta_max,
            cos_falloff_start,
        }
    }

    fn axis(&self) -> Vector3 {
        self.orientation.rotate(&Vector3::UNIT_Z)
    }

    /// Quartic falloff on cosθ: 1 inside the hot cone, 0 outside the cutoff.
    ///
    /// * `w` - Direction from the light. Assumed normalized.
    fn falloff(&self, w: &Vector3) -> Float {
        let cos_theta = w.dot(&self.axis());
        if cos_theta < self.cos_theta_max {
            return 0.0;
        }
        if cos_theta > self.cos_falloff_start {
            return 1.0;
        }
        let delta =
            (cos_theta - self.cos_theta_max) / (self.cos_falloff_start - self.cos_theta_max);
        delta * delta * delta * delta
    }
}

impl Light for SpotLight {
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
        let l = self.falloff(&-wi) * self.intensity / squared_distance;
        (l, wi, 1.0, shadow_ray)
    }

    fn sample_position(&self, _scene: &Scene, _sample: &LightSample) -> (Vector3, Vector3, Float) {
        (self.position, Vector3::ZERO, 1.0)
    }

    fn sample_direction(&self, _surface_normal: &Vector3, u1: Float, u2: Float) -> (Vector3, Float) {
        let local = uniform_sample_cone(u1, u2, self.cos_theta_max);
        (
            self.orientation.rotate(&local),
            uniform_cone_pdf(self.cos_theta_max),
        )
    }

    fn pdf_position(&self, _scene: &Scene) -> Float {
        0.0
    }

    fn pdf_direction(&self, _p: &Vector3, _n: &Vector3, _wo: &Vector3) -> Float {
        uniform_cone_pdf(self.cos_theta_max)
    }

    fn pdf(&self, _p: &Vector3, _wi: &Vector3) -> Float {
        0.0
    }

    fn eval_l(&self, _p_light: &Vector3, _n_light: &Vector3, p_surface: &Vector3) -> Color {
        let dir = *p_surface - self.position;
        self.falloff(&dir.normalize()) * self.intensity / dir.squared_length()
    }

    /// The solid angle integral of the falloff approximated between the two
    /// cones: 2π·(1 − ½(cosθmax + cosFalloffStart)).
    fn power(&self, _scene: &Scene) -> Color {
        self.intensity * TWO_PI * (1.0 - 0.5 * (self.cos_theta_max + self.cos_falloff_start))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn down_spot() -> SpotLight {
        // Pointing -y, cutoff 45°, hot cone 30°.
        SpotLight::new(
            0,
            Color::grey(100.0),
            Vector3::new(0.0, 5.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            radians(45.0).cos(),
            radians(30.0).cos(),
        )
    }

    #[test]
    fn inside_hot_cone_is_unattenuated() {
        let light = down_spot();
        let (l, _, _, _) = light.sample_l(&Vector3::ZERO, 1e-3, &LightSample::default());
        // Directly below: cosθ = 1, full intensity over d² = 25.
        assert!((l.r - 4.0).abs() < 1e-4);
    }

    #[test]
    fn outside_cutoff_is_black() {
        let light = down_spot();
        // A point far to the side, outside the 45° cone.
        let p = Vector3::new(20.0, 5.0, 0.0);
        let (l, _, _, _) = light.sample_l(&p, 1e-3, &LightSample::default());
        assert!(l.is_black());
    }

    #[test]
    fn falloff_is_monotone_between_the_cones() {
        let light = down_spot();
        let f_hot = light.falloff(&Vector3::new(0.0, -1.0, 0.0));
        let mid = radians(37.0);
        let f_mid = light.falloff(&Vector3::new(mid.sin(), -mid.cos(), 0.0));
        let edge = radians(44.0);
        let f_edge = light.falloff(&Vector3::new(edge.sin(), -edge.cos(), 0.0));
        assert_eq!(f_hot, 1.0);
        assert!(f_mid > 0.0 && f_mid < 1.0);
        assert!(f_edge < f_mid);
    }

    #[test]
    fn sampled_directions_stay_inside_the_cone() {
        let light = down_spot();
        let axis = Vector3::new(0.0, -1.0, 0.0);
        let mut rng = crate::core::rng::Rng::new(7);
        for _ in 0..200 {
            let (dir, pdf) = light.sample_direction(
                &Vector3::ZERO,
                rng.uniform_float(),
                rng.uniform_float(),
            );
            assert!(dir.dot(&axis) >= radians(45.0).cos() - 1e-4);
            assert!((pdf - uniform_cone_pdf(radians(45.0).cos())).abs() < 1e-5);
        }
    }

    #[test]
    fn power_interpolates_the_two_cones() {
        let scene = crate::core::test_utils::empty_scene(vec![]);
        let light = down_spot();
        let expected =
            100.0 * TWO_PI * (1.0 - 0.5 * (radians(45.0).cos() + radians(30.0).cos()));
        assert!((light.power(&scene).r - expected).abs() < 1e-3);
    }
}
