//! Perspective Camera

use crate::core::camera::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::sampler::*;
use crate::core::sampling::*;

/// A pinhole perspective camera with an optional thin lens for depth of
/// field. The camera looks down its local +z axis with +y up.
pub struct PerspectiveCamera {
    /// Camera-to-world transform.
    to_world: Transform,

    /// Lens radius; 0 disables depth of field.
    lens_radius: Float,

    /// Distance from the lens to the plane of focus.
    focal_distance: Float,

    /// Image resolution in x.
    x_res: usize,

    /// Image resolution in y.
    y_res: usize,

    /// Tangent of half the vertical field of view.
    tan_half_fov: Float,

    /// Image aspect ratio (width / height).
    aspect: Float,
}

impl PerspectiveCamera {
    /// Create a new `PerspectiveCamera`.
    ///
    /// * `to_world`       - Camera-to-world transform.
    /// * `fov`            - Vertical field of view in radians.
    /// * `lens_radius`    - Lens radius; 0 disables depth of field.
    /// * `focal_distance` - Distance from the lens to the plane of focus.
    /// * `x_res`          - Image resolution in x.
    /// * `y_res`          - Image resolution in y.
    pub fn new(
        to_world: Transform,
        fov: Float,
        lens_radius: Float,
        focal_distance: Float,
        x_res: usize,
        y_res: usize,
    ) -> Self {
        Self {
            to_world,
            lens_radius,
            focal_distance,
            x_res,
            y_res,
            tan_half_fov: (0.5 * fov).tan(),
            aspect: x_res as Float / y_res as Float,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn generate_ray(&self, sample: &Sample) -> (Ray, Float) {
        // Map the continuous film position to NDC and then onto the view
        // plane at z = 1.
        let ndc_x = sample.img_x / self.x_res as Float;
        let ndc_y = sample.img_y / self.y_res as Float;
        let view_x = (2.0 * ndc_x - 1.0) * self.tan_half_fov * self.aspect;
        let view_y = (1.0 - 2.0 * ndc_y) * self.tan_half_fov;

        let mut origin = Vector3::ZERO;
        let mut dir = Vector3::new(view_x, view_y, 1.0).normalize();

        if self.lens_radius > 0.0 {
            // Defocus: pick a point on the lens and redirect the ray through
            // the matching point on the plane of focus.
            let lens = self.lens_radius * concentric_sample_disk(sample.lens_u, sample.lens_v);
            let ft = self.focal_distance / dir.z;
            let p_focus = dir * ft;
            origin = Vector3::new(lens.x, lens.y, 0.0);
            dir = (p_focus - origin).normalize();
        }

        let ray = Ray::new(self.to_world.on_point(&origin), self.to_world.on_vector(&dir), 0.0);
        (ray, 1.0)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn center_sample(x_res: usize, y_res: usize) -> Sample {
        Sample {
            img_x: x_res as Float * 0.5,
            img_y: y_res as Float * 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn center_pixel_looks_down_the_axis() {
        let cam = PerspectiveCamera::new(Transform::default(), radians(60.0), 0.0, 1.0, 64, 64);
        let (ray, weight) = cam.generate_ray(&center_sample(64, 64));
        assert_eq!(weight, 1.0);
        assert!((ray.d - Vector3::UNIT_Z).length() < 1e-5);
        assert!((ray.o - Vector3::ZERO).length() < 1e-6);
    }

    #[test]
    fn corner_pixels_span_the_field_of_view() {
        let fov = radians(90.0);
        let cam = PerspectiveCamera::new(Transform::default(), fov, 0.0, 1.0, 64, 64);
        let (ray, _) = cam.generate_ray(&Sample {
            img_x: 0.0,
            img_y: 32.0,
            ..Default::default()
        });
        // At the left edge of a square 90° frustum the direction makes 45°
        // with the axis.
        let cos = ray.d.normalize().dot(&Vector3::UNIT_Z);
        assert!((cos - (0.5 as Float).sqrt()).abs() < 1e-3);
    }

    #[test]
    fn transform_moves_ray_origin() {
        let t = Transform::translate(Vector3::new(0.0, 0.0, -5.0));
        let cam = PerspectiveCamera::new(t, radians(45.0), 0.0, 1.0, 32, 32);
        let (ray, _) = cam.generate_ray(&center_sample(32, 32));
        assert!((ray.o - Vector3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn lens_rays_converge_at_the_focal_plane() {
        let cam = PerspectiveCamera::new(Transform::default(), radians(60.0), 0.5, 3.0, 64, 64);
        let mut s = center_sample(64, 64);
        s.lens_u = 0.9;
        s.lens_v = 0.1;
        let (ray, _) = cam.generate_ray(&s);
        // The defocused center ray still passes through the focal point on
        // the axis.
        let t = 3.0 / ray.d.z;
        let p = ray.at(t);
        assert!((p - Vector3::new(0.0, 0.0, 3.0)).length() < 1e-4);
    }
}
