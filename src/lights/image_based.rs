//! Image Based Light

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::material::BsdfType;
use crate::core::mipmap::*;
use crate::core::sampling::*;
use crate::core::scene::Scene;

/// An environment light backed by a lat-long radiance map, importance
/// sampled through a 2D distribution over the map's luminance.
pub struct ImageBasedLight {
    /// Light id.
    id: usize,

    /// Radiance map pyramid.
    radiance: MipMap,

    /// Top-level average radiance, for the power estimate.
    average_radiance: Color,

    /// Importance distribution over `(s, t)`.
    distribution: Cdf2D,

    /// Orientation of the map in the world.
    orientation: Quaternion,

    /// Number of samples the direct lighting estimator takes.
    samples_num: usize,

    /// Render samples per pixel, used by the filtered lookup level
    /// selection.
    sample_per_pixel: usize,
}

impl ImageBasedLight {
    /// Return a new `ImageBasedLight`.
    ///
    /// * `id`               - Light id.
    /// * `pixels`           - Row-major radiance map pixels.
    /// * `width`            - Radiance map width.
    /// * `height`           - Radiance map height.
    /// * `filter`           - Color filter multiplied into the map.
    /// * `orientation`      - Extra orientation applied to the map.
    /// * `samples_num`      - Number of samples for the direct lighting
    ///   estimator.
    /// * `sample_per_pixel` - Render samples per pixel.
    pub fn new(
        id: usize,
        pixels: Vec<Color>,
        width: usize,
        height: usize,
        filter: Color,
        orientation: Quaternion,
        samples_num: usize,
        sample_per_pixel: usize,
    ) -> Self {
        let pixels: Vec<Color> = pixels.into_iter().map(|p| p * filter).collect();
        let radiance = MipMap::new(pixels, width, height);

        let max_level = radiance.levels_num() - 1;
        let average_radiance = radiance.lookup(max_level, 0.0, 0.0);

        // Build the importance map a few levels up the pyramid so the CDF
        // stays compact for large maps. Weighting each row by sin θ accounts
        // for the shrinking solid angle of texels near the poles.
        let dist_level = max_level.saturating_sub(8);
        let buffer = radiance.image_buffer(dist_level);
        let mut dist = Vec::with_capacity(buffer.width * buffer.height);
        for i in 0..buffer.height {
            let sin_theta = ((i as Float + 0.5) / buffer.height as Float * PI).sin();
            for j in 0..buffer.width {
                dist.push(buffer.pixels[i * buffer.width + j].luminance() * sin_theta);
            }
        }
        let distribution = Cdf2D::new(&dist, buffer.width, buffer.height);

        // Spherical coordinates are z-up; re-seat the map so its equator
        // faces the default y-up camera, then apply the user orientation.
        let base = Quaternion::from_axis_angle(&Vector3::UNIT_Y, -PI_OVER_TWO)
            * Quaternion::from_axis_angle(&Vector3::UNIT_X, -PI_OVER_TWO);
        let orientation = orientation * base;

        Self {
            id,
            radiance,
            average_radiance,
            distribution,
            orientation,
            samples_num,
            sample_per_pixel,
        }
    }

    /// Pdf-aware lookup level: noisier estimates (low pdf · spp) read
    /// coarser levels so the texture filtering matches the Monte Carlo
    /// noise floor.
    fn filtered_level(&self, pdf_st: Float) -> usize {
        let wh = (self.radiance.width() * self.radiance.height()) as Float;
        let max_level = self.radiance.levels_num() - 1;
        let level = 0.5 * (wh / (pdf_st * self.sample_per_pixel as Float)).log2();
        clamp(floor_int(level), 0, max_level as i32) as usize
    }

    fn direction_to_st(&self, w: &Vector3) -> (Float, Float, Float) {
        let local = self.orientation.conjugate().rotate(&w.normalize());
        let theta = spherical_theta(&local);
        let phi = spherical_phi(&local);
        (phi * INV_TWO_PI, theta * INV_PI, theta)
    }
}

impl Light for ImageBasedLight {
    fn id(&self) -> usize {
        self.id
    }

    fn is_delta(&self) -> bool {
        false
    }

    fn sample_l(
        &self,
        p: &Vector3,
        epsilon: Float,
        sample: &LightSample,
    ) -> (Color, Vector3, Float, Ray) {
        let (s, t, pdf_st) =
            self.distribution
                .sample_continuous(sample.u_geometry[0], sample.u_geometry[1]);
        let theta = t * PI;
        let phi = s * TWO_PI;
        let sin_theta = theta.sin();

        let local = spherical_direction(sin_theta, theta.cos(), phi);
        let wi = self.orientation.rotate(&local);

        let pdf = if sin_theta == 0.0 {
            0.0
        } else {
            pdf_st / (TWO_PI * PI * sin_theta)
        };

        let shadow_ray = Ray::new(*p, wi, epsilon);
        let l = if pdf_st > 0.0 {
            self.radiance.lookup(self.filtered_level(pdf_st), s, t)
        } else {
            Color::BLACK
        };
        (l, wi, pdf, shadow_ray)
    }

    fn sample_position(&self, scene: &Scene, sample: &LightSample) -> (Vector3, Vector3, Float) {
        let (world_center, world_radius) = scene.bounding_sphere();
        let dir = uniform_sample_sphere(sample.u_geometry[0], sample.u_geometry[1]);
        let pdf_area = 1.0 / (FOUR_PI * world_radius * world_radius);
        (world_center + world_radius * dir, Vector3::ZERO, pdf_area)
    }

    fn sample_direction(&self, surface_normal: &Vector3, u1: Float, u2: Float) -> (Vector3, Float) {
        let local = cosine_sample_hemisphere(u1, u2);
        let (right, up) = coordinate_system(surface_normal);
        let dir = local.x * right + local.y * up + local.z * *surface_normal;
        (dir, cosine_hemisphere_pdf(local.z))
    }

    fn pdf_position(&self, scene: &Scene) -> Float {
        let (_, world_radius) = scene.bounding_sphere();
        1.0 / (FOUR_PI * world_radius * world_radius)
    }

    fn pdf_direction(&self, _p: &Vector3, n: &Vector3, wo: &Vector3) -> Float {
        let cos_theta = n.dot(wo);
        if cos_theta > 0.0 {
            cos_theta * INV_PI
        } else {
            0.0
        }
    }

    fn pdf(&self, _p: &Vector3, wi: &Vector3) -> Float {
        let (s, t, theta) = self.direction_to_st(wi);
        let sin_theta = theta.sin();
        if sin_theta == 0.0 {
            return 0.0;
        }
        self.distribution.pdf(s, t) / (TWO_PI * PI * sin_theta)
    }

    fn eval_l(&self, p_light: &Vector3, _n_light: &Vector3, p_surface: &Vector3) -> Color {
        let (s, t, _) = self.direction_to_st(&(*p_light - *p_surface));
        self.radiance.lookup(0, s, t)
    }

    fn le(&self, ray: &Ray, pdf: Float, mask: BsdfType) -> Color {
        let (s, t, theta) = self.direction_to_st(&ray.d);
        let level = if mask.is_specular() {
            0
        } else {
            let sin_theta = theta.sin();
            if sin_theta == 0.0 || pdf == 0.0 {
                0
            } else {
                let wh = (self.radiance.width() * self.radiance.height()) as Float;
                let inv_wp = wh / (TWO_PI * PI * sin_theta);
                let level =
                    0.5 * (inv_wp / (pdf * self.sample_per_pixel as Float)).log2();
                clamp(floor_int(level), 0, (self.radiance.levels_num() - 1) as i32) as usize
            }
        };
        self.radiance.lookup(level, s, t)
    }

    /// Rough estimate assuming the average radiance arrives diffusely over
    /// the world sphere.
    fn power(&self, scene: &Scene) -> Color {
        let (_, radius) = scene.bounding_sphere();
        self.average_radiance * PI * (FOUR_PI * radius * radius)
    }

    fn samples_num(&self) -> usize {
        self.samples_num
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
