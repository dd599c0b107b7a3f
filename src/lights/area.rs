//! Area Light

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::sampling::*;
use crate::core::scene::Scene;
use crate::core::shape::*;

/// The intersectable pieces of an area light's shape, with an area-weighted
/// distribution for picking which piece to sample.
pub struct GeometrySet {
    shapes: Vec<ArcShape>,
    areas: Vec<Float>,
    sum_area: Float,
    area_distribution: Cdf1D,
}

impl GeometrySet {
    /// Build a new `GeometrySet`, refining the shape if it is not directly
    /// intersectable.
    ///
    /// * `shape` - The light's shape.
    pub fn new(shape: ArcShape) -> Self {
        let shapes = if shape.intersectable() {
            vec![shape]
        } else {
            shape.refine()
        };

        let areas: Vec<Float> = shapes.iter().map(|s| s.area()).collect();
        let sum_area = areas.iter().sum();
        let area_distribution = Cdf1D::new(areas.clone());

        Self {
            shapes,
            areas,
            sum_area,
            area_distribution,
        }
    }

    /// Returns the summed surface area.
    pub fn area(&self) -> Float {
        self.sum_area
    }

    /// Sample a surface point as seen from a reference point. A piece is
    /// picked proportionally to area, then sampled with respect to `p`.
    ///
    /// * `p`      - The reference point, in the set's local space.
    /// * `sample` - The random variates to use.
    pub fn sample_wrt(&self, p: &Vector3, sample: &LightSample) -> (Vector3, Vector3) {
        let (index, _) = self.area_distribution.sample_discrete(sample.u_component);
        self.shapes[index].sample_wrt(p, sample.u_geometry[0], sample.u_geometry[1])
    }

    /// Sample a surface point uniformly by area.
    ///
    /// * `sample` - The random variates to use.
    pub fn sample(&self, sample: &LightSample) -> (Vector3, Vector3) {
        let (index, _) = self.area_distribution.sample_discrete(sample.u_component);
        self.shapes[index].sample(sample.u_geometry[0], sample.u_geometry[1])
    }

    /// Returns the solid-angle pdf at `p` for the direction `wi`, averaged
    /// over the pieces by area.
    ///
    /// * `p`  - The reference point, in the set's local space.
    /// * `wi` - The direction. Assumed normalized.
    pub fn pdf(&self, p: &Vector3, wi: &Vector3) -> Float {
        if self.sum_area == 0.0 {
            return 0.0;
        }
        let mut pdf = 0.0;
        for (shape, area) in self.shapes.iter().zip(self.areas.iter()) {
            pdf += area * shape.pdf(p, wi);
        }
        pdf / self.sum_area
    }
}

/// A diffuse area light attached to a shape: every point of the front face
/// emits `le` uniformly over the hemisphere.
pub struct DiffuseAreaLight {
    /// Light id.
    id: usize,

    /// Emitted radiance.
    le: Color,

    /// Number of samples the direct lighting estimator takes.
    samples_num: usize,

    /// Local-to-world transform of the light's shape.
    to_world: Transform,

    /// The light's intersectable pieces.
    geometry_set: GeometrySet,
}

impl DiffuseAreaLight {
    /// Return a new `DiffuseAreaLight`. The position sampling pdfs assume an
    /// approximately uniform world scale; a warning is emitted otherwise and
    /// rendering proceeds with the approximate area.
    ///
    /// * `id`          - Light id.
    /// * `le`          - Emitted radiance.
    /// * `shape`       - The light's shape.
    /// * `to_world`    - Local-to-world transform of the light's shape.
    /// * `samples_num` - Number of samples for the direct lighting estimator.
    pub fn new(
        id: usize,
        le: Color,
        shape: ArcShape,
        to_world: Transform,
        samples_num: usize,
    ) -> Self {
        if !to_world.is_uniform_scale(1e-3) {
            warn!(
                "Area light {id} has non-uniform scale {:?}; its area pdfs are approximate",
                to_world.scale()
            );
        }
        Self {
            id,
            le,
            samples_num,
            to_world,
            geometry_set: GeometrySet::new(shape),
        }
    }

    fn world_area(&self) -> Float {
        // Valid under (approximately) uniform scaling only; see `new`.
        let scale = self.to_world.scale();
        self.geometry_set.area() * (scale.squared_length() / 3.0).sqrt()
    }
}

impl Light for DiffuseAreaLight {
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
        // The geometry set lives in the light's local space.
        let p_local = self.to_world.invert_point(p);
        let (ps_local, ns_local) = self.geometry_set.sample_wrt(&p_local, sample);
        let wi_local = (ps_local - p_local).normalize();
        let pdf = self.geometry_set.pdf(&p_local, &wi_local);

        let ps = self.to_world.on_point(&ps_local);
        let ns = self.to_world.on_normal(&ns_local).normalize();
        let dir = ps - *p;
        let distance = dir.length();
        let wi = dir / distance;

        let shadow_ray = Ray::segment(*p, wi, epsilon, max(distance - epsilon, epsilon));
        (self.l(&ps, &ns, &-wi), wi, pdf, shadow_ray)
    }

    fn sample_position(&self, _scene: &Scene, sample: &LightSample) -> (Vector3, Vector3, Float) {
        let pdf_area = 1.0 / self.world_area();
        let (p_local, n_local) = self.geometry_set.sample(sample);
        (
            self.to_world.on_point(&p_local),
            self.to_world.on_normal(&n_local).normalize(),
            pdf_area,
        )
    }

    fn sample_direction(&self, surface_normal: &Vector3, u1: Float, u2: Float) -> (Vector3, Float) {
        let local = cosine_sample_hemisphere(u1, u2);
        let (right, up) = coordinate_system(surface_normal);
        let dir = local.x * right + local.y * up + local.z * *surface_normal;
        (dir, cosine_hemisphere_pdf(local.z))
    }

    fn pdf_position(&self, _scene: &Scene) -> Float {
        1.0 / self.world_area()
    }

    fn pdf_direction(&self, _p: &Vector3, n: &Vector3, wo: &Vector3) -> Float {
        let cos_theta = wo.dot(n);
        if cos_theta > 0.0 {
            cos_theta * INV_PI
        } else {
            0.0
        }
    }

    fn pdf(&self, p: &Vector3, wi: &Vector3) -> Float {
        let p_local = self.to_world.invert_point(p);
        let wi_local = self.to_world.invert_vector(wi).normalize();
        self.geometry_set.pdf(&p_local, &wi_local)
    }

    fn eval_l(&self, p_light: &Vector3, n_light: &Vector3, p_surface: &Vector3) -> Color {
        // Only the front face emits.
        if n_light.dot(&(*p_surface - *p_light)) > 0.0 {
            self.le
        } else {
            Color::BLACK
        }
    }

    /// Radiance `le` leaving every front-face point over the hemisphere
    /// integrates to π·le per unit area.
    fn power(&self, _scene: &Scene) -> Color {
        let scale = self.to_world.scale();
        let world_area = self.geometry_set.area() * scale.x * scale.y * scale.z;
        self.le * PI * world_area
    }

    fn samples_num(&self) -> usize {
        self.samples_num
    }
}

impl AreaLight for DiffuseAreaLight {
    fn l(&self, _p: &Vector3, n: &Vector3, w: &Vector3) -> Color {
        if n.dot(w) > 0.0 {
            self.le
        } else {
            Color::BLACK
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
