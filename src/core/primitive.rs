//! Primitives

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::geometry::*;
use crate::core::light::*;
use crate::core::material::*;
use crate::core::shape::*;
use std::sync::Arc;

/// Factor applied to the hit distance to derive the surface offset for
/// spawned rays.
pub const HIT_EPSILON_SCALE: Float = 1e-3;

/// The record for a ray-primitive hit: the surface fragment, the spawn
/// epsilon, and the hit primitive's material and optional area light.
#[derive(Clone)]
pub struct Intersection {
    /// The surface fragment.
    pub fragment: Fragment,

    /// Offset for rays spawned from the hit point.
    pub epsilon: Float,

    /// Material of the hit primitive.
    pub material: ArcMaterial,

    /// Area light attached to the hit primitive, if any.
    pub area_light: Option<ArcAreaLight>,
}

impl Intersection {
    /// Returns the area-light emission at the fragment in direction `w`, or
    /// black when the hit primitive is not emissive.
    ///
    /// * `w` - Outgoing direction.
    pub fn le(&self, w: &Vector3) -> Color {
        match &self.area_light {
            Some(light) => light.l(&self.fragment.position(), &self.fragment.normal(), w),
            None => Color::BLACK,
        }
    }
}

/// Primitive interface: the scene-level unit of geometry the aggregate
/// traverses. A successful `intersect` tightens `ray.maxt` to the hit so
/// callers and enclosing traversals prune farther work.
pub trait Primitive: Send + Sync {
    /// Returns whether the primitive can be intersected directly.
    fn intersectable(&self) -> bool {
        true
    }

    /// Split a non-intersectable primitive into intersectable children.
    fn refine(&self) -> Vec<ArcPrimitive> {
        vec![]
    }

    /// Intersect a ray with the primitive. On a hit, `ray.maxt` is reduced
    /// to the hit parameter.
    ///
    /// * `ray` - The ray in world space.
    fn intersect(&self, ray: &mut Ray) -> Option<Intersection>;

    /// Returns `true` if the ray hits the primitive.
    ///
    /// * `ray` - The ray in world space.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// Returns the world-space bounding box.
    fn bbox(&self) -> BBox;

    /// Returns the material bound to the primitive, if it has one.
    fn material(&self) -> Option<ArcMaterial> {
        None
    }

    /// Returns the area light bound to the primitive, if it is emissive.
    fn area_light(&self) -> Option<ArcAreaLight> {
        None
    }
}

/// Atomic reference counted `Primitive`.
pub type ArcPrimitive = Arc<dyn Primitive + Send + Sync>;

/// Binds a shape to a material and an optional area light. Models live in
/// the shape's object space; wrap them in an `Instance` to place them.
pub struct Model {
    /// The shape.
    shape: ArcShape,

    /// The material.
    material: ArcMaterial,

    /// The attached area light, if the model is emissive.
    area_light: Option<ArcAreaLight>,
}

impl Model {
    /// Return a new `Model`.
    ///
    /// * `shape`      - The shape.
    /// * `material`   - The material.
    /// * `area_light` - The attached area light, if the model is emissive.
    pub fn new(shape: ArcShape, material: ArcMaterial, area_light: Option<ArcAreaLight>) -> Self {
        Self {
            shape,
            material,
            area_light,
        }
    }
}

impl Primitive for Model {
    fn intersectable(&self) -> bool {
        self.shape.intersectable()
    }

    fn refine(&self) -> Vec<ArcPrimitive> {
        self.shape
            .refine()
            .into_iter()
            .map(|shape| {
                Arc::new(Model::new(
                    shape,
                    Arc::clone(&self.material),
                    self.area_light.clone(),
                )) as ArcPrimitive
            })
            .collect()
    }

    fn intersect(&self, ray: &mut Ray) -> Option<Intersection> {
        let (t, fragment) = self.shape.intersect(ray)?;
        ray.maxt = t;
        Some(Intersection {
            fragment,
            epsilon: HIT_EPSILON_SCALE * t,
            material: Arc::clone(&self.material),
            area_light: self.area_light.clone(),
        })
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.shape.intersect_p(ray)
    }

    fn bbox(&self) -> BBox {
        self.shape.bbox()
    }

    fn material(&self) -> Option<ArcMaterial> {
        Some(Arc::clone(&self.material))
    }

    fn area_light(&self) -> Option<ArcAreaLight> {
        self.area_light.clone()
    }
}

/// Places a primitive in the world under a transform. Rays are moved into
/// object space for the query and hits are mapped back out.
pub struct Instance {
    /// The wrapped primitive.
    primitive: ArcPrimitive,

    /// Object-to-world transform.
    to_world: Transform,
}

impl Instance {
    /// Return a new `Instance`.
    ///
    /// * `primitive` - The wrapped primitive.
    /// * `to_world`  - Object-to-world transform.
    pub fn new(primitive: ArcPrimitive, to_world: Transform) -> Self {
        Self {
            primitive,
            to_world,
        }
    }

    fn object_ray(&self, ray: &Ray) -> Ray {
        let mut r = *ray;
        r.o = self.to_world.invert_point(&ray.o);
        r.d = self.to_world.invert_vector(&ray.d);
        r
    }
}

impl Primitive for Instance {
    fn intersect(&self, ray: &mut Ray) -> Option<Intersection> {
        let mut object_ray = self.object_ray(ray);
        let mut hit = self.primitive.intersect(&mut object_ray)?;
        // The parametric hit distance is shared between the two spaces.
        ray.maxt = object_ray.maxt;
        hit.fragment = hit.fragment.transformed_by(&self.to_world);
        Some(hit)
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.primitive.intersect_p(&self.object_ray(ray))
    }

    fn bbox(&self) -> BBox {
        // Transform the eight object-space corners and rebound.
        let b = self.primitive.bbox();
        let corners = [
            Vector3::new(b.p_min.x, b.p_min.y, b.p_min.z),
            Vector3::new(b.p_max.x, b.p_min.y, b.p_min.z),
            Vector3::new(b.p_min.x, b.p_max.y, b.p_min.z),
            Vector3::new(b.p_max.x, b.p_max.y, b.p_min.z),
            Vector3::new(b.p_min.x, b.p_min.y, b.p_max.z),
            Vector3::new(b.p_max.x, b.p_min.y, b.p_max.z),
            Vector3::new(b.p_min.x, b.p_max.y, b.p_max.z),
            Vector3::new(b.p_max.x, b.p_max.y, b.p_max.z),
        ];
        corners
            .iter()
            .fold(BBox::default(), |acc, c| acc.union_point(&self.to_world.on_point(c)))
    }

    fn material(&self) -> Option<ArcMaterial> {
        self.primitive.material()
    }

    fn area_light(&self) -> Option<ArcAreaLight> {
        self.primitive.area_light()
    }
}
