//! Shared scene fixtures for unit tests.

use crate::accelerators::{Bvh, SplitMethod};
use crate::cameras::PerspectiveCamera;
use crate::core::camera::*;
use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::light::ArcLight;
use crate::core::material::ArcMaterial;
use crate::core::primitive::*;
use crate::core::scene::Scene;
use crate::core::shape::ArcShape;
use crate::materials::Lambert;
use crate::shapes::Sphere;
use crate::textures::ConstantTexture;
use std::sync::Arc;

/// A camera placed at -5z looking at the origin.
pub fn fixture_camera() -> ArcCamera {
    Arc::new(PerspectiveCamera::new(
        Transform::translate(Vector3::new(0.0, 0.0, -5.0)),
        radians(60.0),
        0.0,
        1.0,
        32,
        32,
    ))
}

/// A grey Lambert material.
pub fn grey_lambert(albedo: Float) -> ArcMaterial {
    Arc::new(Lambert::new(Arc::new(ConstantTexture::new(Color::grey(albedo)))))
}

/// A scene with no geometry and the given lights.
pub fn empty_scene(lights: Vec<ArcLight>) -> Scene {
    let aggregate: ArcPrimitive = Arc::new(Bvh::new(&[], 1, SplitMethod::EqualCount));
    Scene::new(aggregate, fixture_camera(), lights, None)
}

/// A scene containing a unit sphere at the origin and the given lights.
pub fn unit_sphere_scene(lights: Vec<ArcLight>) -> Scene {
    let shape: ArcShape = Arc::new(Sphere::new(1.0));
    let model: ArcPrimitive = Arc::new(Model::new(shape, grey_lambert(0.5), None));
    let aggregate: ArcPrimitive = Arc::new(Bvh::new(&[model], 1, SplitMethod::EqualCount));
    Scene::new(aggregate, fixture_camera(), lights, None)
}
