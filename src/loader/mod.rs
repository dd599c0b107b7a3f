//! Scene loading: a JSON scene description is walked into parameter sets,
//! entities are built through the scene cache, and the result is a ready
//! render context.

use crate::accelerators::{Bvh, SplitMethod};
use crate::cameras::PerspectiveCamera;
use crate::core::camera::*;
use crate::core::color::*;
use crate::core::common::*;
use crate::core::film::*;
use crate::core::filter::*;
use crate::core::geometry::*;
use crate::core::image_io;
use crate::core::integrator::Integrator;
use crate::core::light::*;
use crate::core::material::*;
use crate::core::paramset::*;
use crate::core::primitive::*;
use crate::core::renderer::*;
use crate::core::scene::Scene;
use crate::core::shape::*;
use crate::core::texture::*;
use crate::core::volume::*;
use crate::filters::*;
use crate::integrators::{AoIntegrator, PathIntegrator, WhittedIntegrator};
use crate::lights::*;
use crate::materials::{Lambert, Mirror, Transparent};
use crate::shapes::{Disk, Sphere};
use crate::textures::*;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a render run needs: the scene, the film, and the driver.
pub struct RenderContext {
    /// The render driver.
    pub renderer: Renderer,

    /// The scene.
    pub scene: Scene,

    /// The film.
    pub film: Film,
}

impl RenderContext {
    /// Render the scene and write the image.
    pub fn render(&mut self) -> Result<(), String> {
        self.renderer.render(&self.scene, &self.film)
    }
}

/// Name under which every lookup table holds its fallback entry.
const ERROR_NAME: &str = "error";

/// Holds every named entity built so far, so later entities can
/// cross-reference earlier ones. Failed lookups resolve to an `"error"`
/// sentinel entry (magenta texture, error material, unit sphere) so the
/// scene still builds.
pub struct SceneCache {
    scene_root: PathBuf,
    shapes: HashMap<String, ArcShape>,
    materials: HashMap<String, ArcMaterial>,
    color_textures: HashMap<String, ArcColorTexture>,
    float_textures: HashMap<String, ArcFloatTexture>,
    primitives: HashMap<String, ArcPrimitive>,
    area_lights: HashMap<String, ArcAreaLight>,
    instances: Vec<ArcPrimitive>,
    lights: Vec<ArcLight>,
    images: ImageCache,
}

impl SceneCache {
    /// Return a new `SceneCache` seeded with the error sentinel entries.
    ///
    /// * `scene_root` - Directory relative file references resolve against.
    pub fn new(scene_root: PathBuf) -> Self {
        let mut cache = Self {
            scene_root,
            shapes: HashMap::new(),
            materials: HashMap::new(),
            color_textures: HashMap::new(),
            float_textures: HashMap::new(),
            primitives: HashMap::new(),
            area_lights: HashMap::new(),
            instances: vec![],
            lights: vec![],
            images: ImageCache::new(),
        };

        let error_color: ArcColorTexture = Arc::new(ConstantTexture::new(Color::MAGENTA));
        let error_float: ArcFloatTexture = Arc::new(ConstantTexture::new(0.5));
        let error_material: ArcMaterial = Arc::new(Lambert::new(Arc::clone(&error_color)));
        let error_shape: ArcShape = Arc::new(Sphere::new(1.0));
        let error_primitive: ArcPrimitive = Arc::new(Model::new(
            Arc::clone(&error_shape),
            Arc::clone(&error_material),
            None,
        ));

        cache.color_textures.insert(String::from(ERROR_NAME), error_color);
        cache.float_textures.insert(String::from(ERROR_NAME), error_float);
        cache.materials.insert(String::from(ERROR_NAME), error_material);
        cache.shapes.insert(String::from(ERROR_NAME), error_shape);
        cache.primitives.insert(String::from(ERROR_NAME), error_primitive);
        cache
    }

    /// Resolve a possibly-relative file reference against the scene root.
    ///
    /// * `filename` - The file reference.
    pub fn resolve_path(&self, filename: &str) -> String {
        let path = Path::new(filename);
        if path.is_absolute() {
            String::from(filename)
        } else {
            self.scene_root.join(path).to_string_lossy().into_owned()
        }
    }

    fn get_shape(&self, name: &str) -> ArcShape {
        match self.shapes.get(name) {
            Some(shape) => Arc::clone(shape),
            None => {
                error!("Geometry '{name}' not defined, using '{ERROR_NAME}'");
                Arc::clone(&self.shapes[ERROR_NAME])
            }
        }
    }

    fn get_material(&self, name: &str) -> ArcMaterial {
        match self.materials.get(name) {
            Some(material) => Arc::clone(material),
            None => {
                error!("Material '{name}' not defined, using '{ERROR_NAME}'");
                Arc::clone(&self.materials[ERROR_NAME])
            }
        }
    }

    fn get_color_texture(&self, name: &str) -> ArcColorTexture {
        match self.color_textures.get(name) {
            Some(texture) => Arc::clone(texture),
            None => {
                error!("Texture '{name}' not defined, using '{ERROR_NAME}'");
                Arc::clone(&self.color_textures[ERROR_NAME])
            }
        }
    }

    fn get_float_texture(&self, name: &str) -> ArcFloatTexture {
        match self.float_textures.get(name) {
            Some(texture) => Arc::clone(texture),
            None => {
                error!("Texture '{name}' not defined, using '{ERROR_NAME}'");
                Arc::clone(&self.float_textures[ERROR_NAME])
            }
        }
    }

    fn get_primitive(&self, name: &str) -> ArcPrimitive {
        match self.primitives.get(name) {
            Some(primitive) => Arc::clone(primitive),
            None => {
                error!("Primitive '{name}' not defined, using '{ERROR_NAME}'");
                Arc::clone(&self.primitives[ERROR_NAME])
            }
        }
    }

    fn get_area_light(&self, name: &str) -> Option<ArcAreaLight> {
        let light = self.area_lights.get(name).cloned();
        if light.is_none() {
            error!("Area light '{name}' not defined");
        }
        light
    }

    fn next_light_id(&self) -> usize {
        self.lights.len()
    }
}

/// Parse a JSON entity node into a typed `ParamSet`. The node groups its
/// entries by value kind: `{"float": {"radius": 1.0}, "string": ...}`.
///
/// * `node` - The entity node.
fn parse_param_set(node: &Value) -> ParamSet {
    let mut params = ParamSet::new();
    let Some(groups) = node.as_object() else {
        warn!("Expected an object for a parameter block");
        return params;
    };

    for (kind, entries) in groups {
        let Some(entries) = entries.as_object() else {
            warn!("Expected an object under parameter group '{kind}'");
            continue;
        };
        for (key, value) in entries {
            match kind.as_str() {
                "bool" => params.set_bool(key, value.as_bool().unwrap_or_default()),
                "int" => params.set_int(key, value.as_i64().unwrap_or_default() as i32),
                "float" => params.set_float(key, value.as_f64().unwrap_or_default() as Float),
                "string" => {
                    params.set_string(key, value.as_str().unwrap_or_default().to_owned())
                }
                "vec2" => match parse_float_array(value, 2) {
                    Some(v) => params.set_vector2(key, Vector2::new(v[0], v[1])),
                    None => {
                        warn!("Invalid value for vec2 '{key}'");
                        params.set_vector2(key, Vector2::ZERO);
                    }
                },
                "vec3" => match parse_float_array(value, 3) {
                    Some(v) => params.set_vector3(key, Vector3::new(v[0], v[1], v[2])),
                    None => {
                        warn!("Invalid value for vec3 '{key}'");
                        params.set_vector3(key, Vector3::ZERO);
                    }
                },
                "vec4" => match parse_float_array(value, 4) {
                    Some(v) => params.set_vector4(key, Vector4::new(v[0], v[1], v[2], v[3])),
                    None => {
                        warn!("Invalid value for vec4 '{key}'");
                        params.set_vector4(key, Vector4::ZERO);
                    }
                },
                "color" => match parse_float_array(value, 3) {
                    Some(v) => params.set_color(key, Color::new(v[0], v[1], v[2])),
                    None => {
                        warn!("Invalid value for color '{key}'");
                        params.set_color(key, Color::WHITE);
                    }
                },
                other => warn!("Unrecognized parameter kind '{other}'"),
            }
        }
    }
    params
}

fn parse_float_array(value: &Value, arity: usize) -> Option<Vec<Float>> {
    let array = value.as_array()?;
    if array.len() != arity {
        return None;
    }
    array
        .iter()
        .map(|v| v.as_f64().map(|f| f as Float))
        .collect()
}

/// Build the transform an entity's parameters describe: a `position`, an
/// axis-angle `orientation` (`[x, y, z, degrees]`) and a `scale`.
///
/// * `params` - The entity's parameters.
fn get_transform(params: &ParamSet) -> Transform {
    let position = params.find_one_vector3("position", Vector3::ZERO);
    let o = params.find_one_vector4("orientation", Vector4::new(0.0, 0.0, 1.0, 0.0));
    let axis = Vector3::new(o.x, o.y, o.z);
    let orientation = if axis.squared_length() > 0.0 {
        Quaternion::from_axis_angle(&axis.normalize(), radians(o.w))
    } else {
        Quaternion::IDENTITY
    };
    let scale = params.find_one_vector3("scale", Vector3::new(1.0, 1.0, 1.0));
    Transform::new(position, orientation, scale)
}

fn parse_filter(root: &Value) -> ArcFilter {
    let params = root
        .get("filter")
        .map(parse_param_set)
        .unwrap_or_default();
    let x_width = params.find_one_float("xwidth", 2.0);
    let y_width = params.find_one_float("ywidth", 2.0);
    match params.find_one_string("type", String::from("gaussian")).as_str() {
        "box" => Arc::new(BoxFilter::new(x_width, y_width)),
        "triangle" => Arc::new(TriangleFilter::new(x_width, y_width)),
        "mitchell" => Arc::new(MitchellFilter::new(
            x_width,
            y_width,
            params.find_one_float("b", 1.0 / 3.0),
            params.find_one_float("c", 1.0 / 3.0),
        )),
        "gaussian" => Arc::new(GaussianFilter::new(
            x_width,
            y_width,
            params.find_one_float("falloff", 2.0),
        )),
        other => {
            warn!("Filter type '{other}' unknown, using 'gaussian'");
            Arc::new(GaussianFilter::new(x_width, y_width, 2.0))
        }
    }
}

fn parse_film(root: &Value, filter: ArcFilter, outfile: Option<&str>) -> Film {
    let params = root.get("film").map(parse_param_set).unwrap_or_default();
    let resolution = params.find_one_vector2("resolution", Vector2::new(640.0, 480.0));
    let crop = params.find_one_vector4("crop", Vector4::new(0.0, 1.0, 0.0, 1.0));
    let file = params.find_one_string("file", String::from("lumen.png"));
    let file = outfile.unwrap_or(&file);
    Film::new(
        max(resolution.x as usize, 1),
        max(resolution.y as usize, 1),
        [crop.x, crop.y, crop.z, crop.w],
        filter,
        file,
    )
}

fn parse_camera(root: &Value, film: &Film) -> ArcCamera {
    let params = root.get("camera").map(parse_param_set).unwrap_or_default();
    let position = params.find_one_vector3("position", Vector3::ZERO);

    // Either an explicit look-at or the axis-angle orientation.
    let orientation = if params.has_vector3("look_at") {
        let look_at = params.find_one_vector3("look_at", Vector3::UNIT_Z);
        let up = params.find_one_vector3("up", Vector3::UNIT_Y);
        let z = (look_at - position).normalize();
        let x = up.cross(&z).normalize();
        let y = z.cross(&x);
        Quaternion::from(Matrix3::from_columns(&x, &y, &z))
    } else {
        get_transform(&params).orientation()
    };

    let to_world = Transform::new(position, orientation, Vector3::new(1.0, 1.0, 1.0));
    let fov = radians(params.find_one_float("fov", 60.0));
    let lens_radius = params.find_one_float("lens_radius", 0.0);
    let focal_distance = params.find_one_float("focal_distance", 1e4);
    Arc::new(PerspectiveCamera::new(
        to_world,
        fov,
        lens_radius,
        focal_distance,
        film.x_res,
        film.y_res,
    ))
}

fn parse_render_setting(root: &Value) -> (RenderSetting, usize) {
    let params = root
        .get("render_setting")
        .map(parse_param_set)
        .unwrap_or_default();
    let setting = RenderSetting {
        sample_per_pixel: max(params.find_one_int("sample_per_pixel", 1), 1) as usize,
        max_ray_depth: max(params.find_one_int("max_ray_depth", 5), 0) as u32,
        method: RenderMethod::from(
            params
                .find_one_string("render_method", String::from("path_tracing"))
                .as_str(),
        ),
    };
    let ao_samples = max(params.find_one_int("ao_samples", 25), 1) as usize;
    (setting, ao_samples)
}

fn parse_volume(root: &Value) -> Option<VolumeRegion> {
    let node = root.get("volume")?;
    let params = parse_param_set(node);
    let box_min = params.find_one_vector3("box_min", Vector3::new(-1.0, -1.0, -1.0));
    let box_max = params.find_one_vector3("box_max", Vector3::new(1.0, 1.0, 1.0));
    Some(VolumeRegion::new(
        params.find_one_color("absorption", Color::BLACK),
        params.find_one_color("scattering", Color::BLACK),
        params.find_one_color("emission", Color::BLACK),
        params.find_one_float("g", 0.0),
        BBox::new(box_min, box_max),
    ))
}

fn parse_geometry(node: &Value, cache: &mut SceneCache) {
    let params = parse_param_set(node);
    let name = params.find_one_string("name", String::new());
    if name.is_empty() {
        warn!("Skipping geometry without a name");
        return;
    }

    let shape: ArcShape = match params.find_one_string("type", String::from("sphere")).as_str() {
        "sphere" => Arc::new(Sphere::new(params.find_one_float("radius", 1.0))),
        "disk" => Arc::new(Disk::new(params.find_one_float("radius", 1.0))),
        other => {
            // Mesh files come through an external loader; anything we cannot
            // build gets the error geometry.
            error!("Geometry type '{other}' not supported, using '{ERROR_NAME}'");
            cache.get_shape(ERROR_NAME)
        }
    };
    cache.shapes.insert(name, shape);
}

fn parse_texture(node: &Value, cache: &mut SceneCache) {
    let params = parse_param_set(node);
    let name = params.find_one_string("name", String::new());
    if name.is_empty() {
        warn!("Skipping texture without a name");
        return;
    }

    let format = params.find_one_string("format", String::from("color"));
    let texture_type = params.find_one_string("type", String::from("constant"));
    match (format.as_str(), texture_type.as_str()) {
        ("color", "constant") => {
            let value = params.find_one_color("color", Color::WHITE);
            cache
                .color_textures
                .insert(name, Arc::new(ConstantTexture::new(value)));
        }
        ("color", "image") => {
            let file = cache.resolve_path(&params.find_one_string("file", String::new()));
            let gamma = params.find_one_float("gamma", 1.0);
            let mipmap = cache.images.load(&file, gamma);
            cache
                .color_textures
                .insert(name, Arc::new(ImageTexture::new(mipmap)));
        }
        ("color", "scale") => {
            let source = cache.get_color_texture(&params.find_one_string("source", String::new()));
            let scale = cache.get_float_texture(&params.find_one_string("scale", String::new()));
            cache
                .color_textures
                .insert(name, Arc::new(ScaleTexture::new(source, scale)));
        }
        ("float", "constant") => {
            let value = params.find_one_float("value", 1.0);
            cache
                .float_textures
                .insert(name, Arc::new(ConstantTexture::new(value)));
        }
        ("float", "image") => {
            let file = cache.resolve_path(&params.find_one_string("file", String::new()));
            let gamma = params.find_one_float("gamma", 1.0);
            let mipmap = cache.images.load(&file, gamma);
            cache
                .float_textures
                .insert(name, Arc::new(FloatImageTexture::new(mipmap)));
        }
        (format, texture_type) => {
            error!("Texture '{name}' has unsupported format/type '{format}/{texture_type}'");
        }
    }
}

fn color_texture_param(params: &ParamSet, cache: &SceneCache, key: &str, default: Color) -> ArcColorTexture {
    if params.has_string(key) {
        cache.get_color_texture(&params.find_one_string(key, String::new()))
    } else {
        Arc::new(ConstantTexture::new(params.find_one_color(key, default)))
    }
}

fn parse_material(node: &Value, cache: &mut SceneCache) {
    let params = parse_param_set(node);
    let name = params.find_one_string("name", String::new());
    if name.is_empty() {
        warn!("Skipping material without a name");
        return;
    }

    let material: ArcMaterial = match params
        .find_one_string("type", String::from("lambert"))
        .as_str()
    {
        "lambert" => Arc::new(Lambert::new(color_texture_param(
            &params,
            cache,
            "diffuse",
            Color::grey(0.5),
        ))),
        "mirror" => Arc::new(Mirror::new(color_texture_param(
            &params,
            cache,
            "reflectance",
            Color::WHITE,
        ))),
        "transparent" => Arc::new(Transparent::new(
            color_texture_param(&params, cache, "reflectance", Color::WHITE),
            color_texture_param(&params, cache, "transmittance", Color::WHITE),
            params.find_one_float("ior", 1.5),
        )),
        other => {
            error!("Material type '{other}' not supported, using '{ERROR_NAME}'");
            cache.get_material(ERROR_NAME)
        }
    };
    cache.materials.insert(name, material);
}

fn parse_primitive(node: &Value, cache: &mut SceneCache) {
    let params = parse_param_set(node);
    let name = params.find_one_string("name", String::new());
    if name.is_empty() {
        warn!("Skipping primitive without a name");
        return;
    }

    match params.find_one_string("type", String::from("model")).as_str() {
        "model" => {
            let shape = cache.get_shape(&params.find_one_string("geometry", String::new()));
            let material = cache.get_material(&params.find_one_string("material", String::new()));
            let area_light = if params.has_string("area_light") {
                cache.get_area_light(&params.find_one_string("area_light", String::new()))
            } else {
                None
            };
            cache
                .primitives
                .insert(name, Arc::new(Model::new(shape, material, area_light)));
        }
        "instance" => {
            let model = cache.get_primitive(&params.find_one_string("model", String::new()));
            let instance: ArcPrimitive = Arc::new(Instance::new(model, get_transform(&params)));
            cache.primitives.insert(name, Arc::clone(&instance));
            cache.instances.push(instance);
        }
        other => {
            error!("Primitive type '{other}' not supported, skipping '{name}'");
        }
    }
}

fn parse_light(node: &Value, cache: &mut SceneCache, sample_per_pixel: usize) {
    let params = parse_param_set(node);
    let name = params.find_one_string("name", String::new());
    let id = cache.next_light_id();

    let light_type = params.find_one_string("type", String::from("point"));
    match light_type.as_str() {
        "point" => {
            cache.lights.push(Arc::new(PointLight::new(
                id,
                params.find_one_color("intensity", Color::WHITE),
                params.find_one_vector3("position", Vector3::ZERO),
            )));
        }
        "directional" => {
            cache.lights.push(Arc::new(DirectionalLight::new(
                id,
                params.find_one_color("radiance", Color::WHITE),
                params.find_one_vector3("direction", Vector3::new(0.0, -1.0, 0.0)),
            )));
        }
        "spot" => {
            cache.lights.push(Arc::new(SpotLight::new(
                id,
                params.find_one_color("intensity", Color::WHITE),
                params.find_one_vector3("position", Vector3::ZERO),
                params.find_one_vector3("direction", Vector3::new(0.0, -1.0, 0.0)),
                radians(params.find_one_float("theta_max", 45.0)).cos(),
                radians(params.find_one_float("falloff_start", 30.0)).cos(),
            )));
        }
        "area" => {
            let geometry_name = params.find_one_string("geometry", String::new());
            let shape = cache.get_shape(&geometry_name);
            let to_world = get_transform(&params);
            let area = Arc::new(DiffuseAreaLight::new(
                id,
                params.find_one_color("radiance", Color::WHITE),
                shape,
                to_world,
                max(params.find_one_int("sample_num", 1), 1) as usize,
            ));
            cache.lights.push(area.clone());
            cache.area_lights.insert(name.clone(), area.clone());

            // The light must be hit-testable: stand up an emissive model and
            // an instance under the light's transform.
            let shape = cache.get_shape(&geometry_name);
            let emissive: ArcMaterial = Arc::new(Lambert::new(Arc::new(ConstantTexture::new(
                Color::WHITE,
            ))));
            let model: ArcPrimitive = Arc::new(Model::new(shape, emissive, Some(area)));
            let model_name = format!("area_{name}_model");
            cache.primitives.insert(model_name, Arc::clone(&model));
            let instance: ArcPrimitive = Arc::new(Instance::new(model, to_world));
            cache.instances.push(instance);
        }
        "ibl" => {
            let file = cache.resolve_path(&params.find_one_string("file", String::new()));
            let (pixels, width, height) = match image_io::read_image(&file, 1.0) {
                Ok(image) => image,
                Err(e) => {
                    error!("{e}; substituting magenta radiance map");
                    (vec![Color::MAGENTA], 1, 1)
                }
            };
            let o = params.find_one_vector4("orientation", Vector4::new(0.0, 0.0, 1.0, 0.0));
            let axis = Vector3::new(o.x, o.y, o.z);
            let orientation = if axis.squared_length() > 0.0 {
                Quaternion::from_axis_angle(&axis.normalize(), radians(o.w))
            } else {
                Quaternion::IDENTITY
            };
            cache.lights.push(Arc::new(ImageBasedLight::new(
                id,
                pixels,
                width,
                height,
                params.find_one_color("filter", Color::WHITE),
                orientation,
                max(params.find_one_int("sample_num", 1), 1) as usize,
                sample_per_pixel,
            )));
        }
        other => {
            error!("Light type '{other}' not supported, skipping '{name}'");
        }
    }
}

fn build_integrator(setting: &RenderSetting, ao_samples: usize) -> Box<dyn Integrator> {
    match setting.method {
        RenderMethod::Whitted => Box::new(WhittedIntegrator::new(setting.max_ray_depth)),
        RenderMethod::AmbientOcclusion => Box::new(AoIntegrator::new(ao_samples)),
        RenderMethod::PathTracing => Box::new(PathIntegrator::new(setting.max_ray_depth)),
    }
}

/// Load a scene file into a ready `RenderContext`.
///
/// * `path`    - The scene file path.
/// * `outfile` - Optional override for the film's output filename.
pub fn load(path: &str, outfile: Option<&str>) -> Result<RenderContext, String> {
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("Error reading scene '{path}': {e}"))?;
    let root: Value = serde_json::from_str(&text)
        .map_err(|e| format!("Error parsing scene '{path}': {e}"))?;
    load_from_value(&root, scene_root_of(path), outfile)
}

fn scene_root_of(path: &str) -> PathBuf {
    Path::new(path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Build a `RenderContext` from an already-parsed scene document.
///
/// * `root`       - The scene document.
/// * `scene_root` - Directory relative file references resolve against.
/// * `outfile`    - Optional override for the film's output filename.
pub fn load_from_value(
    root: &Value,
    scene_root: PathBuf,
    outfile: Option<&str>,
) -> Result<RenderContext, String> {
    let mut cache = SceneCache::new(scene_root);

    let filter = parse_filter(root);
    let film = parse_film(root, filter, outfile);
    let camera = parse_camera(root, &film);
    let (setting, ao_samples) = parse_render_setting(root);
    let volume = parse_volume(root);

    for key in ["geometry", "texture", "material", "primitive", "light"] {
        let Some(nodes) = root.get(key) else { continue };
        let Some(nodes) = nodes.as_array() else {
            warn!("Expected '{key}' to be a list");
            continue;
        };
        for node in nodes {
            match key {
                "geometry" => parse_geometry(node, &mut cache),
                "texture" => parse_texture(node, &mut cache),
                "material" => parse_material(node, &mut cache),
                "primitive" => parse_primitive(node, &mut cache),
                "light" => parse_light(node, &mut cache, setting.sample_per_pixel),
                _ => unreachable!(),
            }
        }
    }

    info!(
        "Scene built: {} instances, {} lights",
        cache.instances.len(),
        cache.lights.len()
    );

    let aggregate: ArcPrimitive = Arc::new(Bvh::new(
        &cache.instances,
        1,
        SplitMethod::from("equal_count"),
    ));
    let scene = Scene::new(aggregate, camera, cache.lights.clone(), volume);

    let integrator = build_integrator(&setting, ao_samples);
    let renderer = Renderer::new(integrator, setting.sample_per_pixel);

    Ok(RenderContext {
        renderer,
        scene,
        film,
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_scene_file_is_an_error() {
        assert!(load("/nonexistent/scene.json", None).is_err());
    }

    #[test]
    fn minimal_scene_builds_with_defaults() {
        let doc = json!({
            "render_setting": { "int": { "sample_per_pixel": 1 } }
        });
        let ctx = load_from_value(&doc, PathBuf::from("."), None).unwrap();
        assert_eq!(ctx.film.x_res, 640);
        assert_eq!(ctx.film.y_res, 480);
        assert!(ctx.scene.lights().is_empty());
    }

    #[test]
    fn full_scene_cross_references_resolve() {
        let doc = json!({
            "filter": { "string": { "type": "box" }, "float": { "xwidth": 0.5, "ywidth": 0.5 } },
            "film": {
                "vec2": { "resolution": [32, 32] },
                "string": { "file": "out.png" }
            },
            "camera": {
                "string": { "type": "perspective" },
                "vec3": { "position": [0, 0, -5], "look_at": [0, 0, 0] },
                "float": { "fov": 45 }
            },
            "render_setting": {
                "int": { "sample_per_pixel": 4, "max_ray_depth": 3 },
                "string": { "render_method": "whitted" }
            },
            "geometry": [
                { "string": { "type": "sphere", "name": "ball" }, "float": { "radius": 1 } },
                { "string": { "type": "disk", "name": "panel" }, "float": { "radius": 2 } }
            ],
            "texture": [
                { "string": { "type": "constant", "name": "red", "format": "color" },
                  "color": { "color": [1, 0, 0] } }
            ],
            "material": [
                { "string": { "type": "lambert", "name": "paint", "diffuse": "red" } },
                { "string": { "type": "mirror", "name": "chrome" } }
            ],
            "primitive": [
                { "string": { "type": "model", "name": "ball_model",
                              "geometry": "ball", "material": "paint" } },
                { "string": { "type": "instance", "name": "ball_instance", "model": "ball_model" },
                  "vec3": { "position": [0, 0, 0] } }
            ],
            "light": [
                { "string": { "type": "point" },
                  "color": { "intensity": [10, 10, 10] },
                  "vec3": { "position": [0, 5, 0] } },
                { "string": { "type": "area", "name": "panel_light", "geometry": "panel" },
                  "color": { "radiance": [5, 5, 5] },
                  "vec3": { "position": [0, 3, 0] },
                  "int": { "sample_num": 2 } }
            ]
        });
        let ctx = load_from_value(&doc, PathBuf::from("."), None).unwrap();
        assert_eq!(ctx.film.x_res, 32);
        assert_eq!(ctx.scene.lights().len(), 2);
        assert_eq!(ctx.scene.lights()[0].id(), 0);
        assert_eq!(ctx.scene.lights()[1].id(), 1);
        assert_eq!(ctx.scene.lights()[1].samples_num(), 2);

        // The area light instantiated hit-testable geometry: the panel disk
        // lies in the plane z=0 around its position, so probe it down -z.
        let mut ray = crate::core::geometry::Ray::new(
            Vector3::new(0.0, 3.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
            0.0,
        );
        let hit = ctx.scene.intersect(&mut ray).unwrap();
        assert!(hit.area_light.is_some());
    }

    #[test]
    fn broken_references_fall_back_to_error_entries() {
        let doc = json!({
            "primitive": [
                { "string": { "type": "model", "name": "broken",
                              "geometry": "nope", "material": "missing" } },
                { "string": { "type": "instance", "name": "broken_instance", "model": "broken" } }
            ]
        });
        let ctx = load_from_value(&doc, PathBuf::from("."), None).unwrap();
        // The error sentinel is a unit sphere at the origin.
        let mut ray = crate::core::geometry::Ray::new(
            Vector3::new(0.0, 0.0, -5.0),
            Vector3::UNIT_Z,
            0.0,
        );
        let hit = ctx.scene.intersect(&mut ray).unwrap();
        assert!((ray.maxt - 4.0).abs() < 1e-4);
        // Magenta error texture shows up in the material.
        let f = hit.material.bsdf(
            &hit.fragment,
            &-Vector3::UNIT_Z,
            &-Vector3::UNIT_Z,
            crate::core::material::BsdfType::all(),
        );
        assert!(f.r > 0.0 && f.g == 0.0 && f.b > 0.0);
    }

    #[test]
    fn cornell_like_box_renders_end_to_end() {
        let out = std::env::temp_dir().join("lumen_loader_test");
        std::fs::create_dir_all(&out).unwrap();
        let out = out.join("cornell.png");
        let out = out.to_str().unwrap();

        // A closed box of disks with a ceiling area light, path traced at a
        // thumbnail resolution.
        let wall = |name: &str, pos: [f32; 3], orient: [f32; 4], material: &str| {
            json!({ "string": { "type": "instance", "name": name, "model": format!("{material}_wall") },
                    "vec3": { "position": pos },
                    "vec4": { "orientation": orient } })
        };
        let doc = json!({
            "filter": { "string": { "type": "box" }, "float": { "xwidth": 0.5, "ywidth": 0.5 } },
            "film": {
                "vec2": { "resolution": [16, 16] },
                "string": { "file": out }
            },
            "camera": {
                "vec3": { "position": [0, 0, -0.9], "look_at": [0, 0, 1] },
                "float": { "fov": 70 }
            },
            "render_setting": {
                "int": { "sample_per_pixel": 4, "max_ray_depth": 3 },
                "string": { "render_method": "path_tracing" }
            },
            "geometry": [
                { "string": { "type": "disk", "name": "wall_disk" }, "float": { "radius": 3.0 } },
                { "string": { "type": "disk", "name": "lamp_disk" }, "float": { "radius": 0.4 } }
            ],
            "material": [
                { "string": { "type": "lambert", "name": "white" }, "color": { "diffuse": [0.75, 0.75, 0.75] } },
                { "string": { "type": "lambert", "name": "red" }, "color": { "diffuse": [0.6, 0.05, 0.05] } },
                { "string": { "type": "lambert", "name": "green" }, "color": { "diffuse": [0.05, 0.6, 0.05] } }
            ],
            "primitive": [
                { "string": { "type": "model", "name": "white_wall", "geometry": "wall_disk", "material": "white" } },
                { "string": { "type": "model", "name": "red_wall", "geometry": "wall_disk", "material": "red" } },
                { "string": { "type": "model", "name": "green_wall", "geometry": "wall_disk", "material": "green" } },
                wall("floor", [0.0, -1.0, 0.0], [1.0, 0.0, 0.0, -90.0], "white"),
                wall("ceiling", [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 90.0], "white"),
                wall("back", [0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 180.0], "white"),
                wall("left", [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0, 90.0], "red"),
                wall("right", [1.0, 0.0, 0.0], [0.0, 1.0, 0.0, -90.0], "green")
            ],
            "light": [
                { "string": { "type": "area", "name": "lamp", "geometry": "lamp_disk" },
                  "color": { "radiance": [17, 12, 4] },
                  "vec3": { "position": [0, 0.98, 0] },
                  "vec4": { "orientation": [1.0, 0.0, 0.0, 90.0] },
                  "int": { "sample_num": 1 } }
            ]
        });

        let mut ctx = load_from_value(&doc, PathBuf::from("."), None).unwrap();
        ctx.render().unwrap();

        // The back wall fills the view; the center pixel must carry energy
        // and the image must exist on disk.
        let center = ctx.film.pixel_color(8, 8);
        assert!(center.r > 0.0, "center {center}");
        assert!(std::path::Path::new(out).exists());
    }

    #[test]
    fn volume_section_is_carried_on_the_scene() {
        let doc = json!({
            "volume": {
                "string": { "type": "homogeneous" },
                "color": { "absorption": [0.5, 0.5, 0.5] },
                "vec3": { "box_min": [-1, -1, -1], "box_max": [1, 1, 1] }
            }
        });
        let ctx = load_from_value(&doc, PathBuf::from("."), None).unwrap();
        let volume = ctx.scene.volume().unwrap();
        let ray = crate::core::geometry::Ray::new(
            Vector3::new(0.0, 0.0, -5.0),
            Vector3::UNIT_Z,
            0.0,
        );
        assert!(volume.transmittance(&ray).r < 1.0);
    }
}
