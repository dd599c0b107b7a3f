//! Render driver.

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::film::*;
use crate::core::integrator::*;
use crate::core::rng::*;
use crate::core::sampler::*;
use crate::core::scene::Scene;
use itertools::iproduct;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Side length of the film tiles handed to worker threads.
const TILE_SIZE: i32 = 16;

/// How the scene is integrated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderMethod {
    /// Whitted-style ray tracing.
    Whitted,

    /// Ambient occlusion.
    AmbientOcclusion,

    /// Unidirectional path tracing.
    PathTracing,
}

impl From<&str> for RenderMethod {
    /// Parse a render method name, defaulting to path tracing.
    ///
    /// * `name` - The method name.
    fn from(name: &str) -> Self {
        match name {
            "whitted" => RenderMethod::Whitted,
            "ao" => RenderMethod::AmbientOcclusion,
            "path_tracing" => RenderMethod::PathTracing,
            other => {
                warn!("Render method '{other}' unknown, using 'path_tracing'");
                RenderMethod::PathTracing
            }
        }
    }
}

/// Settings shared by all render methods.
#[derive(Copy, Clone, Debug)]
pub struct RenderSetting {
    /// Samples per pixel.
    pub sample_per_pixel: usize,

    /// Maximum ray recursion depth.
    pub max_ray_depth: u32,

    /// The integration method.
    pub method: RenderMethod,
}

impl Default for RenderSetting {
    /// Returns the default settings: 1 sample per pixel, depth 5, path
    /// tracing.
    fn default() -> Self {
        Self {
            sample_per_pixel: 1,
            max_ray_depth: 5,
            method: RenderMethod::PathTracing,
        }
    }
}

/// Drives sampler → camera → integrator → film over the scene. The film
/// sample window is split into tiles rendered in parallel; per-pixel sampler
/// and RNG streams keep the result independent of the tiling.
pub struct Renderer {
    integrator: Box<dyn Integrator>,
    sample_per_pixel: usize,
    seed: u64,
    cancel: Arc<AtomicBool>,
}

impl Renderer {
    /// Create a new `Renderer`.
    ///
    /// * `integrator`       - The integrator to drive.
    /// * `sample_per_pixel` - Samples per pixel.
    pub fn new(integrator: Box<dyn Integrator>, sample_per_pixel: usize) -> Self {
        Self {
            integrator,
            sample_per_pixel,
            seed: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the sampler seed. The default seed is 0.
    ///
    /// * `seed` - The new seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Returns the flag that cancels the render when set. Cancellation is
    /// cooperative: workers stop at the next sample-batch boundary and the
    /// film keeps whatever was accumulated.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Render the scene into the film and write the image out.
    ///
    /// * `scene` - The scene.
    /// * `film`  - The film to accumulate into.
    pub fn render(&mut self, scene: &Scene, film: &Film) -> Result<(), String> {
        let (x_start, x_end, y_start, y_end) = film.sample_range();

        // Registration phase: the integrator declares its sample needs once.
        let mut quota = SampleQuota::default();
        self.integrator.query_sample_quota(scene, &mut quota);
        let sampler = Sampler::new(
            x_start,
            x_end,
            y_start,
            y_end,
            self.sample_per_pixel,
            quota,
            self.seed,
        );

        let max_total_samples = sampler.max_total_samples();
        let report_step = max(max_total_samples / 100, 1);
        let progress = AtomicU64::new(0);
        let reported = AtomicU64::new(0);

        let n_tiles_x = (x_end - x_start + TILE_SIZE - 1) / TILE_SIZE;
        let n_tiles_y = (y_end - y_start + TILE_SIZE - 1) / TILE_SIZE;
        info!("Rendering {n_tiles_x}x{n_tiles_y} tiles, {max_total_samples} samples");

        let integrator = &*self.integrator;
        let tiles: Vec<(i32, i32)> = iproduct!(0..n_tiles_x, 0..n_tiles_y).collect();
        tiles.par_iter().for_each(|&(tile_x, tile_y)| {
            if self.cancel.load(Ordering::Relaxed) {
                return;
            }

            let x0 = x_start + tile_x * TILE_SIZE;
            let x1 = min(x0 + TILE_SIZE, x_end);
            let y0 = y_start + tile_y * TILE_SIZE;
            let y1 = min(y0 + TILE_SIZE, y_end);

            let mut tile_sampler = sampler.sub_range(x0, x1, y0, y1);
            let mut samples = tile_sampler.allocate_sample_buffer();
            let mut film_tile = film.tile(x0, x1, y0, y1);

            loop {
                if self.cancel.load(Ordering::Relaxed) {
                    break;
                }
                let n = tile_sampler.request_samples(&mut samples);
                if n == 0 {
                    break;
                }

                // The whole batch belongs to one pixel; give it its own RNG
                // stream so shading decisions do not depend on the tiling.
                let px = samples[0].img_x.floor() as i64 as u64;
                let py = samples[0].img_y.floor() as i64 as u64;
                let mut rng = Rng::new(self.seed ^ (py << 32).wrapping_add(px).wrapping_mul(0x2545f4914f6cdd1d));

                for sample in &samples[..n] {
                    let (ray, weight) = scene.camera().generate_ray(sample);
                    let mut l = if weight > 0.0 {
                        weight * integrator.li(scene, &ray, sample, &mut rng)
                    } else {
                        Color::BLACK
                    };

                    if l.has_nans() {
                        error!(
                            "NaN radiance at sample ({}, {}), setting to black",
                            sample.img_x, sample.img_y
                        );
                        l = Color::BLACK;
                    }
                    film_tile.add_sample(sample, l);
                }

                // Report at every 1% of the total sample count.
                let done = progress.fetch_add(n as u64, Ordering::Relaxed) + n as u64;
                let step = done / report_step;
                if step > reported.fetch_max(step, Ordering::Relaxed) {
                    info!(
                        "progress {}%",
                        min(100, 100 * done / max_total_samples)
                    );
                }
            }

            film.merge_tile(&film_tile);
        });

        if self.cancel.load(Ordering::Relaxed) {
            warn!("Render cancelled, writing partial image");
        }
        film.write_image()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::*;
    use crate::core::light::ArcLight;
    use crate::core::test_utils::*;
    use crate::filters::BoxFilter;
    use crate::integrators::WhittedIntegrator;
    use crate::lights::PointLight;

    fn film_in_temp(name: &str, res: usize) -> Film {
        let dir = std::env::temp_dir().join("lumen_renderer_test");
        std::fs::create_dir_all(&dir).unwrap();
        Film::new(
            res,
            res,
            [0.0, 1.0, 0.0, 1.0],
            std::sync::Arc::new(BoxFilter::new(0.5, 0.5)),
            dir.join(name).to_str().unwrap(),
        )
    }

    #[test]
    fn renders_a_lit_sphere_to_the_film() {
        let light: ArcLight = std::sync::Arc::new(PointLight::new(
            0,
            Color::grey(200.0),
            Vector3::new(0.0, 0.0, -5.0),
        ));
        let scene = unit_sphere_scene(vec![light]);
        let film = film_in_temp("sphere.png", 24);

        let mut renderer = Renderer::new(Box::new(WhittedIntegrator::new(2)), 4);
        renderer.render(&scene, &film).unwrap();

        // Center pixel sees the lit sphere; corners miss everything.
        let center = film.pixel_color(12, 12);
        let corner = film.pixel_color(0, 0);
        assert!(center.r > 0.0, "center {center}");
        assert!(corner.is_black(), "corner {corner}");
    }

    #[test]
    fn cancellation_stops_before_any_work() {
        let scene = unit_sphere_scene(vec![]);
        let film = film_in_temp("cancelled.png", 16);

        let mut renderer = Renderer::new(Box::new(WhittedIntegrator::new(2)), 1);
        renderer.cancel_flag().store(true, Ordering::Relaxed);
        renderer.render(&scene, &film).unwrap();

        // Nothing was accumulated.
        assert!(film.pixel_color(8, 8).is_black());
    }

    #[test]
    fn seeded_renders_are_reproducible() {
        let light: ArcLight = std::sync::Arc::new(PointLight::new(
            0,
            Color::grey(100.0),
            Vector3::new(2.0, 2.0, -4.0),
        ));

        let mut colors = vec![];
        for run in 0..2 {
            let scene = unit_sphere_scene(vec![light.clone()]);
            let film = film_in_temp(&format!("repro_{run}.png"), 16);
            let mut renderer = Renderer::new(Box::new(WhittedIntegrator::new(2)), 2);
            renderer.set_seed(7);
            renderer.render(&scene, &film).unwrap();
            colors.push(film.pixel_color(8, 8));
        }
        assert_eq!(colors[0], colors[1]);
    }
}
