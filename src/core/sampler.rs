//! Pixel sampler and sample quota bookkeeping.

#![allow(dead_code)]

use crate::core::common::*;
use crate::core::rng::*;
use crate::core::sampling::*;

/// Handle into a `Sample`'s per-request arrays, returned at quota
/// registration time and stable for the whole render.
#[derive(Copy, Clone, Debug, Default)]
pub struct SampleIndex {
    /// Index of the requested array inside `Sample::u1d` / `Sample::u2d`.
    pub offset: usize,

    /// Number of samples in the array.
    pub sample_num: usize,
}

/// Collects the per-integrator requests for 1D and 2D sample arrays before
/// rendering starts.
#[derive(Clone, Debug, Default)]
pub struct SampleQuota {
    /// Requested 1D array lengths.
    pub n1d: Vec<usize>,

    /// Requested 2D array lengths (pair counts).
    pub n2d: Vec<usize>,
}

impl SampleQuota {
    /// Register a request for a 1D array of `n` values per sample.
    ///
    /// * `n` - The number of values.
    pub fn request_1d_quota(&mut self, n: usize) -> SampleIndex {
        let offset = self.n1d.len();
        self.n1d.push(n);
        SampleIndex {
            offset,
            sample_num: n,
        }
    }

    /// Register a request for a 2D array of `n` pairs per sample.
    ///
    /// * `n` - The number of pairs.
    pub fn request_2d_quota(&mut self, n: usize) -> SampleIndex {
        let offset = self.n2d.len();
        self.n2d.push(n);
        SampleIndex {
            offset,
            sample_num: n,
        }
    }
}

/// A single pixel sample: a continuous film position, a lens position, and
/// the registered 1D/2D sample arrays shaped by the `SampleQuota`.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    /// Image x-coordinate in continuous film space.
    pub img_x: Float,

    /// Image y-coordinate in continuous film space.
    pub img_y: Float,

    /// Lens u-coordinate.
    pub lens_u: Float,

    /// Lens v-coordinate.
    pub lens_v: Float,

    /// Registered 1D arrays; `u1d[q]` has `quota.n1d[q]` values in [0, 1).
    pub u1d: Vec<Vec<Float>>,

    /// Registered 2D arrays; `u2d[q]` stores `quota.n2d[q]` pairs flat, so
    /// the k-th pair is `(u2d[q][2k], u2d[q][2k + 1])`.
    pub u2d: Vec<Vec<Float>>,
}

impl Sample {
    /// Allocate a sample shaped to the given quota.
    ///
    /// * `quota` - The registered quota.
    pub fn allocate(quota: &SampleQuota) -> Self {
        Self {
            img_x: 0.0,
            img_y: 0.0,
            lens_u: 0.0,
            lens_v: 0.0,
            u1d: quota.n1d.iter().map(|&n| vec![0.0; n]).collect(),
            u2d: quota.n2d.iter().map(|&n| vec![0.0; 2 * n]).collect(),
        }
    }
}

/// Generates stratified pixel samples over a film sample window. Samples are
/// delivered one pixel per batch; per-pixel RNG streams keep the output
/// deterministic regardless of how the window is tiled.
#[derive(Clone)]
pub struct Sampler {
    x_start: i32,
    x_end: i32,
    y_start: i32,
    y_end: i32,
    samples_per_pixel: usize,
    x_per_pixel: usize,
    y_per_pixel: usize,
    quota: SampleQuota,
    seed: u64,
    current_x: i32,
    current_y: i32,
}

impl Sampler {
    /// Create a new `Sampler` over the half-open pixel window
    /// `[x_start, x_end) × [y_start, y_end)`.
    ///
    /// The sample count per pixel is rounded up to the next jitterable
    /// `nx * ny` grid when necessary.
    ///
    /// * `x_start`           - First pixel column.
    /// * `x_end`             - One past the last pixel column.
    /// * `y_start`           - First pixel row.
    /// * `y_end`             - One past the last pixel row.
    /// * `samples_per_pixel` - Requested samples per pixel.
    /// * `quota`             - The registered sample quota.
    /// * `seed`              - Base seed for the per-pixel RNG streams.
    pub fn new(
        x_start: i32,
        x_end: i32,
        y_start: i32,
        y_end: i32,
        samples_per_pixel: usize,
        quota: SampleQuota,
        seed: u64,
    ) -> Self {
        let spp = max(samples_per_pixel, 1);
        let x_per_pixel = (spp as Float).sqrt().ceil() as usize;
        let y_per_pixel = (spp + x_per_pixel - 1) / x_per_pixel;
        let rounded = x_per_pixel * y_per_pixel;
        if rounded != samples_per_pixel {
            warn!("Rounding {samples_per_pixel} samples per pixel up to {rounded}");
        }

        Self {
            x_start,
            x_end,
            y_start,
            y_end,
            samples_per_pixel: rounded,
            x_per_pixel,
            y_per_pixel,
            quota,
            seed,
            current_x: x_start,
            current_y: y_start,
        }
    }

    /// Returns the number of samples generated for each pixel.
    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    /// Returns the largest number of samples a single `request_samples` call
    /// can produce.
    pub fn max_samples_per_request(&self) -> usize {
        self.samples_per_pixel
    }

    /// Returns the total number of samples this sampler will produce.
    pub fn max_total_samples(&self) -> u64 {
        (self.x_end - self.x_start).max(0) as u64
            * (self.y_end - self.y_start).max(0) as u64
            * self.samples_per_pixel as u64
    }

    /// Allocate a buffer able to hold one full request.
    pub fn allocate_sample_buffer(&self) -> Vec<Sample> {
        (0..self.max_samples_per_request())
            .map(|_| Sample::allocate(&self.quota))
            .collect()
    }

    /// Returns a sampler over the intersection of this sampler's window with
    /// the given window, sharing quota, seed and sample counts.
    ///
    /// * `x0` - First pixel column.
    /// * `x1` - One past the last pixel column.
    /// * `y0` - First pixel row.
    /// * `y1` - One past the last pixel row.
    pub fn sub_range(&self, x0: i32, x1: i32, y0: i32, y1: i32) -> Sampler {
        let mut sub = self.clone();
        sub.x_start = max(self.x_start, x0);
        sub.x_end = min(self.x_end, x1);
        sub.y_start = max(self.y_start, y0);
        sub.y_end = min(self.y_end, y1);
        sub.current_x = sub.x_start;
        sub.current_y = sub.y_start;
        sub
    }

    /// Fill `samples` with the stratified samples for the next pixel. Returns
    /// the number of samples produced, or 0 at the end of the stream.
    ///
    /// * `samples` - Destination buffer, at least `max_samples_per_request`
    ///   entries.
    pub fn request_samples(&mut self, samples: &mut [Sample]) -> usize {
        if self.current_y >= self.y_end || self.current_x >= self.x_end {
            return 0;
        }
        debug_assert!(samples.len() >= self.samples_per_pixel);

        let (px, py) = (self.current_x, self.current_y);
        let mut rng = self.pixel_rng(px, py);
        let spp = self.samples_per_pixel;

        // Image samples: jittered grid over the pixel footprint, shuffled so
        // the pairing with lens/array samples carries no correlation.
        let mut img = stratified_sample_2d(&mut rng, self.x_per_pixel, self.y_per_pixel, true);
        rng.shuffle(&mut img, spp, 2);
        let mut lens = stratified_sample_2d(&mut rng, self.x_per_pixel, self.y_per_pixel, true);
        rng.shuffle(&mut lens, spp, 2);

        for (i, sample) in samples.iter_mut().take(spp).enumerate() {
            sample.img_x = px as Float + img[2 * i];
            sample.img_y = py as Float + img[2 * i + 1];
            sample.lens_u = lens[2 * i];
            sample.lens_v = lens[2 * i + 1];
        }

        // Registered 1D arrays are Latin-hypercube stratified per sample.
        for (q, &n) in self.quota.n1d.iter().enumerate() {
            for sample in samples.iter_mut().take(spp) {
                let values = latin_hypercube(&mut rng, n, 1);
                sample.u1d[q].copy_from_slice(&values);
            }
        }

        // Registered 2D arrays are jittered √n grids, padded up to the grid
        // size and shuffled before truncation back to n pairs.
        for (q, &n) in self.quota.n2d.iter().enumerate() {
            let nx = (n as Float).sqrt().ceil() as usize;
            let ny = (n + nx - 1) / nx;
            for sample in samples.iter_mut().take(spp) {
                let mut pairs = stratified_sample_2d(&mut rng, nx, ny, true);
                rng.shuffle(&mut pairs, nx * ny, 2);
                sample.u2d[q].copy_from_slice(&pairs[..2 * n]);
            }
        }

        // Advance the pixel cursor.
        self.current_x += 1;
        if self.current_x >= self.x_end {
            self.current_x = self.x_start;
            self.current_y += 1;
        }

        spp
    }

    fn pixel_rng(&self, x: i32, y: i32) -> Rng {
        let px = x as i64 as u64;
        let py = y as i64 as u64;
        Rng::new(self.seed ^ (py << 32).wrapping_add(px.wrapping_mul(0x9e3779b97f4a7c15)))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
