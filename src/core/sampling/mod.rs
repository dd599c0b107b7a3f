//! Sampling patterns, warps and inverse-CDF distributions.

#![allow(dead_code)]

mod cdf_1d;
mod cdf_2d;

// Re-export.
pub use cdf_1d::*;
pub use cdf_2d::*;

use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::rng::*;

/// Generate a stratified 1D pattern over [0, 1).
///
/// * `rng`       - Random number generator.
/// * `n_samples` - Number of samples.
/// * `jitter`    - Jitter the samples within their strata.
pub fn stratified_sample_1d(rng: &mut Rng, n_samples: usize, jitter: bool) -> Vec<Float> {
    let inv_n_samples = 1.0 / n_samples as Float;

    (0..n_samples)
        .map(|i| {
            let delta = if jitter { rng.uniform_float() } else { 0.5 };
            min((i as Float + delta) * inv_n_samples, ONE_MINUS_EPSILON)
        })
        .collect()
}

/// Generate a stratified 2D pattern over [0, 1)² as a flat (x, y) array.
///
/// * `rng`    - Random number generator.
/// * `nx`     - Number of strata in the x-direction.
/// * `ny`     - Number of strata in the y-direction.
/// * `jitter` - Jitter the samples within their strata.
pub fn stratified_sample_2d(rng: &mut Rng, nx: usize, ny: usize, jitter: bool) -> Vec<Float> {
    let dx = 1.0 / nx as Float;
    let dy = 1.0 / ny as Float;

    let mut samples = Vec::with_capacity(2 * nx * ny);
    for y in 0..ny {
        for x in 0..nx {
            let jx = if jitter { rng.uniform_float() } else { 0.5 };
            let jy = if jitter { rng.uniform_float() } else { 0.5 };
            samples.push(min((x as Float + jx) * dx, ONE_MINUS_EPSILON));
            samples.push(min((y as Float + jy) * dy, ONE_MINUS_EPSILON));
        }
    }
    samples
}

/// Generate Latin hypercube samples as a flat array of `n_dim`-dimensional
/// values.
///
/// * `rng`       - Random number generator.
/// * `n_samples` - Number of samples.
/// * `n_dim`     - Number of dimensions.
pub fn latin_hypercube(rng: &mut Rng, n_samples: usize, n_dim: usize) -> Vec<Float> {
    let mut samples = vec![0.0; n_samples * n_dim];
    let inv_n_samples = 1.0 / n_samples as Float;

    // Generate LHS samples along the diagonal.
    for i in 0..n_samples {
        for j in 0..n_dim {
            let sj = (i as Float + rng.uniform_float()) * inv_n_samples;
            samples[n_dim * i + j] = min(sj, ONE_MINUS_EPSILON);
        }
    }

    // Permute LHS samples in each dimension.
    for i in 0..n_dim {
        for j in 0..n_samples {
            let other = j + rng.bounded_uniform_u32(0, (n_samples - j) as u32) as usize;
            samples.swap(n_dim * j + i, n_dim * other + i);
        }
    }

    samples
}

/// Uniformly sample a direction from a sphere.
///
/// * `u1` - First random sample.
/// * `u2` - Second random sample.
pub fn uniform_sample_sphere(u1: Float, u2: Float) -> Vector3 {
    let z = 1.0 - 2.0 * u1;
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u2;
    Vector3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Uniformly sample a point on the unit disk.
///
/// * `u1` - First random sample.
/// * `u2` - Second random sample.
pub fn uniform_sample_disk(u1: Float, u2: Float) -> Vector2 {
    let r = u1.sqrt();
    let theta = TWO_PI * u2;
    Vector2::new(r * theta.cos(), r * theta.sin())
}

/// Sample a point on the unit disk with the concentric square-to-circle
/// mapping, which preserves stratification better than the polar mapping.
///
/// * `u1` - First random sample.
/// * `u2` - Second random sample.
pub fn concentric_sample_disk(u1: Float, u2: Float) -> Vector2 {
    let ox = 2.0 * u1 - 1.0;
    let oy = 2.0 * u2 - 1.0;

    // Handle degeneracy at the origin.
    if ox == 0.0 && oy == 0.0 {
        return Vector2::ZERO;
    }

    let (r, theta) = if abs(ox) > abs(oy) {
        (ox, PI_OVER_FOUR * (oy / ox))
    } else {
        (oy, PI_OVER_TWO - PI_OVER_FOUR * (ox / oy))
    };

    Vector2::new(r * theta.cos(), r * theta.sin())
}

/// Sample a direction on the hemisphere about +z with cosine weighting.
///
/// * `u1` - First random sample.
/// * `u2` - Second random sample.
pub fn cosine_sample_hemisphere(u1: Float, u2: Float) -> Vector3 {
    let d = concentric_sample_disk(u1, u2);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted hemisphere sampling.
///
/// * `cos_theta` - Cosine of the angle to the hemisphere axis.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Uniformly sample a direction from the cone of directions about +z with
/// half-angle `acos(cos_theta_max)`.
///
/// * `u1`            - First random sample.
/// * `u2`            - Second random sample.
/// * `cos_theta_max` - Cosine of the cone half-angle.
pub fn uniform_sample_cone(u1: Float, u2: Float, cos_theta_max: Float) -> Vector3 {
    let cos_theta = (1.0 - u1) + u1 * cos_theta_max;
    let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
    let phi = u2 * TWO_PI;
    Vector3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Returns the PDF for uniform cone sampling.
///
/// * `cos_theta_max` - Cosine of the cone half-angle.
#[inline]
pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 / (TWO_PI * (1.0 - cos_theta_max))
}

/// Uniformly sample barycentric coordinates on a triangle.
///
/// * `u1` - First random sample.
/// * `u2` - Second random sample.
pub fn uniform_sample_triangle(u1: Float, u2: Float) -> (Float, Float) {
    let su0 = u1.sqrt();
    (1.0 - su0, u2 * su0)
}

/// Weight samples from two strategies using the power heuristic with β=2.
///
/// * `nf`    - Number of samples taken from `f_pdf`.
/// * `f_pdf` - First sampling distribution.
/// * `ng`    - Number of samples taken from `g_pdf`.
/// * `g_pdf` - Second sampling distribution.
#[inline]
pub fn power_heuristic(nf: u32, f_pdf: Float, ng: u32, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    (f * f) / (f * f + g * g)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
