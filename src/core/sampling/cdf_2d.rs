//! 2D inverse-CDF sampling.

use super::cdf_1d::*;
use crate::core::common::*;

/// A piecewise-constant 2D distribution factored into a marginal over rows
/// and a conditional per row.
#[derive(Clone, Debug)]
pub struct Cdf2D {
    /// Conditional sampling density p(s|t) for each row.
    conditional: Vec<Cdf1D>,

    /// Marginal sampling density p(t).
    marginal: Cdf1D,

    /// Row width.
    width: usize,

    /// Row count.
    height: usize,
}

impl Cdf2D {
    /// Build a new `Cdf2D` over a row-major grid of weights.
    ///
    /// * `func`   - Row-major weights, `width * height` entries.
    /// * `width`  - Row width.
    /// * `height` - Row count.
    pub fn new(func: &[Float], width: usize, height: usize) -> Self {
        debug_assert_eq!(func.len(), width * height);

        let conditional: Vec<Cdf1D> = (0..height)
            .map(|v| Cdf1D::new(func[v * width..(v + 1) * width].to_vec()))
            .collect();
        let marginal = Cdf1D::new(conditional.iter().map(|c| c.func_int).collect());

        Self {
            conditional,
            marginal,
            width,
            height,
        }
    }

    /// Sample a `(s, t)` position in [0, 1)² and its density with respect to
    /// that unit square.
    ///
    /// * `u1` - First random sample.
    /// * `u2` - Second random sample.
    pub fn sample_continuous(&self, u1: Float, u2: Float) -> (Float, Float, Float) {
        let (t, pdf_t, v) = self.marginal.sample_continuous(u2);
        let (s, pdf_s, _) = self.conditional[v].sample_continuous(u1);
        (s, t, pdf_s * pdf_t)
    }

    /// Returns the density at `(s, t)` with respect to the unit square.
    ///
    /// * `s` - First coordinate in [0, 1).
    /// * `t` - Second coordinate in [0, 1).
    pub fn pdf(&self, s: Float, t: Float) -> Float {
        if self.marginal.func_int == 0.0 {
            return 0.0;
        }
        let iu = clamp((s * self.width as Float) as usize, 0, self.width - 1);
        let iv = clamp((t * self.height as Float) as usize, 0, self.height - 1);
        self.conditional[iv].func[iu] / self.marginal.func_int
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    #[test]
    fn histogram_converges_to_normalized_input() {
        let (w, h) = (2, 2);
        let func = [1.0, 3.0, 2.0, 2.0];
        let total: Float = func.iter().sum();
        let dist = Cdf2D::new(&func, w, h);

        let mut rng = Rng::new(31);
        let n = 200_000;
        let mut counts = [0_usize; 4];
        for _ in 0..n {
            let (s, t, pdf) = dist.sample_continuous(rng.uniform_float(), rng.uniform_float());
            assert!(pdf > 0.0);
            let cell = (t * h as Float) as usize * w + (s * w as Float) as usize;
            counts[cell] += 1;
        }

        for (i, &f) in func.iter().enumerate() {
            let expected = f / total;
            let observed = counts[i] as Float / n as Float;
            let sigma = (expected * (1.0 - expected) / n as Float).sqrt();
            assert!(
                (observed - expected).abs() < 3.0 * sigma + 1e-3,
                "cell {i}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn pdf_agrees_with_sample_density() {
        let func = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let dist = Cdf2D::new(&func, 3, 2);
        let mut rng = Rng::new(67);
        for _ in 0..500 {
            let (s, t, pdf) = dist.sample_continuous(rng.uniform_float(), rng.uniform_float());
            assert!((dist.pdf(s, t) - pdf).abs() < 1e-3 * pdf.max(1.0));
        }
    }

    #[test]
    fn zero_function_has_zero_pdf() {
        let dist = Cdf2D::new(&[0.0, 0.0, 0.0, 0.0], 2, 2);
        assert_eq!(dist.pdf(0.5, 0.5), 0.0);
    }
}
