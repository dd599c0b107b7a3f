//! 1D inverse-CDF sampling.

use crate::core::common::*;

/// A piecewise-constant 1D distribution with its normalized CDF, supporting
/// discrete and continuous inverse-CDF sampling.
#[derive(Clone, Debug)]
pub struct Cdf1D {
    /// The unnormalized function values.
    pub func: Vec<Float>,

    /// CDF for `func`, one entry longer than `func`.
    pub cdf: Vec<Float>,

    /// Integral of `func` over [0, 1].
    pub func_int: Float,
}

impl Cdf1D {
    /// Build a new `Cdf1D` over the given weights. Empty or all-zero input
    /// yields a distribution whose samples land on index 0 with pdf 0.
    ///
    /// * `f` - The unnormalized weights.
    pub fn new(f: Vec<Float>) -> Self {
        if f.is_empty() {
            return Self {
                func: vec![],
                cdf: vec![0.0, 1.0],
                func_int: 0.0,
            };
        }

        let n = f.len();
        let mut cdf = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for i in 1..=n {
            debug_assert!(f[i - 1] >= 0.0);
            cdf.push(cdf[i - 1] + f[i - 1] / n as Float);
        }

        let func_int = cdf[n];
        if func_int == 0.0 {
            for (i, v) in cdf.iter_mut().enumerate().skip(1) {
                *v = i as Float / n as Float;
            }
        } else {
            for v in cdf.iter_mut().skip(1) {
                *v /= func_int;
            }
        }

        Self {
            func: f,
            cdf,
            func_int,
        }
    }

    /// Returns the number of weights.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Sample the discrete distribution. Returns the sampled index and its
    /// probability.
    ///
    /// * `u` - The random sample.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float) {
        if self.func.is_empty() {
            return (0, 0.0);
        }
        let offset = find_interval(self.cdf.len(), |i| self.cdf[i] <= u);
        (offset, self.pdf(offset))
    }

    /// Sample the continuous distribution over [0, 1). Returns the sampled
    /// position, its density, and the containing index.
    ///
    /// * `u` - The random sample.
    pub fn sample_continuous(&self, u: Float) -> (Float, Float, usize) {
        if self.func.is_empty() {
            return (0.0, 0.0, 0);
        }
        let offset = find_interval(self.cdf.len(), |i| self.cdf[i] <= u);

        let mut du = u - self.cdf[offset];
        let width = self.cdf[offset + 1] - self.cdf[offset];
        if width > 0.0 {
            du /= width;
        }
        debug_assert!(!du.is_nan());

        let pdf = if self.func_int > 0.0 {
            self.func[offset] / self.func_int
        } else {
            0.0
        };

        ((offset as Float + du) / self.count() as Float, pdf, offset)
    }

    /// Returns the probability of drawing the given index from the discrete
    /// distribution.
    ///
    /// * `index` - The index.
    pub fn pdf(&self, index: usize) -> Float {
        if self.func.is_empty() || self.func_int == 0.0 {
            return 0.0;
        }
        debug_assert!(index < self.count());
        self.func[index] / (self.func_int * self.count() as Float)
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
    fn discrete_sampling_matches_weights() {
        let weights = vec![1.0, 3.0, 2.0, 4.0];
        let total: Float = weights.iter().sum();
        let dist = Cdf1D::new(weights.clone());

        let mut rng = Rng::new(101);
        let n = 200_000;
        let mut counts = vec![0_usize; weights.len()];
        for _ in 0..n {
            let (i, pdf) = dist.sample_discrete(rng.uniform_float());
            assert!(pdf > 0.0);
            counts[i] += 1;
        }

        for (i, &w) in weights.iter().enumerate() {
            let expected = w / total;
            let observed = counts[i] as Float / n as Float;
            // 3σ bound for a binomial proportion.
            let sigma = (expected * (1.0 - expected) / n as Float).sqrt();
            assert!(
                (observed - expected).abs() < 3.0 * sigma + 1e-3,
                "bin {i}: observed {observed}, expected {expected}"
            );
        }
    }

    #[test]
    fn discrete_pdf_agrees_with_sampling_probability() {
        let dist = Cdf1D::new(vec![2.0, 2.0, 4.0]);
        assert!((dist.pdf(0) - 0.25).abs() < 1e-6);
        assert!((dist.pdf(2) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn continuous_sample_stays_in_unit_interval() {
        let dist = Cdf1D::new(vec![0.5, 1.5, 1.0]);
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let (x, pdf, offset) = dist.sample_continuous(rng.uniform_float());
            assert!((0.0..1.0).contains(&x));
            assert!(pdf >= 0.0);
            assert!(offset < 3);
        }
    }

    #[test]
    fn empty_input_yields_zero_pdf_index_zero() {
        let dist = Cdf1D::new(vec![]);
        assert_eq!(dist.sample_discrete(0.5), (0, 0.0));
        let (x, pdf, offset) = dist.sample_continuous(0.5);
        assert_eq!((x, pdf, offset), (0.0, 0.0, 0));
    }

    #[test]
    fn zero_weights_yield_zero_pdf() {
        let dist = Cdf1D::new(vec![0.0, 0.0]);
        let (_, pdf) = dist.sample_discrete(0.25);
        assert_eq!(pdf, 0.0);
    }
}
