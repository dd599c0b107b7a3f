//! Gaussian Filter

use crate::core::common::*;
use crate::core::filter::*;

/// Implements a Gaussian filter with the constant offset subtracted so that
/// the function goes to 0 at the filter extent.
pub struct GaussianFilter {
    /// Filter data.
    data: FilterData,

    /// Falloff rate.
    alpha: Float,

    /// Precomputed Gaussian value at the x extent.
    exp_x: Float,

    /// Precomputed Gaussian value at the y extent.
    exp_y: Float,
}

impl GaussianFilter {
    /// Create a new `GaussianFilter`.
    ///
    /// * `x_width` - Filter half-width in the x-direction.
    /// * `y_width` - Filter half-width in the y-direction.
    /// * `alpha`   - Falloff rate; larger values give a sharper filter.
    pub fn new(x_width: Float, y_width: Float, alpha: Float) -> Self {
        Self {
            data: FilterData::new(x_width, y_width),
            alpha,
            exp_x: (-alpha * x_width * x_width).exp(),
            exp_y: (-alpha * y_width * y_width).exp(),
        }
    }

    fn gaussian_1d(&self, d: Float, exp_v: Float) -> Float {
        max(0.0, (-self.alpha * d * d).exp() - exp_v)
    }
}

impl Filter for GaussianFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, x: Float, y: Float) -> Float {
        self.gaussian_1d(x, self.exp_x) * self.gaussian_1d(y, self.exp_y)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanishes_at_the_extent() {
        let f = GaussianFilter::new(2.0, 2.0, 1.0);
        assert!(f.evaluate(2.0, 0.0).abs() < 1e-6);
        assert!(f.evaluate(0.0, 2.0).abs() < 1e-6);
        assert!(f.evaluate(0.0, 0.0) > 0.0);
    }

    #[test]
    fn monotonically_decreasing_from_center() {
        let f = GaussianFilter::new(2.0, 2.0, 2.0);
        assert!(f.evaluate(0.0, 0.0) > f.evaluate(1.0, 0.0));
        assert!(f.evaluate(1.0, 0.0) > f.evaluate(1.9, 0.0));
    }
}
