//! Mitchell Filter

use crate::core::common::*;
use crate::core::filter::*;

/// Implements the Mitchell-Netravali filter. The two parameters `B` and `C`
/// should satisfy `B + 2C = 1` for the best tradeoff between ringing and
/// blurring.
pub struct MitchellFilter {
    /// Filter data.
    data: FilterData,

    /// Parameter `B`.
    b: Float,

    /// Parameter `C`.
    c: Float,
}

impl MitchellFilter {
    /// Create a new `MitchellFilter`.
    ///
    /// * `x_width` - Filter half-width in the x-direction.
    /// * `y_width` - Filter half-width in the y-direction.
    /// * `b`       - Parameter `B`.
    /// * `c`       - Parameter `C`.
    pub fn new(x_width: Float, y_width: Float, b: Float, c: Float) -> Self {
        Self {
            data: FilterData::new(x_width, y_width),
            b,
            c,
        }
    }

    /// Evaluates the 1D filter function over [-2, 2].
    ///
    /// * `x` - Normalized distance from the filter center.
    fn mitchell_1d(&self, x: Float) -> Float {
        let x = abs(2.0 * x);
        let (b, c) = (self.b, self.c);

        if x > 1.0 {
            ((-b - 6.0 * c) * x * x * x
                + (6.0 * b + 30.0 * c) * x * x
                + (-12.0 * b - 48.0 * c) * x
                + (8.0 * b + 24.0 * c))
                * (1.0 / 6.0)
        } else {
            ((12.0 - 9.0 * b - 6.0 * c) * x * x * x
                + (-18.0 + 12.0 * b + 6.0 * c) * x * x
                + (6.0 - 2.0 * b))
                * (1.0 / 6.0)
        }
    }
}

impl Filter for MitchellFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, x: Float, y: Float) -> Float {
        self.mitchell_1d(x * self.data.inv_x_width) * self.mitchell_1d(y * self.data.inv_y_width)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
