//! Triangle Filter

use crate::core::common::*;
use crate::core::filter::*;

/// Implements the triangle filter, which falls off linearly from the filter
/// center.
pub struct TriangleFilter {
    /// Filter data.
    data: FilterData,
}

impl TriangleFilter {
    /// Create a new `TriangleFilter`.
    ///
    /// * `x_width` - Filter half-width in the x-direction.
    /// * `y_width` - Filter half-width in the y-direction.
    pub fn new(x_width: Float, y_width: Float) -> Self {
        Self {
            data: FilterData::new(x_width, y_width),
        }
    }
}

impl Filter for TriangleFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, x: Float, y: Float) -> Float {
        max(0.0, self.data.x_width - abs(x)) * max(0.0, self.data.y_width - abs(y))
    }
}
