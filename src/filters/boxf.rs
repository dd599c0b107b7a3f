//! Box Filter

use crate::core::common::*;
use crate::core::filter::*;

/// Implements the box filter, which weighs all samples inside its extent
/// equally.
pub struct BoxFilter {
    /// Filter data.
    data: FilterData,
}

impl BoxFilter {
    /// Create a new `BoxFilter`.
    ///
    /// * `x_width` - Filter half-width in the x-direction.
    /// * `y_width` - Filter half-width in the y-direction.
    pub fn new(x_width: Float, y_width: Float) -> Self {
        Self {
            data: FilterData::new(x_width, y_width),
        }
    }
}

impl Filter for BoxFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, _x: Float, _y: Float) -> Float {
        1.0
    }
}
