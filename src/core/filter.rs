//! Reconstruction filter interface.

use crate::core::common::*;
use std::sync::Arc;

/// Shared data for all reconstruction filters.
#[derive(Copy, Clone, Debug)]
pub struct FilterData {
    /// Filter half-width in the x-direction; the filter is 0 beyond it.
    pub x_width: Float,

    /// Filter half-width in the y-direction; the filter is 0 beyond it.
    pub y_width: Float,

    /// Reciprocal of `x_width`.
    pub inv_x_width: Float,

    /// Reciprocal of `y_width`.
    pub inv_y_width: Float,
}

impl FilterData {
    /// Return a new `FilterData`.
    ///
    /// * `x_width` - Filter half-width in the x-direction.
    /// * `y_width` - Filter half-width in the y-direction.
    pub fn new(x_width: Float, y_width: Float) -> Self {
        Self {
            x_width,
            y_width,
            inv_x_width: 1.0 / x_width,
            inv_y_width: 1.0 / y_width,
        }
    }
}

/// Filter interface for image reconstruction from film samples.
pub trait Filter: Send + Sync {
    /// Returns the filter parameters.
    fn get_data(&self) -> &FilterData;

    /// Returns the filter value at a position relative to the filter center.
    /// Callers only evaluate points inside the filter's extent.
    ///
    /// * `x` - X-distance from the filter center.
    /// * `y` - Y-distance from the filter center.
    fn evaluate(&self, x: Float, y: Float) -> Float;
}

/// Atomic reference counted `Filter`.
pub type ArcFilter = Arc<dyn Filter + Send + Sync>;
