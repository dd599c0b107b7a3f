//! Camera interface.

use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::sampler::*;
use std::sync::Arc;

/// Camera interface: maps a pixel sample to a primary ray with a scalar
/// weight applied to the radiance carried back along it.
pub trait Camera: Send + Sync {
    /// Generate the primary ray for a pixel sample. Returns the ray and its
    /// weight.
    ///
    /// * `sample` - The pixel sample.
    fn generate_ray(&self, sample: &Sample) -> (Ray, Float);
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;
