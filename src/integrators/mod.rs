//! Light transport integrators.

mod ao;
mod path;
mod whitted;

// Re-export.
pub use ao::*;
pub use path::*;
pub use whitted::*;

use crate::core::material::BsdfType;

/// The component mask integrators hand the direct lighting estimator:
/// specular lobes are excluded there and handled by dedicated specular rays
/// or emission gating instead.
pub(crate) fn direct_lighting_mask() -> BsdfType {
    BsdfType::all() & !BsdfType::SPECULAR
}
