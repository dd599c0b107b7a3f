//! Texture interface.

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::fragment::*;
use std::sync::Arc;

/// Texture interface: a black-box lookup of a value at a surface fragment.
pub trait Texture<T>: Send + Sync {
    /// Evaluate the texture at the fragment.
    ///
    /// * `fragment` - The shading point.
    fn lookup(&self, fragment: &Fragment) -> T;
}

/// Atomic reference counted color texture.
pub type ArcColorTexture = Arc<dyn Texture<Color> + Send + Sync>;

/// Atomic reference counted float texture.
pub type ArcFloatTexture = Arc<dyn Texture<Float> + Send + Sync>;
