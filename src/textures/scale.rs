//! Scale Texture

use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::texture::*;
use std::ops::Mul;
use std::sync::Arc;

/// Multiplies a source texture by a float texture.
pub struct ScaleTexture<T> {
    /// The source texture.
    source: Arc<dyn Texture<T> + Send + Sync>,

    /// The scale texture.
    scale: ArcFloatTexture,
}

impl<T> ScaleTexture<T> {
    /// Return a new `ScaleTexture`.
    ///
    /// * `source` - The source texture.
    /// * `scale`  - The scale texture.
    pub fn new(source: Arc<dyn Texture<T> + Send + Sync>, scale: ArcFloatTexture) -> Self {
        Self { source, scale }
    }
}

impl<T> Texture<T> for ScaleTexture<T>
where
    T: Mul<Float, Output = T> + Send + Sync,
{
    fn lookup(&self, fragment: &Fragment) -> T {
        self.source.lookup(fragment) * self.scale.lookup(fragment)
    }
}
