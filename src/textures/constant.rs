//! Constant Texture

use crate::core::fragment::*;
use crate::core::texture::*;

/// A texture returning the same value everywhere.
pub struct ConstantTexture<T> {
    /// The value.
    value: T,
}

impl<T> ConstantTexture<T> {
    /// Return a new `ConstantTexture`.
    ///
    /// * `value` - The value.
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Copy + Send + Sync> Texture<T> for ConstantTexture<T> {
    fn lookup(&self, _fragment: &Fragment) -> T {
        self.value
    }
}
