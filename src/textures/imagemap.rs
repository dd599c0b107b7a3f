//! Image Texture

use crate::core::color::*;
use crate::core::common::*;
use crate::core::fragment::*;
use crate::core::image_io;
use crate::core::mipmap::*;
use crate::core::texture::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Shares decoded image pyramids between textures. Keyed by filename and
/// decode gamma; the cache is owned by the scene build and dropped with it.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<(String, u32), Arc<MipMap>>,
}

impl ImageCache {
    /// Return a new empty `ImageCache`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an image through the cache. A failed load yields a 1×1 magenta
    /// image so the scene still builds.
    ///
    /// * `path`  - Input file path.
    /// * `gamma` - Decode gamma applied to LDR channel values.
    pub fn load(&mut self, path: &str, gamma: Float) -> Arc<MipMap> {
        let key = (String::from(path), float_to_bits(gamma));
        if let Some(mipmap) = self.images.get(&key) {
            return Arc::clone(mipmap);
        }

        let mipmap = match image_io::read_image(path, gamma) {
            Ok((pixels, width, height)) => Arc::new(MipMap::new(pixels, width, height)),
            Err(e) => {
                error!("{e}; substituting magenta");
                Arc::new(MipMap::new(vec![Color::MAGENTA], 1, 1))
            }
        };
        self.images.insert(key, Arc::clone(&mipmap));
        mipmap
    }

    /// Returns the number of distinct images held.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Drop every cached image.
    pub fn clear(&mut self) {
        self.images.clear();
    }
}

/// A color texture backed by an image pyramid, addressed by the fragment's
/// uv with repeat wrapping.
pub struct ImageTexture {
    mipmap: Arc<MipMap>,
}

impl ImageTexture {
    /// Return a new `ImageTexture`.
    ///
    /// * `mipmap` - The image pyramid.
    pub fn new(mipmap: Arc<MipMap>) -> Self {
        Self { mipmap }
    }
}

impl Texture<Color> for ImageTexture {
    fn lookup(&self, fragment: &Fragment) -> Color {
        let uv = fragment.uv();
        self.mipmap.lookup(0, uv.x, uv.y)
    }
}

/// A float texture reading the luminance of an image pyramid.
pub struct FloatImageTexture {
    mipmap: Arc<MipMap>,
}

impl FloatImageTexture {
    /// Return a new `FloatImageTexture`.
    ///
    /// * `mipmap` - The image pyramid.
    pub fn new(mipmap: Arc<MipMap>) -> Self {
        Self { mipmap }
    }
}

impl Texture<Float> for FloatImageTexture {
    fn lookup(&self, fragment: &Fragment) -> Float {
        let uv = fragment.uv();
        self.mipmap.lookup(0, uv.x, uv.y).luminance()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_load_falls_back_to_magenta() {
        let mut cache = ImageCache::new();
        let mipmap = cache.load("/nonexistent/missing.png", 2.2);
        assert_eq!(mipmap.width(), 1);
        assert_eq!(mipmap.lookup(0, 0.5, 0.5), Color::MAGENTA);
    }

    #[test]
    fn cache_shares_buffers_by_path_and_gamma() {
        let mut cache = ImageCache::new();
        let a = cache.load("/nonexistent/a.png", 2.2);
        let b = cache.load("/nonexistent/a.png", 2.2);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        // A different gamma is a different cache entry.
        let c = cache.load("/nonexistent/a.png", 1.0);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
