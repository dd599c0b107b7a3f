//! Parameter sets.

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::geometry::*;
use std::collections::HashMap;

/// A typed key-value bag carrying the parameters of one scene entity. Every
/// lookup takes a fallback so a missing key degrades instead of failing.
#[derive(Clone, Debug, Default)]
pub struct ParamSet {
    bools: HashMap<String, bool>,
    ints: HashMap<String, i32>,
    floats: HashMap<String, Float>,
    strings: HashMap<String, String>,
    vec2s: HashMap<String, Vector2>,
    vec3s: HashMap<String, Vector3>,
    vec4s: HashMap<String, Vector4>,
    colors: HashMap<String, Color>,
}

macro_rules! param_accessors {
    ($field:ident, $setter:ident, $finder:ident, $t:ty) => {
        /// Store a value under the given key.
        pub fn $setter(&mut self, key: &str, value: $t) {
            self.$field.insert(String::from(key), value);
        }

        /// Look up a value, falling back to the given default.
        pub fn $finder(&self, key: &str, default: $t) -> $t {
            self.$field.get(key).cloned().unwrap_or(default)
        }
    };
}

impl ParamSet {
    /// Return a new empty `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    param_accessors!(bools, set_bool, find_one_bool, bool);
    param_accessors!(ints, set_int, find_one_int, i32);
    param_accessors!(floats, set_float, find_one_float, Float);
    param_accessors!(strings, set_string, find_one_string, String);
    param_accessors!(vec2s, set_vector2, find_one_vector2, Vector2);
    param_accessors!(vec3s, set_vector3, find_one_vector3, Vector3);
    param_accessors!(vec4s, set_vector4, find_one_vector4, Vector4);
    param_accessors!(colors, set_color, find_one_color, Color);

    /// Returns whether a string value exists under the given key.
    pub fn has_string(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    /// Returns whether a vector3 value exists under the given key.
    pub fn has_vector3(&self, key: &str) -> bool {
        self.vec3s.contains_key(key)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_fall_back_to_defaults() {
        let mut params = ParamSet::new();
        params.set_int("sample_per_pixel", 16);
        params.set_string("type", String::from("sphere"));

        assert_eq!(params.find_one_int("sample_per_pixel", 1), 16);
        assert_eq!(params.find_one_int("max_ray_depth", 5), 5);
        assert_eq!(params.find_one_string("type", String::new()), "sphere");
        assert_eq!(
            params.find_one_vector3("position", Vector3::ZERO),
            Vector3::ZERO
        );
    }

    #[test]
    fn typed_namespaces_do_not_collide() {
        let mut params = ParamSet::new();
        params.set_float("radius", 2.0);
        params.set_int("radius", 7);
        assert_eq!(params.find_one_float("radius", 0.0), 2.0);
        assert_eq!(params.find_one_int("radius", 0), 7);
    }
}
