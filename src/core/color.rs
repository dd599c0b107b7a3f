//! Linear RGBA color.

#![allow(dead_code)]

use crate::core::common::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

/// A linear RGB color with an alpha channel. Radiance arithmetic works on the
/// RGB channels; alpha rides along for film/image purposes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: Float,

    /// Green channel.
    pub g: Float,

    /// Blue channel.
    pub b: Float,

    /// Alpha channel.
    pub a: Float,
}

impl Color {
    /// Black (0, 0, 0, 1).
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// White (1, 1, 1, 1).
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Magenta (1, 0, 1, 1). Used as the error color for failed lookups.
    pub const MAGENTA: Color = Color {
        r: 1.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };

    /// Return a new `Color` with an opaque alpha.
    ///
    /// * `r` - Red channel.
    /// * `g` - Green channel.
    /// * `b` - Blue channel.
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Return a new grey `Color`.
    ///
    /// * `v` - Value for all RGB channels.
    pub fn grey(v: Float) -> Self {
        Self::new(v, v, v)
    }

    /// Returns the luminance of the color.
    pub fn luminance(&self) -> Float {
        0.212671 * self.r + 0.715160 * self.g + 0.072169 * self.b
    }

    /// Returns `true` if all RGB channels are zero.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Returns `true` if any channel is NaN.
    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    /// Returns the largest RGB channel value.
    pub fn max_component(&self) -> Float {
        max(self.r, max(self.g, self.b))
    }

    /// Returns the color with negative RGB channels clamped to zero.
    pub fn clamp_negative(&self) -> Color {
        Color {
            r: max(self.r, 0.0),
            g: max(self.g, 0.0),
            b: max(self.b, 0.0),
            a: self.a,
        }
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a,
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        Color {
            r: self.r - rhs.r,
            g: self.g - rhs.g,
            b: self.b - rhs.b,
            a: self.a,
        }
    }
}

impl SubAssign for Color {
    fn sub_assign(&mut self, rhs: Color) {
        *self = *self - rhs;
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        Color {
            r: self.r * rhs.r,
            g: self.g * rhs.g,
            b: self.b * rhs.b,
            a: self.a,
        }
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, rhs: Color) {
        *self = *self * rhs;
    }
}

impl Mul<Float> for Color {
    type Output = Color;

    fn mul(self, rhs: Float) -> Color {
        Color {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
            a: self.a,
        }
    }
}

impl Mul<Color> for Float {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

impl MulAssign<Float> for Color {
    fn mul_assign(&mut self, rhs: Float) {
        *self = *self * rhs;
    }
}

impl Div<Float> for Color {
    type Output = Color;

    fn div(self, rhs: Float) -> Color {
        debug_assert!(rhs != 0.0);
        let inv = 1.0 / rhs;
        self * inv
    }
}

impl DivAssign<Float> for Color {
    fn div_assign(&mut self, rhs: Float) {
        *self = *self / rhs;
    }
}

impl Neg for Color {
    type Output = Color;

    fn neg(self) -> Color {
        Color {
            r: -self.r,
            g: -self.g,
            b: -self.b,
            a: self.a,
        }
    }
}

impl Index<usize> for Color {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        match i {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            3 => &self.a,
            _ => panic!("Invalid index for Color"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
