//! Image I/O

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use exr::prelude as exrs;
use exr::prelude::*;
use std::path::Path;
use std::result::Result;

/// Returns the lowercased extension of a path, if it has one.
fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Read an image into linear RGBA pixels. OpenEXR files are read as-is; LDR
/// formats are decoded through the `image` crate and linearised with the
/// given per-file gamma.
///
/// * `path`  - Input file path.
/// * `gamma` - Decode gamma applied to LDR channel values.
pub fn read_image(path: &str, gamma: Float) -> Result<(Vec<Color>, usize, usize), String> {
    match extension(path).as_deref() {
        Some("exr") => read_exr(path),
        Some(_) => read_ldr(path, gamma),
        None => Err(format!("Cannot determine image type of '{path}'")),
    }
}

fn read_exr(path: &str) -> Result<(Vec<Color>, usize, usize), String> {
    let image = exrs::read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _channels| {
                (
                    vec![Color::BLACK; resolution.width() * resolution.height()],
                    resolution.width(),
                    resolution.height(),
                )
            },
            |(pixels, width, _height), position, (r, g, b, a): (f32, f32, f32, f32)| {
                pixels[position.y() * *width + position.x()] = Color { r, g, b, a };
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(path)
        .map_err(|e| format!("Error reading '{path}': {e}"))?;

    let (pixels, width, height) = image.layer_data.channel_data.pixels;
    Ok((pixels, width, height))
}

fn read_ldr(path: &str, gamma: Float) -> Result<(Vec<Color>, usize, usize), String> {
    let decoded = image::open(path).map_err(|e| format!("Error reading '{path}': {e}"))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let inv = 1.0 / 255.0;
    let pixels = rgba
        .pixels()
        .map(|p| {
            let mut c = Color::new(
                p[0] as Float * inv,
                p[1] as Float * inv,
                p[2] as Float * inv,
            );
            if gamma != 1.0 {
                c = Color::new(c.r.powf(gamma), c.g.powf(gamma), c.b.powf(gamma));
            }
            c.a = p[3] as Float * inv;
            c
        })
        .collect();

    Ok((pixels, width as usize, height as usize))
}

/// Write linear RGBA pixels to an image file. OpenEXR output stays linear;
/// LDR formats are sRGB-encoded 8-bit.
///
/// * `path`   - Output file path.
/// * `pixels` - Row-major pixels, `width * height` entries.
/// * `width`  - Image width.
/// * `height` - Image height.
pub fn write_image(
    path: &str,
    pixels: &[Color],
    width: usize,
    height: usize,
) -> Result<(), String> {
    debug_assert_eq!(pixels.len(), width * height);
    match extension(path).as_deref() {
        Some("exr") => exrs::write_rgba_file(path, width, height, |x, y| {
            let c = pixels[y * width + x];
            (c.r, c.g, c.b, c.a)
        })
        .map_err(|e| format!("Error writing '{path}': {e}")),
        Some(_) => write_ldr(path, pixels, width, height),
        None => Err(format!("Cannot determine image type of '{path}'")),
    }
}

fn write_ldr(path: &str, pixels: &[Color], width: usize, height: usize) -> Result<(), String> {
    let buffer = image::RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let c = pixels[y as usize * width + x as usize];
        image::Rgb([
            encode_srgb(c.r),
            encode_srgb(c.g),
            encode_srgb(c.b),
        ])
    });
    buffer
        .save(path)
        .map_err(|e| format!("Error writing '{path}': {e}"))
}

/// sRGB-encode a linear channel value to 8 bits.
///
/// * `v` - The linear value.
fn encode_srgb(v: Float) -> u8 {
    let v = clamp(v, 0.0, 1.0);
    let encoded = if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exr_round_trip() {
        let dir = std::env::temp_dir().join("lumen_io_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("round_trip.exr");
        let path = path.to_str().unwrap();

        let pixels = vec![
            Color::new(0.25, 0.5, 2.0),
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 1.0, 0.0),
            Color::new(0.0, 0.0, 1.0),
        ];
        write_image(path, &pixels, 2, 2).unwrap();
        let (read, w, h) = read_image(path, 1.0).unwrap();
        assert_eq!((w, h), (2, 2));
        for (a, b) in pixels.iter().zip(read.iter()) {
            assert!((a.r - b.r).abs() < 1e-4);
            assert!((a.g - b.g).abs() < 1e-4);
            assert!((a.b - b.b).abs() < 1e-4);
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_image("/nonexistent/image.exr", 1.0).is_err());
        assert!(read_image("plainfile", 1.0).is_err());
    }

    #[test]
    fn srgb_encoding_endpoints() {
        assert_eq!(encode_srgb(0.0), 0);
        assert_eq!(encode_srgb(1.0), 255);
        assert_eq!(encode_srgb(2.0), 255);
    }
}
