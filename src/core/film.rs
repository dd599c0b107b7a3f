//! Film

#![allow(dead_code)]

use crate::core::color::*;
use crate::core::common::*;
use crate::core::filter::*;
use crate::core::image_io;
use crate::core::sampler::*;
use std::sync::Mutex;

/// A film pixel accumulating a filter-weighted radiance sum and the filter
/// weight sum separately.
#[derive(Copy, Clone, Default)]
pub struct Pixel {
    /// Weighted radiance sum.
    pub color: Color,

    /// Sum of filter weights.
    pub weight: Float,
}

/// The image sensing plane: a rectangular pixel buffer, optionally cropped,
/// reconstructing the image from samples under a filter.
pub struct Film {
    /// Full image resolution in x.
    pub x_res: usize,

    /// Full image resolution in y.
    pub y_res: usize,

    /// Crop window `[x0, x1, y0, y1]` in NDC [0, 1].
    crop: [Float; 4],

    /// The reconstruction filter.
    filter: ArcFilter,

    /// Output image filename.
    filename: String,

    /// First pixel column of the cropped window.
    x_start: i32,

    /// First pixel row of the cropped window.
    y_start: i32,

    /// Cropped window width.
    x_count: usize,

    /// Cropped window height.
    y_count: usize,

    /// Cropped pixel storage; tiles merge into this under the lock.
    pixels: Mutex<Vec<Pixel>>,
}

impl Film {
    /// Create a new `Film`.
    ///
    /// * `x_res`    - Full image resolution in x.
    /// * `y_res`    - Full image resolution in y.
    /// * `crop`     - Crop window `[x0, x1, y0, y1]` in NDC [0, 1].
    /// * `filter`   - The reconstruction filter.
    /// * `filename` - Output image filename.
    pub fn new(
        x_res: usize,
        y_res: usize,
        crop: [Float; 4],
        filter: ArcFilter,
        filename: &str,
    ) -> Self {
        let x_start = (x_res as Float * clamp(crop[0], 0.0, 1.0)).ceil() as i32;
        let x_end = (x_res as Float * clamp(crop[1], crop[0], 1.0)).ceil() as i32;
        let y_start = (y_res as Float * clamp(crop[2], 0.0, 1.0)).ceil() as i32;
        let y_end = (y_res as Float * clamp(crop[3], crop[2], 1.0)).ceil() as i32;
        let x_count = max(1, x_end - x_start) as usize;
        let y_count = max(1, y_end - y_start) as usize;

        Self {
            x_res,
            y_res,
            crop,
            filter,
            filename: String::from(filename),
            x_start,
            y_start,
            x_count,
            y_count,
            pixels: Mutex::new(vec![Pixel::default(); x_count * y_count]),
        }
    }

    /// Returns the sample window `(x_start, x_end, y_start, y_end)` the
    /// sampler must cover: the cropped pixel window extended by the filter
    /// support so edge pixels are fully reconstructed.
    pub fn sample_range(&self) -> (i32, i32, i32, i32) {
        let data = self.filter.get_data();
        (
            (self.x_start as Float + 0.5 - data.x_width).floor() as i32,
            (self.x_start as Float + self.x_count as Float - 0.5 + data.x_width).ceil() as i32,
            (self.y_start as Float + 0.5 - data.y_width).floor() as i32,
            (self.y_start as Float + self.y_count as Float - 0.5 + data.y_width).ceil() as i32,
        )
    }

    /// Returns a film tile covering the given pixel window, extended by the
    /// filter support.
    ///
    /// * `x0` - First pixel column.
    /// * `x1` - One past the last pixel column.
    /// * `y0` - First pixel row.
    /// * `y1` - One past the last pixel row.
    pub fn tile(&self, x0: i32, x1: i32, y0: i32, y1: i32) -> FilmTile {
        let data = self.filter.get_data();
        let tx0 = max(self.x_start, (x0 as Float + 0.5 - data.x_width).floor() as i32);
        let tx1 = min(
            self.x_start + self.x_count as i32,
            (x1 as Float - 0.5 + data.x_width).ceil() as i32,
        );
        let ty0 = max(self.y_start, (y0 as Float + 0.5 - data.y_width).floor() as i32);
        let ty1 = min(
            self.y_start + self.y_count as i32,
            (y1 as Float - 0.5 + data.y_width).ceil() as i32,
        );
        FilmTile::new(tx0, tx1, ty0, ty1, self.filter.clone())
    }

    /// Merge a finished tile's pixels into the film.
    ///
    /// * `tile` - The tile.
    pub fn merge_tile(&self, tile: &FilmTile) {
        let mut pixels = self.pixels.lock().unwrap();
        for ty in tile.y0..tile.y1 {
            for tx in tile.x0..tile.x1 {
                let src = &tile.pixels[tile.index(tx, ty)];
                let dst_x = tx - self.x_start;
                let dst_y = ty - self.y_start;
                if dst_x < 0
                    || dst_y < 0
                    || dst_x >= self.x_count as i32
                    || dst_y >= self.y_count as i32
                {
                    continue;
                }
                let dst = &mut pixels[dst_y as usize * self.x_count + dst_x as usize];
                dst.color += src.color;
                dst.weight += src.weight;
            }
        }
    }

    /// Splat a sample into the film directly, bypassing tiles.
    ///
    /// * `sample` - The pixel sample.
    /// * `color`  - The radiance estimate for the sample.
    pub fn add_sample(&self, sample: &Sample, color: Color) {
        let mut tile = FilmTile::new(
            self.x_start,
            self.x_start + self.x_count as i32,
            self.y_start,
            self.y_start + self.y_count as i32,
            self.filter.clone(),
        );
        tile.add_sample(sample, color);
        self.merge_tile(&tile);
    }

    /// Returns the normalized color of a pixel in cropped window coordinates.
    /// Pixels that received no samples are black.
    ///
    /// * `x` - Pixel column inside the cropped window.
    /// * `y` - Pixel row inside the cropped window.
    pub fn pixel_color(&self, x: usize, y: usize) -> Color {
        let pixels = self.pixels.lock().unwrap();
        let p = &pixels[y * self.x_count + x];
        if p.weight > 0.0 {
            (p.color / p.weight).clamp_negative()
        } else {
            Color::BLACK
        }
    }

    /// Returns the cropped window size `(width, height)`.
    pub fn cropped_size(&self) -> (usize, usize) {
        (self.x_count, self.y_count)
    }

    /// Returns the output image filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Normalize the accumulated samples and write the image out.
    pub fn write_image(&self) -> Result<(), String> {
        let colors: Vec<Color> = {
            let pixels = self.pixels.lock().unwrap();
            pixels
                .iter()
                .map(|p| {
                    if p.weight > 0.0 {
                        (p.color / p.weight).clamp_negative()
                    } else {
                        Color::BLACK
                    }
                })
                .collect()
        };
        info!(
            "Writing {}x{} image to {}",
            self.x_count, self.y_count, self.filename
        );
        image_io::write_image(&self.filename, &colors, self.x_count, self.y_count)
    }
}

/// A private film rectangle rendered by one worker and merged into the film
/// when finished.
pub struct FilmTile {
    /// First pixel column.
    pub x0: i32,

    /// One past the last pixel column.
    pub x1: i32,

    /// First pixel row.
    pub y0: i32,

    /// One past the last pixel row.
    pub y1: i32,

    /// The reconstruction filter.
    filter: ArcFilter,

    /// Tile pixel storage.
    pixels: Vec<Pixel>,
}

impl FilmTile {
    /// Create a new `FilmTile` over the given pixel window.
    ///
    /// * `x0`     - First pixel column.
    /// * `x1`     - One past the last pixel column.
    /// * `y0`     - First pixel row.
    /// * `y1`     - One past the last pixel row.
    /// * `filter` - The reconstruction filter.
    pub fn new(x0: i32, x1: i32, y0: i32, y1: i32, filter: ArcFilter) -> Self {
        let w = max(0, x1 - x0) as usize;
        let h = max(0, y1 - y0) as usize;
        Self {
            x0,
            x1,
            y0,
            y1,
            filter,
            pixels: vec![Pixel::default(); w * h],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        let w = (self.x1 - self.x0) as usize;
        (y - self.y0) as usize * w + (x - self.x0) as usize
    }

    /// Splat a sample into every pixel whose filter support contains it.
    ///
    /// * `sample` - The pixel sample.
    /// * `color`  - The radiance estimate for the sample.
    pub fn add_sample(&mut self, sample: &Sample, color: Color) {
        if color.has_nans() {
            warn!(
                "NaN radiance at sample ({}, {}), discarding",
                sample.img_x, sample.img_y
            );
            return;
        }

        let data = self.filter.get_data();
        // Pixel p has its center at p + 0.5 in continuous film space.
        let x_min = max(self.x0, (sample.img_x - 0.5 - data.x_width).ceil() as i32);
        let x_max = min(self.x1 - 1, (sample.img_x - 0.5 + data.x_width).floor() as i32);
        let y_min = max(self.y0, (sample.img_y - 0.5 - data.y_width).ceil() as i32);
        let y_max = min(self.y1 - 1, (sample.img_y - 0.5 + data.y_width).floor() as i32);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let w = self.filter.evaluate(
                    x as Float + 0.5 - sample.img_x,
                    y as Float + 0.5 - sample.img_y,
                );
                if w == 0.0 {
                    continue;
                }
                let idx = self.index(x, y);
                let pixel = &mut self.pixels[idx];
                pixel.color += color * w;
                pixel.weight += w;
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::BoxFilter;
    use std::sync::Arc;

    fn sample_at(x: Float, y: Float) -> Sample {
        Sample {
            img_x: x,
            img_y: y,
            ..Default::default()
        }
    }

    fn box_film(x_res: usize, y_res: usize) -> Film {
        Film::new(
            x_res,
            y_res,
            [0.0, 1.0, 0.0, 1.0],
            Arc::new(BoxFilter::new(0.5, 0.5)),
            "out.png",
        )
    }

    #[test]
    fn box_filter_splat_lands_in_one_pixel() {
        let film = box_film(4, 4);
        film.add_sample(&sample_at(1.5, 2.5), Color::new(2.0, 0.0, 0.0));
        assert_eq!(film.pixel_color(1, 2), Color::new(2.0, 0.0, 0.0));
        assert_eq!(film.pixel_color(0, 0), Color::BLACK);
    }

    #[test]
    fn weights_normalize_out() {
        let film = box_film(2, 2);
        film.add_sample(&sample_at(0.25, 0.25), Color::new(1.0, 1.0, 1.0));
        film.add_sample(&sample_at(0.75, 0.75), Color::new(3.0, 3.0, 3.0));
        assert_eq!(film.pixel_color(0, 0), Color::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn negative_radiance_is_clamped_on_output() {
        let film = box_film(1, 1);
        film.add_sample(&sample_at(0.5, 0.5), Color::new(-1.0, 0.5, 0.0));
        assert_eq!(film.pixel_color(0, 0), Color::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn crop_window_limits_pixel_storage() {
        let film = Film::new(
            8,
            8,
            [0.25, 0.75, 0.5, 1.0],
            Arc::new(BoxFilter::new(0.5, 0.5)),
            "out.png",
        );
        assert_eq!(film.cropped_size(), (4, 4));
        let (xs, xe, ys, ye) = film.sample_range();
        assert!(xs <= 2 && xe >= 6 && ys <= 4 && ye >= 8);
    }

    #[test]
    fn tile_merge_matches_direct_splat() {
        let direct = box_film(4, 4);
        direct.add_sample(&sample_at(2.5, 1.5), Color::WHITE);

        let tiled = box_film(4, 4);
        let mut tile = tiled.tile(2, 4, 0, 2);
        tile.add_sample(&sample_at(2.5, 1.5), Color::WHITE);
        tiled.merge_tile(&tile);

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(direct.pixel_color(x, y), tiled.pixel_color(x, y));
            }
        }
    }
}
