use std::io::Cursor;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};

use super::input::SurfacePoint;

const BLANK: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Transparent pixel buffer that strokes are rasterized into.
pub struct StrokeCanvas {
    pixels: RgbaImage,
    ink: Rgba<u8>,
    stroke_width: f32,
}

impl StrokeCanvas {
    pub fn new(width: u32, height: u32, stroke_width: f32, ink: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, BLANK),
            ink,
            stroke_width,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Paints the capsule around `from`→`to`: a line of the stroke width with
    /// round ends, so consecutive segments also meet in a round join. Edge
    /// pixels get partial alpha; overlaps keep the stronger coverage.
    ///
    /// Returns whether any pixel received coverage.
    pub fn draw_segment(&mut self, from: SurfacePoint, to: SurfacePoint) -> bool {
        if !from.is_finite() || !to.is_finite() {
            return false;
        }
        if self.pixels.width() == 0 || self.pixels.height() == 0 {
            return false;
        }

        let radius = self.stroke_width / 2.0;
        let reach = radius + 1.0;
        let width = self.pixels.width() as f32;
        let height = self.pixels.height() as f32;

        let min_x = from.x.min(to.x) - reach;
        let max_x = from.x.max(to.x) + reach;
        let min_y = from.y.min(to.y) - reach;
        let max_y = from.y.max(to.y) + reach;

        if max_x < 0.0 || max_y < 0.0 || min_x >= width || min_y >= height {
            return false;
        }

        let x0 = min_x.floor().max(0.0) as u32;
        let x1 = max_x.ceil().min(width - 1.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let y1 = max_y.ceil().min(height - 1.0) as u32;

        let ink_alpha = f32::from(self.ink[3]);
        let mut painted = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = SurfacePoint::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_segment(center, from, to);
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }

                let alpha = (coverage * ink_alpha).round() as u8;
                if alpha == 0 {
                    continue;
                }
                painted = true;
                let pixel = self.pixels.get_pixel_mut(x, y);
                if alpha > pixel[3] {
                    *pixel = Rgba([self.ink[0], self.ink[1], self.ink[2], alpha]);
                }
            }
        }
        painted
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = BLANK;
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("failed to encode signature as PNG")?;
        Ok(bytes)
    }

    pub fn to_data_uri(&self) -> Result<String> {
        let png = self.to_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

fn distance_to_segment(point: SurfacePoint, a: SurfacePoint, b: SurfacePoint) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;

    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((point.x - a.x) * dx + (point.y - a.y) * dy) / length_sq).clamp(0.0, 1.0)
    };

    let nearest_x = a.x + t * dx;
    let nearest_y = a.y + t * dy;
    ((point.x - nearest_x).powi(2) + (point.y - nearest_y).powi(2)).sqrt()
}
