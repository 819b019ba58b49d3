//! FILENAME: core/charts/src/canvas.rs
//! PURPOSE: Minimal raster drawing on top of `image::RgbImage`.
//! CONTEXT: All coordinates are signed so shapes may be partially off
//! canvas; every write is clipped to the image bounds.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::error::RenderError;
use crate::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

pub type Color = Rgb<u8>;

pub const WHITE: Color = Rgb([255, 255, 255]);
pub const BLACK: Color = Rgb([0, 0, 0]);
pub const AXIS: Color = Rgb([64, 64, 64]);
pub const GRID: Color = Rgb([225, 225, 225]);
pub const TEXT: Color = Rgb([38, 38, 38]);

/// Horizontal text alignment relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Creates a white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fills the rectangle with top-left (x, y); negative sizes are normalized.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let (x0, x1) = if w < 0 { (x + w, x) } else { (x, x + w) };
        let (y0, y1) = if h < 0 { (y + h, y) } else { (y, y + h) };
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.image.width() as i32);
        let y1 = y1.min(self.image.height() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        self.fill_rect(x0.min(x1), y, (x1 - x0).abs() + 1, 1, color);
    }

    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Color) {
        self.fill_rect(x, y0.min(y1), 1, (y1 - y0).abs() + 1, color);
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 + 0.5 - cx;
                let dy = py as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Draws a thick segment by stamping discs along it.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), thickness: f64, color: Color) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = (dx.abs().max(dy.abs()) * 2.0).ceil().max(1.0) as usize;
        let radius = (thickness / 2.0).max(0.5);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.fill_circle(from.0 + dx * t, from.1 + dy * t, radius, color);
        }
    }

    /// Draws horizontal text, folded to ASCII. `y` is the top of the glyphs.
    pub fn text(&mut self, x: i32, y: i32, text: &str, scale: u32, align: Align, color: Color) {
        let width = font::text_width(text, scale) as i32;
        let start = match align {
            Align::Left => x,
            Align::Center => x - width / 2,
            Align::Right => x - width,
        };
        let s = scale as i32;
        for (i, c) in font::fold_ascii(text).chars().enumerate() {
            let glyph = font::glyph(c);
            let gx = start + (i as u32 * ADVANCE) as i32 * s;
            for col in 0..GLYPH_WIDTH {
                for row in 0..GLYPH_HEIGHT {
                    if font::pixel_set(glyph, col, row) {
                        self.fill_rect(gx + col as i32 * s, y + row as i32 * s, s, s, color);
                    }
                }
            }
        }
    }

    /// Draws text rotated a quarter turn counter-clockwise, reading upward
    /// from (x, y_bottom). Glyph tops face left.
    pub fn text_vertical(&mut self, x: i32, y_bottom: i32, text: &str, scale: u32, color: Color) {
        let s = scale as i32;
        for (i, c) in font::fold_ascii(text).chars().enumerate() {
            let glyph = font::glyph(c);
            let offset = (i as u32 * ADVANCE) as i32;
            for col in 0..GLYPH_WIDTH {
                for row in 0..GLYPH_HEIGHT {
                    if font::pixel_set(glyph, col, row) {
                        let px = x + row as i32 * s;
                        let py = y_bottom - (offset + col as i32 + 1) * s;
                        self.fill_rect(px, py, s, s, color);
                    }
                }
            }
        }
    }

    /// Encodes the canvas as PNG.
    pub fn into_png(self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(self.image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        *self.image.get_pixel(x, y)
    }
}
