//! Off-screen canvas with the few primitives the eye patterns need.

// Allow common raster code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use image::{imageops, Rgb, RgbImage};

use super::patterns::Shape;

/// Canvas width (portrait, as drawn).
pub const CANVAS_WIDTH: u32 = 240;
/// Canvas height (portrait, as drawn).
pub const CANVAS_HEIGHT: u32 = 320;

/// Eye colour (cyan).
pub const EYE_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
/// Background colour.
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Persistent drawing surface, mutated in place on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// A blank canvas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            image: RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND),
        }
    }

    /// Resets every pixel to the background colour.
    pub fn clear(&mut self) {
        self.fill(BACKGROUND);
    }

    /// Paints every pixel with `color`.
    pub fn fill(&mut self, color: Rgb<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Draws a pattern shape in the eye colour.
    pub fn draw(&mut self, shape: &Shape) {
        match *shape {
            Shape::Line { from, to, width } => self.line(from, to, width, EYE_COLOR),
            Shape::RoundedRect {
                x,
                y,
                width,
                height,
                radius,
            } => self.rounded_rect(x, y, x + width, y + height, radius, EYE_COLOR),
        }
    }

    /// Draws a straight stroke of `width` pixels with flat ends.
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), width: u32, color: Rgb<u8>) {
        let (x0, y0) = (from.0 as f32, from.1 as f32);
        let (x1, y1) = (to.0 as f32, to.1 as f32);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len = dx.hypot(dy);
        let half = width.max(1) as f32 / 2.0;

        let pad = half.ceil() as i32;
        let min_x = from.0.min(to.0) - pad;
        let max_x = from.0.max(to.0) + pad;
        let min_y = from.1.min(to.1) - pad;
        let max_y = from.1.max(to.1) + pad;

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let (rx, ry) = (px as f32 - x0, py as f32 - y0);
                let inside = if len == 0.0 {
                    rx.hypot(ry) <= half
                } else {
                    // Position along the stroke and distance from its axis
                    let along = (rx * dx + ry * dy) / len;
                    let across = (rx * dy - ry * dx).abs() / len;
                    (0.0..=len).contains(&along) && across <= half
                };
                if inside {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Fills the inclusive rectangle `(x0, y0)-(x1, y1)` with corners rounded
    /// to `radius`.
    pub fn rounded_rect(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        radius: i32,
        color: Rgb<u8>,
    ) {
        if x1 < x0 || y1 < y0 {
            return;
        }
        let r = radius.clamp(0, (x1 - x0).min(y1 - y0) / 2);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let cx = px.clamp(x0 + r, x1 - r);
                let cy = py.clamp(y0 + r, y1 - r);
                let (dx, dy) = (px - cx, py - cy);
                if dx * dx + dy * dy <= r * r {
                    self.put(px, py, color);
                }
            }
        }
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < CANVAS_WIDTH && (y as u32) < CANVAS_HEIGHT {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// The canvas as drawn.
    #[must_use]
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// The canvas rotated 90° counter-clockwise into the display's landscape
    /// mounting (320×240).
    #[must_use]
    pub fn oriented(&self) -> RgbImage {
        imageops::rotate270(&self.image)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
