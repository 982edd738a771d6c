//! Output surfaces the camera draws into.
//!
//! The camera only needs clear/line/polygon operations and a way to hand
//! the finished image back; everything about pixels (or character cells)
//! lives behind [`DrawSurface`]. Coordinates are pixels with the origin
//! at the top-left corner, +Y down; the camera converts from its
//! center-origin projection space before calling in.

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::math::Vector2;

/// A 2D drawing target owned by a camera.
pub trait DrawSurface {
    /// The finished frame handed back by `Camera::render`.
    type Image;

    /// Allocate a surface for the given dimensions.
    fn create(width: u32, height: u32) -> Self;

    fn clear(&mut self, color: Color);

    fn draw_line(&mut self, color: Color, from: Vector2, to: Vector2);

    fn fill_polygon(&mut self, color: Color, points: &[Vector2]);

    fn image(&self) -> &Self::Image;
}

/// Walk the pixels of a line with Bresenham's algorithm, calling `plot`
/// for each. Out-of-range coordinates are the callee's concern.
pub fn rasterize_line(from: Vector2, to: Vector2, mut plot: impl FnMut(i64, i64)) {
    if !from.is_finite() || !to.is_finite() {
        return;
    }
    let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
    let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Even-odd scanline fill. Calls `span(y, x0, x1)` for each horizontal
/// run inside the polygon, restricted to `0..height` rows and clamped to
/// `0..width` columns.
pub fn rasterize_polygon(
    points: &[Vector2],
    width: u32,
    height: u32,
    mut span: impl FnMut(i64, i64, i64),
) {
    if points.len() < 3 || width == 0 || height == 0 {
        return;
    }
    if points.iter().any(|p| !p.is_finite()) {
        return;
    }
    let min_y = points
        .iter()
        .fold(f32::INFINITY, |m, p| m.min(p.y))
        .floor()
        .max(0.0) as i64;
    let max_y = points
        .iter()
        .fold(f32::NEG_INFINITY, |m, p| m.max(p.y))
        .ceil()
        .min((height - 1) as f32) as i64;
    let mut crossings: Vec<f32> = Vec::new();
    for y in min_y..=max_y {
        let scan = y as f32 + 0.5;
        crossings.clear();
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                let t = (scan - a.y) / (b.y - a.y);
                crossings.push(a.x + (b.x - a.x) * t);
            }
        }
        crossings.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));
        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].round().max(0.0) as i64;
            let x1 = pair[1].round().min((width - 1) as f32) as i64;
            if x0 <= x1 {
                span(y, x0, x1);
            }
        }
    }
}

/// RGBA image-buffer surface.
pub struct ImageSurface {
    buffer: RgbaImage,
}

impl ImageSurface {
    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.buffer.width() && (y as u32) < self.buffer.height()
        {
            self.buffer
                .put_pixel(x as u32, y as u32, Rgba([color.r, color.g, color.b, 255]));
        }
    }
}

impl DrawSurface for ImageSurface {
    type Image = RgbaImage;

    fn create(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
        }
    }

    fn clear(&mut self, color: Color) {
        for pixel in self.buffer.pixels_mut() {
            *pixel = Rgba([color.r, color.g, color.b, 255]);
        }
    }

    fn draw_line(&mut self, color: Color, from: Vector2, to: Vector2) {
        rasterize_line(from, to, |x, y| self.put(x, y, color));
    }

    fn fill_polygon(&mut self, color: Color, points: &[Vector2]) {
        let (width, height) = (self.buffer.width(), self.buffer.height());
        rasterize_polygon(points, width, height, |y, x0, x1| {
            for x in x0..=x1 {
                self.put(x, y, color);
            }
        });
    }

    fn image(&self) -> &RgbaImage {
        &self.buffer
    }
}
