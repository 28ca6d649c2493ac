//! In-memory RGBA8 pixel buffer with line, rectangle and sprite drawing.
//!
//! All drawing takes signed coordinates and clips silently, so callers can
//! draw glyphs that hang off the edge of the window.

use flowfield_core::{Rect, SimError, Srgb};

use crate::pixel::{blend_over, opaque, Rgba};
use crate::sprite::Sprite;

/// A `width x height` RGBA8 image, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Framebuffer {
    /// Creates a transparent black buffer.
    ///
    /// Returns `SimError::InvalidDimensions` if either dimension is zero or
    /// the byte length overflows or cannot be allocated.
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(SimError::InvalidDimensions)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SimError::InvalidDimensions)?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Fills every pixel with an opaque color.
    pub fn clear(&mut self, color: Srgb) {
        let px = opaque(color);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Writes one pixel; coordinates outside the buffer are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, px: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&px);
        }
    }

    /// Draws an inclusive one-pixel line with Bresenham's algorithm.
    ///
    /// The segment is first clipped to a one-pixel margin around the buffer,
    /// so the walk never leaves it by more than a step however far the
    /// endpoints lie outside.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Srgb) {
        let px = opaque(color);
        let Some(((mut x, mut y), (x1, y1))) = self.clip_segment(x0, y0, x1, y1) else {
            return;
        };
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if let Some(i) = self.offset_i64(x, y) {
                self.data[i..i + 4].copy_from_slice(&px);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draws the one-pixel border of `rect`.
    pub fn draw_rect_outline(&mut self, rect: Rect, color: Srgb) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        let right = rect.x.saturating_add(rect.w as i32 - 1);
        let bottom = rect.y.saturating_add(rect.h as i32 - 1);
        self.draw_line(rect.x, rect.y, right, rect.y, color);
        self.draw_line(rect.x, bottom, right, bottom, color);
        self.draw_line(rect.x, rect.y, rect.x, bottom, color);
        self.draw_line(right, rect.y, right, bottom, color);
    }

    /// Stretches `sprite` over `rect` with nearest-neighbor sampling,
    /// compositing with its alpha.
    pub fn blit(&mut self, sprite: &Sprite, rect: Rect) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        for dy in 0..rect.h {
            let sy = (dy as usize * sprite.height()) / rect.h as usize;
            for dx in 0..rect.w {
                let sx = (dx as usize * sprite.width()) / rect.w as usize;
                let Some(i) = self.offset(rect.x + dx as i32, rect.y + dy as i32) else {
                    continue;
                };
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                let out = blend_over(dst, sprite.texel(sx, sy));
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        self.offset_i64(i64::from(x), i64::from(y))
    }

    fn offset_i64(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((y * self.width + x) * 4)
    }

    /// Liang-Barsky clip of a segment against `[-1, width] x [-1, height]`.
    ///
    /// Endpoints inside the region are returned unchanged; clipped ones are
    /// rounded to the nearest pixel. `None` if the segment misses the region.
    fn clip_segment(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    ) -> Option<((i64, i64), (i64, i64))> {
        let (fx0, fy0) = (f64::from(x0), f64::from(y0));
        let (dx, dy) = (f64::from(x1) - fx0, f64::from(y1) - fy0);
        let (xmax, ymax) = (self.width as f64, self.height as f64);
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [
            (-dx, fx0 + 1.0),
            (dx, xmax - fx0),
            (-dy, fy0 + 1.0),
            (dy, ymax - fy0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        let at = |t: f64| {
            (
                (fx0 + t * dx).round() as i64,
                (fy0 + t * dy).round() as i64,
            )
        };
        let start = if t0 > 0.0 {
            at(t0)
        } else {
            (i64::from(x0), i64::from(y0))
        };
        let end = if t1 < 1.0 {
            at(t1)
        } else {
            (i64::from(x1), i64::from(y1))
        };
        Some((start, end))
    }
}
