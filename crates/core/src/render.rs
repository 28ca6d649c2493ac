//! The drawing and timing capabilities the driver needs from a window.
//!
//! Window creation, texture loading and presentation belong to whatever
//! backend implements [`RenderContext`]. The core only draws lines and
//! rectangles, reads a millisecond clock and asks whether to quit.

use crate::color::Srgb;

/// Integer pixel rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// A `size x size` square centered on `(cx, cy)`.
    pub const fn centered(cx: i32, cy: i32, size: u32) -> Self {
        let half = (size / 2) as i32;
        Self::new(cx - half, cy - half, size, size)
    }
}

/// How a rectangle is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RectStyle {
    /// One-pixel border in the given color.
    Outline(Srgb),
    /// The context's particle texture, stretched to the rectangle.
    Sprite,
}

/// A frame-based drawing surface with a clock and an input queue.
pub trait RenderContext {
    /// Monotonic milliseconds since the context was created.
    fn current_tick(&self) -> u64;

    /// Drains pending input and reports whether the user asked to quit.
    fn poll_quit(&mut self) -> bool;

    /// Fills the whole back buffer.
    fn clear(&mut self, color: Srgb);

    /// Draws a one-pixel line between two points, inclusive.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Srgb);

    /// Draws a rectangle.
    fn draw_rect(&mut self, rect: Rect, style: RectStyle);

    /// Shows the back buffer.
    fn present(&mut self);

    /// Blocks for roughly `ms` milliseconds.
    fn delay(&mut self, ms: u64);
}

/// Caps the frame rate by delaying until a minimum frame time has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimiter {
    min_frame_ms: u64,
}

impl FrameLimiter {
    /// A limiter for `fps` frames per second; 0 disables the cap.
    ///
    /// The minimum frame time is `1000 / fps` whole milliseconds.
    pub fn new(fps: u32) -> Self {
        let min_frame_ms = if fps == 0 { 0 } else { 1000 / u64::from(fps) };
        Self { min_frame_ms }
    }

    /// Minimum time a frame takes, in milliseconds.
    pub fn min_frame_ms(&self) -> u64 {
        self.min_frame_ms
    }

    /// Delays in 1 ms slices until `min_frame_ms` has elapsed since
    /// `frame_start`.
    pub fn wait<C: RenderContext + ?Sized>(&self, ctx: &mut C, frame_start: u64) {
        while ctx.current_tick().saturating_sub(frame_start) < self.min_frame_ms {
            ctx.delay(1);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::ScriptedContext;
    use super::*;

    #[test]
    fn sixty_hz_waits_sixteen_milliseconds() {
        assert_eq!(FrameLimiter::new(60).min_frame_ms(), 16);
        assert_eq!(FrameLimiter::new(30).min_frame_ms(), 33);
        assert_eq!(FrameLimiter::new(0).min_frame_ms(), 0);
    }

    #[test]
    fn wait_delays_until_frame_time_elapsed() {
        let mut ctx = ScriptedContext {
            tick: 100,
            ..ScriptedContext::default()
        };
        FrameLimiter::new(60).wait(&mut ctx, 100);
        assert_eq!(ctx.tick, 116);
        assert_eq!(ctx.delays, 16);
    }

    #[test]
    fn wait_is_immediate_when_frame_already_slow() {
        let mut ctx = ScriptedContext {
            tick: 150,
            ..ScriptedContext::default()
        };
        FrameLimiter::new(60).wait(&mut ctx, 100);
        assert_eq!(ctx.delays, 0);
    }

    #[test]
    fn uncapped_limiter_never_delays() {
        let mut ctx = ScriptedContext::default();
        FrameLimiter::new(0).wait(&mut ctx, 0);
        assert_eq!(ctx.delays, 0);
    }

    #[test]
    fn centered_rect_surrounds_point() {
        assert_eq!(Rect::centered(100, 50, 30), Rect::new(85, 35, 30, 30));
    }
}
