//! A [`RenderContext`] that draws into memory instead of a window.

use std::time::{Duration, Instant};

use flowfield_core::{Rect, RectStyle, RenderContext, SimError, Srgb};

use crate::framebuffer::Framebuffer;
use crate::sprite::Sprite;

/// Diameter of the built-in particle sprite.
const DEFAULT_SPRITE_DIAMETER: usize = 32;

/// Double-buffered software context with a wall clock.
///
/// Drawing goes to the back buffer; [`RenderContext::present`] copies it to
/// the front buffer. With a frame limit set, the context asks to quit once
/// that many frames have been presented. Without one it never quits.
#[derive(Debug)]
pub struct HeadlessContext {
    back: Framebuffer,
    front: Framebuffer,
    sprite: Sprite,
    epoch: Instant,
    frame_limit: Option<u64>,
    presented: u64,
}

impl HeadlessContext {
    /// Allocates both buffers and the default red disc sprite.
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        let back = Framebuffer::new(width, height)?;
        Ok(Self {
            front: back.clone(),
            back,
            sprite: Sprite::disc(DEFAULT_SPRITE_DIAMETER, Srgb::RED)?,
            epoch: Instant::now(),
            frame_limit: None,
            presented: 0,
        })
    }

    /// Replaces the particle sprite.
    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = sprite;
        self
    }

    /// Quits after `frames` presents.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// The most recently presented frame.
    pub fn presented_frame(&self) -> &Framebuffer {
        &self.front
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl RenderContext for HeadlessContext {
    fn current_tick(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn poll_quit(&mut self) -> bool {
        self.frame_limit.is_some_and(|limit| self.presented >= limit)
    }

    fn clear(&mut self, color: Srgb) {
        self.back.clear(color);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Srgb) {
        self.back.draw_line(x0, y0, x1, y1, color);
    }

    fn draw_rect(&mut self, rect: Rect, style: RectStyle) {
        match style {
            RectStyle::Outline(color) => self.back.draw_rect_outline(rect, color),
            RectStyle::Sprite => self.back.blit(&self.sprite, rect),
        }
    }

    fn present(&mut self) {
        self.front.clone_from(&self.back);
        self.presented += 1;
        tracing::trace!(frame = self.presented, "frame presented");
    }

    fn delay(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
