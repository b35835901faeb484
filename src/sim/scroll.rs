//! Horizontally tiled, endlessly scrolling layer (background, base)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SCROLL_WRAP_TILES;

/// A texture strip that scrolls left and wraps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollingLayer {
    /// Scroll offset of the first tile; always in `(-tile_width * 1.5, 0]`
    pub pos_x: f32,
    pub pos_y: f32,
    /// Pixels per second
    pub scroll_speed: f32,
    /// Scaled tile size
    pub tile_size: Vec2,
}

impl ScrollingLayer {
    /// `tile_size` is the on-screen (already scaled) size of one copy
    pub fn new(tile_size: Vec2, pos_y: f32, scroll_speed: f32) -> Self {
        Self {
            pos_x: 0.0,
            pos_y,
            scroll_speed,
            tile_size,
        }
    }

    #[inline]
    pub fn tile_width(&self) -> f32 {
        self.tile_size.x
    }

    /// Offset at (or below) which the layer snaps back to 0
    pub fn wrap_threshold(&self) -> f32 {
        -self.tile_width() * SCROLL_WRAP_TILES
    }

    /// Scroll left by `speed * dt`, snapping back to 0 past the threshold
    pub fn advance(&mut self, dt: f32) {
        self.pos_x -= self.scroll_speed * dt;
        if self.pos_x <= self.wrap_threshold() {
            self.pos_x = 0.0;
        }
    }

    /// Number of tile copies drawn across `viewport_width`
    pub fn tile_count(&self, viewport_width: f32) -> usize {
        let tile = self.tile_width();
        if !(tile > 0.0) {
            return 0;
        }
        // Never more copies than a one-pixel tile would need
        let limit = (viewport_width.max(0.0).ceil() as usize).saturating_add(1);
        ((viewport_width / tile).ceil() as usize)
            .saturating_add(1)
            .min(limit)
    }

    /// Left edge of each tile copy, left to right
    pub fn tile_positions(&self, viewport_width: f32) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.tile_count(viewport_width))
            .map(move |i| Vec2::new(self.pos_x + i as f32 * self.tile_width(), self.pos_y))
    }
}
