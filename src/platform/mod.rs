//! Platform abstraction layer
//!
//! The game talks to windowing, input, timing and drawing through the
//! [`Backend`] trait:
//! - Texture loading with a validity check
//! - Textured quads, circles, rectangles, text
//! - Edge-triggered key polling and frame delta time
//! - Frame bracketing and window lifecycle

pub mod headless;

pub use headless::{DrawCommand, HeadlessBackend, HeadlessTexture};

use glam::Vec2;

use crate::error::AssetError;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    S,
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "s" | "S" => Some(Key::S),
            " " => Some(Key::Space),
            _ => None,
        }
    }
}

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const RED: Color = Color::rgba(230, 41, 55, 255);
    pub const DARKGRAY: Color = Color::rgba(80, 80, 80, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized `[r, g, b, a]`
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Pixel dimensions of a loaded texture
pub trait TextureSize {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// A texture with no pixels cannot be drawn
    fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Rendering/input backend
///
/// Constructing a backend opens the window. Textures are released when the
/// returned handles are dropped.
pub trait Backend {
    type Texture: TextureSize;

    /// Load an image file as a texture
    fn load_texture(&mut self, path: &str) -> Result<Self::Texture, AssetError>;

    fn begin_frame(&mut self, clear: Color);

    /// Draw `source` (texel space) of `texture` into `dest`, rotated by
    /// `rotation` degrees around `origin` (relative to the dest top-left)
    fn draw_texture(
        &mut self,
        texture: &Self::Texture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    );

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Color);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: i32, color: Color);

    /// Finish drawing and present
    fn end_frame(&mut self);

    /// True only on the frame `key` went down
    fn key_pressed(&self, key: Key) -> bool;

    /// Seconds since the previous frame
    fn frame_time(&self) -> f32;

    fn should_close(&self) -> bool;

    fn close(&mut self);
}
