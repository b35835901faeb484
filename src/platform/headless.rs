//! Windowless backend
//!
//! Records draw calls instead of rasterizing, replays a scripted key
//! timeline, and advances time by a fixed step. Used by the native binary
//! and by tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::Vec2;

use super::{Backend, Color, Key, Rect, TextureSize};
use crate::error::AssetError;

/// Texture handle that only knows its size
#[derive(Debug)]
pub struct HeadlessTexture {
    pub path: String,
    width: u32,
    height: u32,
    live: Rc<Cell<usize>>,
}

impl TextureSize for HeadlessTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for HeadlessTexture {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Texture {
        path: String,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        font_size: i32,
        color: Color,
    },
}

pub struct HeadlessBackend {
    pub width: u32,
    pub height: u32,
    pub title: String,
    asset_root: PathBuf,
    /// In-memory images by path, checked before the filesystem
    images: HashMap<String, (u32, u32)>,
    /// Keys pressed on a given frame index
    script: HashMap<u64, Vec<Key>>,
    frame: u64,
    frame_time: f32,
    max_frames: Option<u64>,
    /// Draw calls of the current (or last finished) frame
    commands: Vec<DrawCommand>,
    closed: bool,
    live_textures: Rc<Cell<usize>>,
}

impl HeadlessBackend {
    /// Open a virtual window running at 60 fps
    pub fn open(width: u32, height: u32, title: &str) -> Self {
        log::info!("Opened headless window {}x{} \"{}\"", width, height, title);
        Self {
            width,
            height,
            title: title.to_string(),
            asset_root: PathBuf::from("."),
            images: HashMap::new(),
            script: HashMap::new(),
            frame: 0,
            frame_time: 1.0 / 60.0,
            max_frames: None,
            commands: Vec::new(),
            closed: false,
            live_textures: Rc::new(Cell::new(0)),
        }
    }

    /// Resolve texture paths relative to `root`
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_frame_time(mut self, dt: f32) -> Self {
        self.frame_time = dt;
        self
    }

    /// Request close after `frames` presented frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Serve `path` from memory with the given size
    pub fn register_image(&mut self, path: &str, width: u32, height: u32) {
        self.images.insert(path.to_string(), (width, height));
    }

    /// Report `key` as pressed during frame `frame`
    pub fn press_at(&mut self, frame: u64, key: Key) {
        self.script.entry(frame).or_default().push(key);
    }

    pub fn frames_presented(&self) -> u64 {
        self.frame
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Textures handed out and not yet dropped
    pub fn live_textures(&self) -> usize {
        self.live_textures.get()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn read_dimensions(&self, path: &str) -> Result<(u32, u32), AssetError> {
        if let Some(&size) = self.images.get(path) {
            return Ok(size);
        }

        let full = resolve(&self.asset_root, path);
        image::image_dimensions(&full).map_err(|e| match e {
            image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                AssetError::NotFound {
                    path: path.to_string(),
                }
            }
            other => AssetError::Decode {
                path: path.to_string(),
                reason: other.to_string(),
            },
        })
    }
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    root.join(path.trim_start_matches("./"))
}

impl Backend for HeadlessBackend {
    type Texture = HeadlessTexture;

    fn load_texture(&mut self, path: &str) -> Result<HeadlessTexture, AssetError> {
        let (width, height) = self.read_dimensions(path)?;
        self.live_textures.set(self.live_textures.get() + 1);
        Ok(HeadlessTexture {
            path: path.to_string(),
            width,
            height,
            live: Rc::clone(&self.live_textures),
        })
    }

    fn begin_frame(&mut self, clear: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(clear));
    }

    fn draw_texture(
        &mut self,
        texture: &HeadlessTexture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.commands.push(DrawCommand::Texture {
            path: texture.path.clone(),
            source,
            dest,
            origin,
            rotation,
            tint,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect { pos, size, color });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: i32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
    }

    fn end_frame(&mut self) {
        self.frame += 1;
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.script
            .get(&self.frame)
            .is_some_and(|keys| keys.contains(&key))
    }

    fn frame_time(&self) -> f32 {
        self.frame_time
    }

    fn should_close(&self) -> bool {
        self.closed || self.max_frames.is_some_and(|max| self.frame >= max)
    }

    fn close(&mut self) {
        if !self.closed {
            log::info!("Closing headless window after {} frames", self.frame);
        }
        self.closed = true;
    }
}
