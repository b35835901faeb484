//! Sprite loading
//!
//! Textures are owned here and only lent out (the bird frames as a slice) for
//! drawing. A failed load drops everything acquired so far, so no exit path
//! leaks a texture.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::platform::{Backend, TextureSize};

/// Relative image paths, read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub background: String,
    pub base: String,
    /// Flap cycle in display order
    pub bird_frames: Vec<String>,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            background: "./assets/sprites/background-day.png".to_string(),
            base: "./assets/sprites/base.png".to_string(),
            bird_frames: vec![
                "./assets/sprites/bluebird-upflap.png".to_string(),
                "./assets/sprites/bluebird-midflap.png".to_string(),
                "./assets/sprites/bluebird-downflap.png".to_string(),
            ],
        }
    }
}

impl AssetPaths {
    /// Every path that `GameAssets::load` will request, in load order
    pub fn all(&self, with_layers: bool) -> Vec<&str> {
        let layers = [self.background.as_str(), self.base.as_str()];
        let layers = if with_layers { &layers[..] } else { &[] };
        layers
            .iter()
            .copied()
            .chain(self.bird_frames.iter().map(String::as_str))
            .collect()
    }
}

/// All textures the game draws
#[derive(Debug)]
pub struct GameAssets<T> {
    pub background: Option<T>,
    pub base: Option<T>,
    pub bird_frames: Vec<T>,
}

impl<T: TextureSize> GameAssets<T> {
    /// Load and validate every sprite, stopping at the first failure
    pub fn load<B>(backend: &mut B, paths: &AssetPaths, with_layers: bool) -> Result<Self, AssetError>
    where
        B: Backend<Texture = T>,
    {
        if paths.bird_frames.is_empty() {
            return Err(AssetError::Invalid {
                path: "bird_frames".to_string(),
            });
        }

        let (background, base) = if with_layers {
            let background = load_one(backend, &paths.background, "background")?;
            let base = load_one(backend, &paths.base, "base")?;
            (Some(background), Some(base))
        } else {
            (None, None)
        };

        let mut bird_frames = Vec::with_capacity(paths.bird_frames.len());
        for (i, path) in paths.bird_frames.iter().enumerate() {
            bird_frames.push(load_one(backend, path, &format!("bird frame {i}"))?);
        }

        Ok(Self {
            background,
            base,
            bird_frames,
        })
    }

    /// Unscaled size of the first bird frame
    pub fn bird_size(&self) -> Vec2 {
        self.bird_frames
            .first()
            .map(TextureSize::size)
            .unwrap_or(Vec2::ZERO)
    }
}

fn load_one<B: Backend>(backend: &mut B, path: &str, what: &str) -> Result<B::Texture, AssetError> {
    let texture = backend
        .load_texture(path)
        .inspect_err(|e| log::error!("Failed to load {} texture: {}", what, e))?;

    if !texture.is_valid() {
        log::error!("Failed to load {} texture: {} is empty", what, path);
        return Err(AssetError::Invalid {
            path: path.to_string(),
        });
    }

    log::info!("Loaded {} texture successfully.", what);
    Ok(texture)
}
