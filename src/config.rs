//! Game tuning and variant presets
//!
//! Persisted as JSON: a file on native, LocalStorage on the web.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::AssetPaths;
use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{Bounds, PhysicsParams};

/// Window/scale presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Wide window, 1.5x sprites, scrolling background and base
    #[default]
    Classic,
    /// Small window, 1x sprites, static backdrop
    Compact,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Compact => "Compact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "a" => Some(Variant::Classic),
            "compact" | "b" => Some(Variant::Compact),
            _ => None,
        }
    }
}

/// Placement and speed of one scrolling layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub pos_y: f32,
    /// Pixels per second, leftward
    pub speed: f32,
}

/// Complete game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: Variant,
    pub title: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub scale: f32,

    // === Bird physics ===
    pub gravity: Vec2,
    pub jump_force: Vec2,
    pub velocity_clamp: Bounds,
    pub velocity_damping: f32,
    /// Bird center may not go below `ground_y - radius * scale`
    pub ground_y: f32,
    pub bird_start: Vec2,

    // === Bird visuals ===
    pub frame_duration: f32,
    /// Velocity range mapped onto `tilt_degrees`
    pub tilt_velocity: Bounds,
    pub tilt_degrees: Bounds,

    // === Layers ===
    pub scrolling_layers: bool,
    pub background: LayerConfig,
    pub base: LayerConfig,

    /// Bird center dot and tile seams
    pub show_debug: bool,
    pub assets: AssetPaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_variant(Variant::Classic)
    }
}

impl GameConfig {
    /// Create a config with the preset values for `variant`
    pub fn from_variant(variant: Variant) -> Self {
        let classic = Self {
            variant: Variant::Classic,
            title: "Flappy birds".to_string(),
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            scale: SCALE,

            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            velocity_clamp: Bounds::new(VELOCITY_CLAMP_MIN, VELOCITY_CLAMP_MAX),
            velocity_damping: VELOCITY_DAMPING,
            ground_y: BASE_POS_Y,
            bird_start: Vec2::new(BIRD_START_X, SCREEN_HEIGHT as f32 / 2.0),

            frame_duration: FRAME_DURATION,
            tilt_velocity: Bounds::new(MIN_VELOCITY, MAX_VELOCITY),
            tilt_degrees: Bounds::new(TILT_MIN_DEG, TILT_MAX_DEG),

            scrolling_layers: true,
            background: LayerConfig {
                pos_y: BG_POS_Y,
                speed: BG_SPEED,
            },
            base: LayerConfig {
                pos_y: BASE_POS_Y,
                speed: BASE_SPEED,
            },

            show_debug: false,
            assets: AssetPaths::default(),
        };

        match variant {
            Variant::Classic => classic,
            Variant::Compact => Self {
                variant,
                screen_width: 800,
                screen_height: 600,
                scale: 1.0,
                ground_y: 600.0,
                bird_start: Vec2::new(BIRD_START_X, 300.0),
                scrolling_layers: false,
                ..classic
            },
        }
    }

    /// Physics subset consumed by the simulation
    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            gravity: self.gravity,
            jump_force: self.jump_force,
            velocity_clamp: self.velocity_clamp,
            damping: self.velocity_damping,
            ground_y: self.ground_y,
            scale: self.scale,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(invalid("screen size", "must be non-zero"));
        }
        if !(self.scale.is_finite() && self.scale >= MIN_SCALE) {
            return Err(invalid(
                "scale",
                format!("{} is below {}", self.scale, MIN_SCALE),
            ));
        }
        if !(self.frame_duration > 0.0) {
            return Err(invalid(
                "frame_duration",
                format!("{} is not positive", self.frame_duration),
            ));
        }
        if !(self.velocity_clamp.min < self.velocity_clamp.max) {
            return Err(invalid("velocity_clamp", "min must be below max"));
        }
        if !(self.tilt_velocity.min < self.tilt_velocity.max) {
            return Err(invalid("tilt_velocity", "min must be below max"));
        }
        if !(self.ground_y.is_finite() && self.ground_y > 0.0) {
            return Err(invalid(
                "ground_y",
                format!("{} is not positive", self.ground_y),
            ));
        }
        for (field, layer) in [("background.speed", &self.background), ("base.speed", &self.base)] {
            if !(layer.speed.is_finite() && layer.speed >= 0.0) {
                return Err(invalid(field, format!("{} is not a leftward speed", layer.speed)));
            }
        }
        Ok(())
    }

    /// Reject a bird sprite (unscaled) taller than the space above the ground
    pub fn validate_bird(&self, sprite_size: Vec2) -> Result<(), ConfigError> {
        let height = sprite_size.y * self.scale;
        if self.ground_y < height {
            return Err(ConfigError::Invalid {
                field: "ground_y",
                reason: format!(
                    "{} leaves no room for a {} px tall bird",
                    self.ground_y, height
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_bird_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }
}
