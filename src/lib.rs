//! Flappy Bird - A minimal scrolling arcade game
//!
//! Core modules:
//! - `sim`: Bird physics/animation and scrolling layers (no rendering dependencies)
//! - `renderer`: Scene composition and the WebGPU sprite pipeline
//! - `platform`: Rendering/input backend abstraction plus a headless backend
//! - `config`: Data-driven tuning and variant presets
//! - `assets`: Sprite loading with release on every exit path

pub mod assets;
pub mod config;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use assets::{AssetPaths, GameAssets};
pub use config::{GameConfig, Variant};
pub use error::{AssetError, ConfigError, GameError};
pub use game::{Game, load_assets, run};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Window dimensions
    pub const SCREEN_WIDTH: u32 = 1300;
    pub const SCREEN_HEIGHT: u32 = 768;

    /// Uniform sprite scale applied at draw time
    pub const SCALE: f32 = 1.5;
    /// Smallest accepted scale; keeps layer tile counts bounded
    pub const MIN_SCALE: f32 = 0.1;

    /// Vertical velocity range mapped onto the bird tilt
    pub const MIN_VELOCITY: f32 = -400.0;
    pub const MAX_VELOCITY: f32 = 800.0;

    /// Hard clamp on vertical velocity after gravity integration
    pub const VELOCITY_CLAMP_MIN: f32 = -1200.0;
    pub const VELOCITY_CLAMP_MAX: f32 = 1500.0;

    /// Tilt in degrees at MIN_VELOCITY and MAX_VELOCITY
    pub const TILT_MIN_DEG: f32 = -30.0;
    pub const TILT_MAX_DEG: f32 = 90.0;

    /// Scrolling layers
    pub const BG_SPEED: f32 = 40.0;
    pub const BG_POS_Y: f32 = 0.0;
    pub const BASE_SPEED: f32 = BG_SPEED * 3.0;
    /// Top of the base layer; doubles as the ground line
    pub const BASE_POS_Y: f32 = 600.0;

    /// Pixels/s²
    pub const GRAVITY: Vec2 = Vec2::new(0.0, 980.0);
    /// Assigned (not added) to the velocity on jump
    pub const JUMP_FORCE: Vec2 = Vec2::new(0.0, -400.0);
    /// Applied to vertical velocity once per tick, after position integration
    pub const VELOCITY_DAMPING: f32 = 0.99;

    /// Display time per flap frame (8 fps)
    pub const FRAME_DURATION: f32 = 1.0 / 8.0;

    pub const BIRD_START_X: f32 = 100.0;

    /// Scroll offset wraps once it passes this many tile widths
    pub const SCROLL_WRAP_TILES: f32 = 1.5;
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// The output is not clamped: inputs outside the source range extrapolate.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) / (in_max - in_min) * (out_max - out_min) + out_min
}
