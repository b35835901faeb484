//! Frame loop: input, simulation, drawing

use crate::assets::GameAssets;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::platform::{Backend, Color, Key, TextureSize};
use crate::renderer::draw_scene;
use crate::sim::{Bird, GameState, ScrollingLayer, TickInput, tick};

/// A running game: tuning, simulation state and the textures it draws
pub struct Game<T> {
    pub config: GameConfig,
    pub state: GameState,
    pub assets: GameAssets<T>,
}

impl<T: TextureSize> Game<T> {
    /// Build the initial state from loaded sprite sizes
    pub fn new(config: GameConfig, assets: GameAssets<T>) -> Self {
        let bird = Bird::new(
            config.bird_start,
            assets.bird_size(),
            assets.bird_frames.len(),
            config.frame_duration,
        );

        let layer = |texture: &Option<T>, placement: &crate::config::LayerConfig| {
            texture.as_ref().map(|t| {
                ScrollingLayer::new(t.size() * config.scale, placement.pos_y, placement.speed)
            })
        };
        let background = layer(&assets.background, &config.background);
        let base = layer(&assets.base, &config.base);

        Self {
            state: GameState::new(bird, background, base),
            config,
            assets,
        }
    }

    /// Poll input, advance one tick and draw it
    pub fn frame<B>(&mut self, backend: &mut B)
    where
        B: Backend<Texture = T>,
    {
        let dt = backend.frame_time();
        let input = TickInput {
            start: backend.key_pressed(Key::S),
            jump: backend.key_pressed(Key::Space),
        };

        tick(&mut self.state, &input, dt, &self.config);

        backend.begin_frame(Color::BLACK);
        draw_scene(backend, &self.state, &self.assets, &self.config);
        backend.end_frame();
    }
}

/// Load assets and check that the bird fits above the ground
pub fn load_assets<B: Backend>(
    backend: &mut B,
    config: &GameConfig,
) -> Result<GameAssets<B::Texture>, GameError> {
    let assets = GameAssets::load(backend, &config.assets, config.scrolling_layers)?;
    config.validate_bird(assets.bird_size())?;
    Ok(assets)
}

/// Load assets and run until the backend asks to close.
///
/// On a startup failure the backend is closed and the error returned; any
/// textures loaded before the failure are already released.
pub fn run<B: Backend>(backend: &mut B, config: GameConfig) -> Result<GameState, GameError> {
    let assets = match load_assets(backend, &config) {
        Ok(assets) => assets,
        Err(e) => {
            log::error!("Aborting startup: {}", e);
            backend.close();
            return Err(e);
        }
    };

    let mut game = Game::new(config, assets);
    while !backend.should_close() {
        game.frame(backend);
    }

    let Game { state, assets, .. } = game;
    drop(assets);
    backend.close();
    Ok(state)
}
