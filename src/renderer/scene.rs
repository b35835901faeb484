//! Back-to-front frame composition against any [`Backend`]

use glam::Vec2;

use crate::assets::GameAssets;
use crate::config::GameConfig;
use crate::platform::{Backend, Color, Rect, TextureSize};
use crate::sim::{Bird, GameState, ScrollingLayer};

pub const PROMPT_WAITING: &str = "Press S to start!";
pub const PROMPT_PLAYING: &str = "Press SPACE to jump!";

const PROMPT_POS: (i32, i32) = (10, 10);
const PROMPT_SIZE: i32 = 20;
const BIRD_DOT_RADIUS: f32 = 2.0;
const SEAM_WIDTH: f32 = 2.0;

/// Background, bird, base, then HUD text
pub fn draw_scene<B: Backend>(
    backend: &mut B,
    state: &GameState,
    assets: &GameAssets<B::Texture>,
    config: &GameConfig,
) {
    let viewport = Vec2::new(config.screen_width as f32, config.screen_height as f32);

    if let (Some(layer), Some(texture)) = (&state.background, &assets.background) {
        draw_layer(backend, layer, texture, viewport, config.show_debug);
    }

    draw_bird(
        backend,
        &state.bird,
        &assets.bird_frames,
        config.scale,
        config.show_debug,
    );

    if let (Some(layer), Some(texture)) = (&state.base, &assets.base) {
        draw_layer(backend, layer, texture, viewport, config.show_debug);
    }

    let prompt = if state.started() {
        PROMPT_PLAYING
    } else {
        PROMPT_WAITING
    };
    backend.draw_text(prompt, PROMPT_POS.0, PROMPT_POS.1, PROMPT_SIZE, Color::DARKGRAY);
}

/// Destination rect centered on the bird and the matching rotation origin
pub fn bird_placement(bird: &Bird, frame_size: Vec2, scale: f32) -> (Rect, Vec2) {
    let size = frame_size * scale;
    (Rect::from_pos_size(bird.pos, size), size / 2.0)
}

/// Current flap frame, tilted by the bird angle
pub fn draw_bird<B: Backend>(
    backend: &mut B,
    bird: &Bird,
    frames: &[B::Texture],
    scale: f32,
    debug: bool,
) {
    let Some(texture) = bird.frame(frames) else {
        return;
    };

    let source = Rect::from_pos_size(Vec2::ZERO, texture.size());
    let (dest, origin) = bird_placement(bird, texture.size(), scale);
    backend.draw_texture(texture, source, dest, origin, bird.angle, Color::WHITE);

    if debug {
        backend.draw_circle(bird.pos, BIRD_DOT_RADIUS, Color::WHITE);
    }
}

/// Every tile copy of a scrolling layer across the viewport
pub fn draw_layer<B: Backend>(
    backend: &mut B,
    layer: &ScrollingLayer,
    texture: &B::Texture,
    viewport: Vec2,
    debug: bool,
) {
    let source = Rect::from_pos_size(Vec2::ZERO, texture.size());

    for pos in layer.tile_positions(viewport.x) {
        let dest = Rect::from_pos_size(pos, layer.tile_size);
        backend.draw_texture(texture, source, dest, Vec2::ZERO, 0.0, Color::WHITE);

        if debug {
            backend.draw_rect(pos, Vec2::new(SEAM_WIDTH, viewport.y), Color::RED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetPaths;
    use crate::consts::SCALE;
    use crate::platform::{DrawCommand, HeadlessBackend, HeadlessTexture};
    use crate::sim::GamePhase;

    type Fixture = (HeadlessBackend, GameAssets<HeadlessTexture>, GameState, GameConfig);

    fn setup(show_debug: bool) -> Fixture {
        let config = GameConfig {
            show_debug,
            ..GameConfig::default()
        };
        let paths = AssetPaths::default();
        let mut backend = HeadlessBackend::open(1300, 768, "test");
        backend.register_image(&paths.background, 288, 512);
        backend.register_image(&paths.base, 336, 112);
        for frame in &paths.bird_frames {
            backend.register_image(frame, 34, 24);
        }
        let assets = GameAssets::load(&mut backend, &paths, true).unwrap();

        let bird = Bird::new(config.bird_start, assets.bird_size(), 3, config.frame_duration);
        let background = ScrollingLayer::new(Vec2::new(288.0, 512.0) * SCALE, 0.0, 40.0);
        let base = ScrollingLayer::new(Vec2::new(336.0, 112.0) * SCALE, 600.0, 120.0);
        let state = GameState::new(bird, Some(background), Some(base));
        (backend, assets, state, config)
    }

    fn texture_paths(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Texture { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_back_to_front_order() {
        let (mut backend, assets, state, config) = setup(false);
        backend.begin_frame(Color::BLACK);
        draw_scene(&mut backend, &state, &assets, &config);

        let paths = texture_paths(backend.commands());
        // 5 background tiles, bird, 4 base tiles
        assert_eq!(paths.len(), 10);
        assert!(paths[..5].iter().all(|p| p.ends_with("background-day.png")));
        assert!(paths[5].ends_with("bluebird-upflap.png"));
        assert!(paths[6..].iter().all(|p| p.ends_with("base.png")));

        assert!(matches!(
            backend.commands().last(),
            Some(DrawCommand::Text { text, .. }) if text == PROMPT_WAITING
        ));
    }

    #[test]
    fn test_bird_drawn_centered_and_tilted() {
        let (mut backend, assets, mut state, config) = setup(false);
        state.bird.angle = 42.0;
        draw_bird(&mut backend, &state.bird, &assets.bird_frames, config.scale, false);

        match &backend.commands()[0] {
            DrawCommand::Texture {
                source,
                dest,
                origin,
                rotation,
                ..
            } => {
                assert_eq!(*source, Rect::new(0.0, 0.0, 34.0, 24.0));
                assert_eq!(*dest, Rect::new(100.0, 384.0, 51.0, 36.0));
                assert_eq!(*origin, Vec2::new(25.5, 18.0));
                assert_eq!(*rotation, 42.0);
            }
            other => panic!("expected texture draw, got {other:?}"),
        }
    }

    #[test]
    fn test_current_frame_selects_texture() {
        let (mut backend, assets, mut state, config) = setup(false);
        state.bird.anim.current_frame = 2;
        draw_bird(&mut backend, &state.bird, &assets.bird_frames, config.scale, false);
        assert!(texture_paths(backend.commands())[0].ends_with("bluebird-downflap.png"));
    }

    #[test]
    fn test_layer_tiles_follow_scroll_offset() {
        let (mut backend, assets, mut state, _config) = setup(false);
        let base = state.base.as_mut().unwrap();
        base.pos_x = -30.0;
        draw_layer(
            &mut backend,
            base,
            assets.base.as_ref().unwrap(),
            Vec2::new(1300.0, 768.0),
            false,
        );

        let xs: Vec<f32> = backend
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Texture { dest, .. } => Some(dest.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![-30.0, 474.0, 978.0, 1482.0]);
    }

    #[test]
    fn test_prompt_after_start() {
        let (mut backend, assets, mut state, config) = setup(false);
        state.phase = GamePhase::Playing;
        draw_scene(&mut backend, &state, &assets, &config);
        assert!(matches!(
            backend.commands().last(),
            Some(DrawCommand::Text { text, x: 10, y: 10, font_size: 20, .. }) if text == PROMPT_PLAYING
        ));
    }

    #[test]
    fn test_debug_overlay() {
        let (mut backend, assets, state, config) = setup(true);
        draw_scene(&mut backend, &state, &assets, &config);

        let seams = backend
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { color, .. } if *color == Color::RED))
            .count();
        assert_eq!(seams, 9);
        assert!(backend.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Circle { center, .. } if *center == config.bird_start
        )));
    }
}
