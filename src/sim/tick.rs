//! Variable timestep simulation tick
//!
//! One call per rendered frame: input gating, bird physics, animation and
//! layer scrolling.

use super::state::{GamePhase, GameState};
use crate::config::GameConfig;

/// Edge-triggered commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Leave the title screen (S)
    pub start: bool,
    /// Flap (Space); ignored until started
    pub jump: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, config: &GameConfig) {
    // NaN and negative frame times collapse to a zero step
    let dt = dt.max(0.0);

    if input.start && state.phase == GamePhase::Waiting {
        state.phase = GamePhase::Playing;
        log::info!("Game started at tick {}", state.time_ticks);
    }

    if state.phase == GamePhase::Playing {
        let params = config.physics();
        // Jump lands before gravity so the new velocity is integrated this tick
        if input.jump {
            state.bird.jump(params.jump_force);
        }
        state.bird.integrate(dt, &params);
    }

    state
        .bird
        .animate(dt, config.tilt_velocity, config.tilt_degrees);

    for layer in state.layers_mut() {
        layer.advance(dt);
    }

    state.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{Bird, ScrollingLayer};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn new_state(config: &GameConfig) -> GameState {
        let bird = Bird::new(
            config.bird_start,
            Vec2::new(34.0, 24.0),
            3,
            config.frame_duration,
        );
        let background = ScrollingLayer::new(
            Vec2::new(288.0, 512.0) * config.scale,
            config.background.pos_y,
            config.background.speed,
        );
        let base = ScrollingLayer::new(
            Vec2::new(336.0, 112.0) * config.scale,
            config.base.pos_y,
            config.base.speed,
        );
        GameState::new(bird, Some(background), Some(base))
    }

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    fn jump() -> TickInput {
        TickInput {
            jump: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_waiting_ignores_jump() {
        let config = GameConfig::default();
        let mut state = new_state(&config);
        let start_pos = state.bird.pos;

        for _ in 0..120 {
            tick(&mut state, &jump(), DT, &config);
        }

        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.bird.pos, start_pos);
        assert_eq!(state.bird.vel, Vec2::ZERO);
        assert_eq!(state.bird.angle, 0.0);
        assert_eq!(state.time_ticks, 120);
    }

    #[test]
    fn test_waiting_still_animates_and_scrolls() {
        let config = GameConfig::default();
        let mut state = new_state(&config);

        tick(&mut state, &TickInput::default(), FRAME_DURATION, &config);

        assert_eq!(state.bird.current_frame(), 1);
        assert!(state.background.as_ref().unwrap().pos_x < 0.0);
        assert!(state.base.as_ref().unwrap().pos_x < state.background.as_ref().unwrap().pos_x);
    }

    #[test]
    fn test_start_then_fall() {
        let config = GameConfig::default();
        let mut state = new_state(&config);

        tick(&mut state, &start(), DT, &config);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.bird.vel.y > 0.0);
        assert!(state.bird.pos.y > config.bird_start.y);

        // Start is one-way
        tick(&mut state, &start(), DT, &config);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_start_and_jump_same_tick() {
        let config = GameConfig::default();
        let mut state = new_state(&config);

        tick(
            &mut state,
            &TickInput {
                start: true,
                jump: true,
            },
            DT,
            &config,
        );

        // Jump velocity plus one tick of gravity, damped
        let expected = (JUMP_FORCE.y + GRAVITY.y * DT) * VELOCITY_DAMPING;
        assert!((state.bird.vel.y - expected).abs() < 1e-3);
        assert!(state.bird.pos.y < config.bird_start.y);
    }

    #[test]
    fn test_jump_uses_configured_force() {
        let config = GameConfig {
            jump_force: Vec2::new(0.0, -250.0),
            ..GameConfig::default()
        };
        let mut state = new_state(&config);
        tick(&mut state, &start(), 0.0, &config);
        tick(&mut state, &jump(), 0.0, &config);
        assert_eq!(state.bird.vel, Vec2::new(0.0, -250.0));
    }

    #[test]
    fn test_negative_dt_is_zero_step() {
        let config = GameConfig::default();
        let mut state = new_state(&config);
        tick(&mut state, &start(), DT, &config);
        let before = state.bird.clone();
        let bg_before = state.background.clone();

        tick(&mut state, &TickInput::default(), -1.0, &config);

        assert_eq!(state.bird.pos, before.pos);
        assert_eq!(state.bird.vel, before.vel);
        assert_eq!(state.background, bg_before);
    }

    #[test]
    fn test_jump_arc_end_to_end() {
        let config = GameConfig::default();
        let mut state = new_state(&config);
        tick(&mut state, &start(), 0.0, &config);
        assert_eq!(state.bird.pos, config.bird_start);

        tick(&mut state, &jump(), DT, &config);
        let limits = state.bird.vertical_limits(&config.physics());

        let mut ys = vec![state.bird.pos.y];
        let mut vys = vec![state.bird.vel.y];
        for _ in 0..90 {
            tick(&mut state, &TickInput::default(), DT, &config);
            assert!(limits.contains(state.bird.pos.y));
            ys.push(state.bird.pos.y);
            vys.push(state.bird.vel.y);
        }

        // Rising right after the jump
        assert!(ys[1] < ys[0]);
        assert!(ys[0] < config.bird_start.y);

        // Gravity wins: velocity climbs every tick until the ground stops it
        let first_ground = vys.iter().position(|&v| v == 0.0).unwrap_or(vys.len());
        for w in vys[..first_ground].windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!(vys[10] > vys[0]);

        // Once falling, y never decreases again
        let apex = vys.iter().position(|&v| v > 0.0).unwrap();
        for w in ys[apex..].windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(ys[apex] < config.bird_start.y);
    }

    #[test]
    fn test_bird_rests_on_ground() {
        let config = GameConfig::default();
        let mut state = new_state(&config);
        tick(&mut state, &start(), DT, &config);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), DT, &config);
        }
        let limits = state.bird.vertical_limits(&config.physics());
        assert_eq!(state.bird.pos.y, limits.max);
        assert_eq!(state.bird.vel.y, 0.0);
        // Tilt keeps the last falling angle while at rest
        assert!(state.bird.angle > 0.0);
    }
}
