//! The player bird: gravity integration, ground/ceiling clamping, flap
//! animation and velocity-driven tilt.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::remap;

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Physics tuning for one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub gravity: Vec2,
    pub jump_force: Vec2,
    /// Vertical velocity limits applied after gravity
    pub velocity_clamp: Bounds,
    /// Vertical velocity multiplier applied after position integration
    pub damping: f32,
    pub ground_y: f32,
    pub scale: f32,
}

/// Looping sprite-frame timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnimation {
    pub current_frame: usize,
    /// Time accumulated toward the next frame
    pub frame_timer: f32,
    pub frame_duration: f32,
    pub frame_count: usize,
}

impl FrameAnimation {
    pub fn new(frame_count: usize, frame_duration: f32) -> Self {
        Self {
            current_frame: 0,
            frame_timer: 0.0,
            frame_duration,
            frame_count: frame_count.max(1),
        }
    }

    /// Accumulate `dt` and step at most one frame.
    ///
    /// The duration is subtracted rather than the timer zeroed, so leftover
    /// time carries into the next frame. Returns true if the frame changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.frame_timer += dt;
        if self.frame_timer < self.frame_duration {
            return false;
        }
        self.frame_timer -= self.frame_duration;
        self.current_frame += 1;
        if self.current_frame >= self.frame_count {
            self.current_frame = 0;
        }
        true
    }
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision half-extent (half the unscaled sprite height)
    pub radius: f32,
    /// Tilt in degrees, clockwise positive
    pub angle: f32,
    pub anim: FrameAnimation,
}

impl Bird {
    /// Create a bird at rest at `pos` for a sprite of `sprite_size` (unscaled)
    pub fn new(pos: Vec2, sprite_size: Vec2, frame_count: usize, frame_duration: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: sprite_size.y / 2.0,
            angle: 0.0,
            anim: FrameAnimation::new(frame_count, frame_duration),
        }
    }

    /// Replace the velocity with the jump velocity (not an impulse)
    pub fn jump(&mut self, jump_force: Vec2) {
        self.vel = jump_force;
    }

    /// Allowed range for the bird center on the vertical axis
    pub fn vertical_limits(&self, params: &PhysicsParams) -> Bounds {
        let extent = self.radius * params.scale;
        Bounds::new(extent, (params.ground_y - extent).max(extent))
    }

    /// Advance position and velocity by `dt` seconds.
    ///
    /// Returns true if the bird was stopped by the ground or ceiling.
    pub fn integrate(&mut self, dt: f32, params: &PhysicsParams) -> bool {
        if dt <= 0.0 {
            return false;
        }

        self.vel += params.gravity * dt;
        self.vel.y = params.velocity_clamp.clamp(self.vel.y);

        self.pos += self.vel * dt;

        // Damping only shapes the next tick
        self.vel.y *= params.damping;

        let limits = self.vertical_limits(params);
        let mut stopped = false;
        if self.pos.y > limits.max {
            self.pos.y = limits.max;
            self.vel.y = 0.0;
            stopped = true;
        }
        if self.pos.y < limits.min {
            self.pos.y = limits.min;
            self.vel.y = 0.0;
            stopped = true;
        }
        stopped
    }

    /// Recompute tilt from vertical velocity; a stationary bird keeps its angle
    pub fn update_tilt(&mut self, velocity_range: Bounds, degrees: Bounds) {
        if self.vel.y != 0.0 {
            self.angle = remap(
                self.vel.y,
                velocity_range.min,
                velocity_range.max,
                degrees.min,
                degrees.max,
            );
        }
    }

    /// Advance the flap animation and refresh the tilt
    pub fn animate(&mut self, dt: f32, velocity_range: Bounds, degrees: Bounds) {
        self.anim.advance(dt);
        self.update_tilt(velocity_range, degrees);
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.anim.current_frame
    }

    /// Pick the current frame out of caller-owned sprite storage
    pub fn frame<'a, T>(&self, frames: &'a [T]) -> Option<&'a T> {
        frames.get(self.anim.current_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    const SPRITE: Vec2 = Vec2::new(34.0, 24.0);

    fn params() -> PhysicsParams {
        PhysicsParams {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            velocity_clamp: Bounds::new(VELOCITY_CLAMP_MIN, VELOCITY_CLAMP_MAX),
            damping: VELOCITY_DAMPING,
            ground_y: BASE_POS_Y,
            scale: SCALE,
        }
    }

    fn tilt() -> (Bounds, Bounds) {
        (
            Bounds::new(MIN_VELOCITY, MAX_VELOCITY),
            Bounds::new(TILT_MIN_DEG, TILT_MAX_DEG),
        )
    }

    fn bird() -> Bird {
        Bird::new(Vec2::new(100.0, 384.0), SPRITE, 3, FRAME_DURATION)
    }

    #[test]
    fn test_radius_from_sprite_height() {
        assert_eq!(bird().radius, 12.0);
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let mut b = bird();
        b.vel = Vec2::new(0.0, 250.0);
        let before = b.clone();
        assert!(!b.integrate(0.0, &params()));
        assert_eq!(b.pos, before.pos);
        assert_eq!(b.vel, before.vel);
    }

    #[test]
    fn test_single_step_order() {
        let mut b = bird();
        b.jump(JUMP_FORCE);
        b.integrate(0.5, &params());
        // v = -400 + 490 = 90, y = 384 + 45, then damped
        assert!((b.pos.y - 429.0).abs() < 1e-3);
        assert!((b.vel.y - 89.1).abs() < 1e-3);
    }

    #[test]
    fn test_jump_assigns_velocity() {
        let mut b = bird();
        b.vel = Vec2::new(3.0, 900.0);
        b.jump(JUMP_FORCE);
        assert_eq!(b.vel, JUMP_FORCE);
    }

    #[test]
    fn test_velocity_clamped_before_position() {
        let mut b = bird();
        b.pos.y = 200.0;
        b.integrate(1.0, &PhysicsParams {
            gravity: Vec2::new(0.0, 10_000.0),
            ground_y: 100_000.0,
            ..params()
        });
        // Moved by the clamped velocity, not the raw one
        assert!((b.pos.y - 1700.0).abs() < 1e-3);
        assert!((b.vel.y - VELOCITY_CLAMP_MAX * VELOCITY_DAMPING).abs() < 1e-2);
    }

    #[test]
    fn test_ground_clamp_stops_bird() {
        let mut b = bird();
        b.pos.y = 580.0;
        b.vel.y = 500.0;
        assert!(b.integrate(0.1, &params()));
        assert_eq!(b.pos.y, BASE_POS_Y - 12.0 * SCALE);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_ceiling_clamp_stops_bird() {
        let mut b = bird();
        b.pos.y = 20.0;
        b.vel.y = -1000.0;
        assert!(b.integrate(0.1, &params()));
        assert_eq!(b.pos.y, 12.0 * SCALE);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_limits_never_invert_on_low_ground() {
        let low = PhysicsParams {
            ground_y: 20.0,
            ..params()
        };
        let mut b = bird();
        b.pos.y = 10.0;
        b.vel.y = 300.0;
        b.integrate(0.1, &low);

        let limits = b.vertical_limits(&low);
        assert!(limits.min <= limits.max);
        assert!(limits.contains(b.pos.y));
    }

    #[test]
    fn test_animation_advances_every_other_half_duration_tick() {
        let mut anim = FrameAnimation::new(3, FRAME_DURATION);
        let dt = FRAME_DURATION / 2.0;
        let frames: Vec<usize> = (0..8)
            .map(|_| {
                anim.advance(dt);
                anim.current_frame
            })
            .collect();
        assert_eq!(frames, vec![0, 1, 1, 2, 2, 0, 0, 1]);
    }

    #[test]
    fn test_animation_keeps_remainder() {
        let mut anim = FrameAnimation::new(3, 0.125);
        assert!(anim.advance(0.1875));
        assert_eq!(anim.current_frame, 1);
        assert!((anim.frame_timer - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn test_animation_single_step_on_large_dt() {
        let mut anim = FrameAnimation::new(3, 0.125);
        assert!(anim.advance(10.0));
        assert_eq!(anim.current_frame, 1);
        // Backlog drains one frame per call
        assert!(anim.advance(0.0));
        assert_eq!(anim.current_frame, 2);
    }

    #[test]
    fn test_tilt_frozen_while_stationary() {
        let (range, degrees) = tilt();
        let mut b = bird();
        b.vel.y = 800.0;
        b.update_tilt(range, degrees);
        assert_eq!(b.angle, 90.0);

        b.vel.y = 0.0;
        b.update_tilt(range, degrees);
        assert_eq!(b.angle, 90.0);
    }

    #[test]
    fn test_tilt_extrapolates_past_range() {
        let (range, degrees) = tilt();
        let mut b = bird();
        b.vel.y = VELOCITY_CLAMP_MAX;
        b.update_tilt(range, degrees);
        assert!((b.angle - 160.0).abs() < 1e-3);

        b.vel.y = -1000.0;
        b.update_tilt(range, degrees);
        assert!((b.angle + 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_frame_lookup_borrows_storage() {
        let frames = ["up", "mid", "down"];
        let mut b = bird();
        assert_eq!(b.frame(&frames), Some(&"up"));
        b.anim.advance(FRAME_DURATION);
        assert_eq!(b.frame(&frames), Some(&"mid"));
    }

    proptest! {
        #[test]
        fn prop_velocity_within_clamp(
            vy in -5000.0f32..5000.0,
            gravity in -50_000.0f32..50_000.0,
            dt in 0.0f32..2.0,
        ) {
            let p = PhysicsParams { gravity: Vec2::new(0.0, gravity), ..params() };
            let mut b = bird();
            b.vel.y = vy;
            b.integrate(dt, &p);
            if dt > 0.0 {
                prop_assert!(p.velocity_clamp.contains(b.vel.y));
            }
        }

        #[test]
        fn prop_position_within_limits(
            y in -2000.0f32..3000.0,
            vy in -1200.0f32..1500.0,
            dt in 0.0001f32..1.0,
        ) {
            let p = params();
            let mut b = bird();
            b.pos.y = y;
            b.vel.y = vy;
            let stopped = b.integrate(dt, &p);
            let limits = b.vertical_limits(&p);
            prop_assert!(limits.contains(b.pos.y));
            if stopped {
                prop_assert_eq!(b.vel.y, 0.0);
            }
        }

        #[test]
        fn prop_frame_index_in_range(steps in prop::collection::vec(0.0f32..1.0, 1..64)) {
            let mut anim = FrameAnimation::new(3, FRAME_DURATION);
            for dt in steps {
                anim.advance(dt);
                prop_assert!(anim.current_frame < 3);
            }
        }
    }
}
