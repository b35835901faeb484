//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! sprites are referenced by frame index and tile size only.

pub mod bird;
pub mod scroll;
pub mod state;
pub mod tick;

pub use bird::{Bird, Bounds, FrameAnimation, PhysicsParams};
pub use scroll::ScrollingLayer;
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
