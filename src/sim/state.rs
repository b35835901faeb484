//! Game state and phases
//!
//! Holds only simulation data; textures live in `GameAssets` and are lent to
//! the renderer each frame.

use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::scroll::ScrollingLayer;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Title screen: bird flaps in place, layers scroll, input besides start is ignored
    #[default]
    Waiting,
    /// Physics and jumping active
    Playing,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub bird: Bird,
    /// Drawn behind the bird
    pub background: Option<ScrollingLayer>,
    /// Drawn in front of the bird, along the ground line
    pub base: Option<ScrollingLayer>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(
        bird: Bird,
        background: Option<ScrollingLayer>,
        base: Option<ScrollingLayer>,
    ) -> Self {
        Self {
            phase: GamePhase::Waiting,
            bird,
            background,
            base,
            time_ticks: 0,
        }
    }

    #[inline]
    pub fn started(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Layers in back-to-front order
    pub fn layers_mut(&mut self) -> impl Iterator<Item = &mut ScrollingLayer> {
        self.background.iter_mut().chain(self.base.iter_mut())
    }
}
