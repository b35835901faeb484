//! Rendering module
//!
//! `scene` composes a frame against any backend; the rest is the WebGPU
//! sprite pipeline used by the browser build.

pub mod scene;
pub mod shapes;
pub mod sprite_pipeline;
pub mod vertex;

pub use scene::{draw_scene, PROMPT_PLAYING, PROMPT_WAITING};
pub use sprite_pipeline::{GpuTexture, SpriteRenderer};
pub use vertex::Vertex;
