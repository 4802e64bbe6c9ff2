//! wgpu render backend for the maze.
//!
//! Draws every visible scene object as an instanced, lit cube. View and
//! projection come from the orbit camera's [`RenderView`](mazescape_render::RenderView).
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Blocks are unit cubes scaled by their transform; hidden blocks are skipped.

mod gpu;
mod shaders;

pub use gpu::{Lighting, WgpuRenderer};
