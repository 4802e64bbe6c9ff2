//! Developer Tooling: scene inspector and frame timing.
//!
//! # Invariants
//! - Tools only read loop state; they never drive transitions.

mod inspector;
mod timing;

pub use inspector::{BlockInfo, SceneInspector, SceneSummary};
pub use timing::FrameTimer;
