//! Scene Synchronizer: reconciles successive maze grids with the visual blocks
//! drawn for them.
//!
//! Every regeneration retires the previous blocks with an exit animation and
//! raises fresh blocks for every wall of the new grid, staggered column by
//! column. Structural bookkeeping (the [`GridSnapshot`]) is replaced
//! synchronously; the animations resolve over the following frames as the host
//! feeds driver events back through [`SceneSynchronizer::apply_events`].
//!
//! # Invariants
//! - Columns are processed in increasing order, exit before enter per cell, so
//!   stagger delays never decrease within one regeneration.
//! - Each block has at most one live transition; scheduling a new one supersedes it.
//! - A block is unregistered from the scene only when its exit completes.

mod config;
mod snapshot;
mod synchronizer;

pub use config::MazeConfig;
pub use snapshot::{BlockPhase, BlockPose, GridSnapshot, PhaseCounts, VisualBlock, VisualCell};
pub use synchronizer::{RegenerateReport, SceneSynchronizer, SyncError, TransitionKind};
