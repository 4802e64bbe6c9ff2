use std::time::Duration;

use glam::Vec3;
use mazescape_common::GridPos;
use mazescape_tween::Easing;
use serde::{Deserialize, Serialize};

use crate::synchronizer::SyncError;

/// Maze size, block geometry and transition timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Side length requested on regeneration. Odd, >= 5.
    pub side: usize,
    /// Edge length of one block in world units.
    pub thickness: f32,
    pub enter_ms: u64,
    pub exit_ms: u64,
    /// Extra delay added per column.
    pub column_stagger_ms: u64,
    /// Curve shared by enter and exit transitions.
    pub easing: Easing,
    /// Cancel superseded tweens in the driver instead of only ignoring their events.
    pub cancel_superseded: bool,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            side: 21,
            thickness: 20.0,
            enter_ms: 200,
            exit_ms: 200,
            column_stagger_ms: 50,
            easing: Easing::Linear,
            cancel_superseded: false,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        mazescape_kernel::validate_side(self.side)?;
        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err(SyncError::InvalidConfig {
                reason: "thickness must be a positive number",
            });
        }
        if self.enter_ms == 0 || self.exit_ms == 0 {
            return Err(SyncError::InvalidConfig {
                reason: "transition durations must be positive",
            });
        }
        Ok(())
    }

    pub fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.enter_ms)
    }

    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    pub fn column_stagger(&self) -> Duration {
        Duration::from_millis(self.column_stagger_ms)
    }

    /// Floor-level centre of the block at `pos` in a maze of `side`, with the
    /// maze centred on the origin.
    pub fn anchor(&self, pos: GridPos, side: usize) -> Vec3 {
        let half = side as f32 * self.thickness / 2.0;
        Vec3::new(
            pos.x as f32 * self.thickness - half,
            0.0,
            pos.y as f32 * self.thickness - half,
        )
    }

    /// Default orbit radius for this maze: the diagonal of a cube spanning it.
    pub fn orbit_distance(&self) -> f32 {
        3.0_f32.sqrt() * self.side as f32 * self.thickness
    }
}
