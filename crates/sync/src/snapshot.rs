use glam::Vec3;
use mazescape_common::{GridPos, ObjectId, Transform};
use mazescape_tween::{TweenId, Tweenable};
use serde::{Deserialize, Serialize};

/// The two animated properties of a block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockPose {
    /// Vertical scale factor, 0 (flat) to 1 (full height).
    pub scale: f32,
    /// Height of the block's centre above the floor.
    pub offset_y: f32,
}

impl BlockPose {
    pub const HIDDEN: BlockPose = BlockPose {
        scale: 0.0,
        offset_y: 0.0,
    };

    /// Full height, resting on the floor.
    pub fn raised(thickness: f32) -> Self {
        Self {
            scale: 1.0,
            offset_y: thickness / 2.0,
        }
    }

    /// World transform of a block anchored at `anchor` with edge `thickness`.
    pub fn transform(&self, anchor: Vec3, thickness: f32) -> Transform {
        Transform {
            position: anchor + Vec3::Y * self.offset_y,
            scale: Vec3::new(thickness, thickness * self.scale, thickness),
            ..Transform::default()
        }
    }
}

impl Tweenable for BlockPose {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            scale: Tweenable::lerp(self.scale, to.scale, t),
            offset_y: Tweenable::lerp(self.offset_y, to.offset_y, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockPhase {
    Entering,
    Standing,
    Exiting,
}

/// A block owned by the synchronizer and registered with the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualBlock {
    pub object: ObjectId,
    /// Floor-level centre in world space.
    pub anchor: Vec3,
    /// Last pose applied, used as the start of the next transition.
    pub anim: BlockPose,
    pub phase: BlockPhase,
    /// The live transition driving this block, if any.
    pub transition: Option<TweenId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum VisualCell {
    #[default]
    Absent,
    Present(VisualBlock),
}

impl VisualCell {
    pub fn block(&self) -> Option<&VisualBlock> {
        match self {
            VisualCell::Present(block) => Some(block),
            VisualCell::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, VisualCell::Present(_))
    }
}

/// Number of present blocks in each phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCounts {
    pub entering: usize,
    pub standing: usize,
    pub exiting: usize,
}

/// Per-position visual state for one generation, addressed 1..=side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    side: usize,
    cells: Vec<VisualCell>,
}

impl GridSnapshot {
    /// All-absent snapshot.
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![VisualCell::Absent; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if pos.x == 0 || pos.y == 0 || pos.x > self.side || pos.y > self.side {
            return None;
        }
        Some((pos.x - 1) * self.side + (pos.y - 1))
    }

    pub fn get(&self, pos: GridPos) -> Option<&VisualCell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub(crate) fn block_mut(&mut self, pos: GridPos) -> Option<&mut VisualBlock> {
        let i = self.index(pos)?;
        match &mut self.cells[i] {
            VisualCell::Present(block) => Some(block),
            VisualCell::Absent => None,
        }
    }

    /// Store `cell` at `pos`. Returns false when `pos` is outside the snapshot.
    pub(crate) fn set(&mut self, pos: GridPos, cell: VisualCell) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Move the cell at `pos` out, leaving it absent.
    pub(crate) fn take(&mut self, pos: GridPos) -> VisualCell {
        match self.index(pos) {
            Some(i) => std::mem::take(&mut self.cells[i]),
            None => VisualCell::Absent,
        }
    }

    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_present()).count()
    }

    pub fn phase_counts(&self) -> PhaseCounts {
        let mut counts = PhaseCounts::default();
        for block in self.cells.iter().filter_map(VisualCell::block) {
            match block.phase {
                BlockPhase::Entering => counts.entering += 1,
                BlockPhase::Standing => counts.standing += 1,
                BlockPhase::Exiting => counts.exiting += 1,
            }
        }
        counts
    }

    /// Present blocks with their positions, column by column.
    pub fn blocks(&self) -> impl Iterator<Item = (GridPos, &VisualBlock)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.block()
                .map(|b| (GridPos::new(i / self.side + 1, i % self.side + 1), b))
        })
    }
}
