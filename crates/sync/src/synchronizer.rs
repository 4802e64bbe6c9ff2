use std::collections::BTreeMap;
use std::time::Duration;

use mazescape_common::{GridPos, ObjectId};
use mazescape_kernel::{Grid, GridError, MazeGenerator};
use mazescape_scene::SceneRegistry;
use mazescape_tween::{AnimationDriver, TweenEvent, TweenId, TweenSpec};
use serde::{Deserialize, Serialize};

use crate::config::MazeConfig;
use crate::snapshot::{BlockPhase, BlockPose, GridSnapshot, VisualBlock, VisualCell};

/// Errors from synchronizer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("invalid maze dimension {side}: side must be odd and at least 5")]
    InvalidDimension { side: usize },
    #[error("invalid maze configuration: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl From<GridError> for SyncError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidDimension { side } => SyncError::InvalidDimension { side },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    Enter,
    Exit,
}

/// Bookkeeping for one live tween: which block it drives and how.
#[derive(Debug, Clone, Copy)]
struct Transition {
    object: ObjectId,
    pos: GridPos,
    kind: TransitionKind,
}

/// Outcome of the structural pass of one regeneration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerateReport {
    pub generation: u64,
    pub side: usize,
    /// Enter transitions scheduled.
    pub enters: usize,
    /// Exit transitions scheduled.
    pub exits: usize,
    /// Transitions the driver refused; their blocks were snapped to the end state.
    pub failed: usize,
    /// Delay given to the last column processed.
    pub final_delay_ms: u64,
}

/// Owns the visual blocks for the current maze and diffs each new grid into
/// enter/exit transitions.
pub struct SceneSynchronizer<G> {
    generator: G,
    config: MazeConfig,
    snapshot: GridSnapshot,
    grid: Option<Grid>,
    /// Blocks replaced at positions that stay walls, still playing their exit.
    retiring: BTreeMap<ObjectId, (GridPos, VisualBlock)>,
    transitions: BTreeMap<TweenId, Transition>,
    generation: u64,
}

impl<G: MazeGenerator> SceneSynchronizer<G> {
    pub fn new(generator: G, config: MazeConfig) -> Self {
        Self {
            generator,
            config,
            snapshot: GridSnapshot::default(),
            grid: None,
            retiring: BTreeMap::new(),
            transitions: BTreeMap::new(),
            generation: 0,
        }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &GridSnapshot {
        &self.snapshot
    }

    /// The most recently generated grid.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Number of completed regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Transitions scheduled and not yet completed or superseded.
    pub fn in_flight(&self) -> usize {
        self.transitions.len()
    }

    pub fn retiring_count(&self) -> usize {
        self.retiring.len()
    }

    /// Generate a new maze of `side` and schedule the transitions that bring
    /// the scene from the current snapshot to it.
    ///
    /// Every existing block gets an exit transition, and every wall of the new
    /// grid gets a fresh block with an enter transition, even where a wall
    /// already stood. Column `x` is delayed by `(x - 1) * column_stagger`.
    /// The new snapshot is in place when this returns.
    pub fn regenerate<D, S>(
        &mut self,
        side: usize,
        driver: &mut D,
        scene: &mut S,
    ) -> Result<RegenerateReport, SyncError>
    where
        D: AnimationDriver<BlockPose> + ?Sized,
        S: SceneRegistry + ?Sized,
    {
        mazescape_kernel::validate_side(side)?;
        let _span = tracing::info_span!("regenerate", side).entered();

        let grid = self.generator.generate(side);
        if grid.side() != side {
            tracing::warn!(
                requested = side,
                generated = grid.side(),
                "generator returned a different side; diffing positionally"
            );
        }

        let mut previous = std::mem::take(&mut self.snapshot);
        let mut next = GridSnapshot::new(grid.side());
        let span = previous.side().max(grid.side());
        let stagger = self.config.column_stagger();

        let mut report = RegenerateReport {
            generation: self.generation + 1,
            side: grid.side(),
            ..RegenerateReport::default()
        };
        let mut delay = Duration::ZERO;

        for x in 1..=span {
            for y in 1..=span {
                let pos = GridPos::new(x, y);

                let leaving = match previous.take(pos) {
                    VisualCell::Present(block) => {
                        self.begin_exit(pos, block, delay, driver, scene, &mut report)
                    }
                    VisualCell::Absent => None,
                };

                let entering = if grid.is_wall(x, y) {
                    Some(self.begin_enter(pos, grid.side(), delay, driver, scene, &mut report))
                } else {
                    None
                };

                match (entering, leaving) {
                    (Some(block), leaving) => {
                        next.set(pos, VisualCell::Present(block));
                        if let Some(old) = leaving {
                            self.retiring.insert(old.object, (pos, old));
                        }
                    }
                    (None, Some(old)) => {
                        // Stays in the snapshot until its exit completes.
                        if let Err(VisualCell::Present(old)) = set_or_return(&mut next, pos, old) {
                            self.retiring.insert(old.object, (pos, old));
                        }
                    }
                    (None, None) => {}
                }
            }
            report.final_delay_ms = delay.as_millis() as u64;
            delay += stagger;
        }

        self.snapshot = next;
        self.grid = Some(grid);
        self.generation += 1;

        tracing::info!(
            generation = report.generation,
            side = report.side,
            enters = report.enters,
            exits = report.exits,
            failed = report.failed,
            "maze regenerated"
        );
        Ok(report)
    }

    /// Apply driver events to the blocks they drive. Events for unknown or
    /// superseded tweens are ignored. Returns the number of events applied.
    pub fn apply_events<I, S>(&mut self, events: I, scene: &mut S) -> usize
    where
        I: IntoIterator<Item = TweenEvent<BlockPose>>,
        S: SceneRegistry + ?Sized,
    {
        let thickness = self.config.thickness;
        let mut applied = 0;

        for event in events {
            let id = event.id();
            let Some(transition) = self.transitions.get(&id).copied() else {
                continue;
            };
            applied += 1;

            match event {
                TweenEvent::Started { .. } => {
                    if transition.kind == TransitionKind::Enter {
                        scene.set_visible(transition.object, true);
                    }
                }
                TweenEvent::Updated { value, .. } => {
                    if let Some(block) = self.block_mut(&transition) {
                        block.anim = value;
                        scene.set_transform(block.object, value.transform(block.anchor, thickness));
                    }
                }
                TweenEvent::Completed { value, .. } => {
                    self.transitions.remove(&id);
                    self.complete(transition, value, scene);
                }
            }
        }

        applied
    }

    fn complete<S>(&mut self, transition: Transition, value: BlockPose, scene: &mut S)
    where
        S: SceneRegistry + ?Sized,
    {
        let thickness = self.config.thickness;
        match transition.kind {
            TransitionKind::Enter => {
                if let Some(block) = self.block_mut(&transition) {
                    block.anim = value;
                    block.phase = BlockPhase::Standing;
                    block.transition = None;
                    scene.set_transform(block.object, value.transform(block.anchor, thickness));
                }
            }
            TransitionKind::Exit => {
                scene.set_visible(transition.object, false);
                scene.remove(transition.object);
                let in_snapshot = self
                    .snapshot
                    .get(transition.pos)
                    .and_then(VisualCell::block)
                    .is_some_and(|b| b.object == transition.object);
                if in_snapshot {
                    self.snapshot.set(transition.pos, VisualCell::Absent);
                } else {
                    self.retiring.remove(&transition.object);
                }
                tracing::trace!(object = %transition.object.short(), "block retired");
            }
        }
    }

    fn block_mut(&mut self, transition: &Transition) -> Option<&mut VisualBlock> {
        let in_snapshot = self
            .snapshot
            .get(transition.pos)
            .and_then(VisualCell::block)
            .is_some_and(|b| b.object == transition.object);
        if in_snapshot {
            self.snapshot.block_mut(transition.pos)
        } else {
            self.retiring
                .get_mut(&transition.object)
                .map(|(_, block)| block)
        }
    }

    /// Forget the block's live transition so its remaining events are ignored.
    fn supersede<D>(&mut self, block: &mut VisualBlock, driver: &mut D)
    where
        D: AnimationDriver<BlockPose> + ?Sized,
    {
        if let Some(old) = block.transition.take() {
            self.transitions.remove(&old);
            if self.config.cancel_superseded {
                driver.cancel(old);
            }
        }
    }

    fn begin_exit<D, S>(
        &mut self,
        pos: GridPos,
        mut block: VisualBlock,
        delay: Duration,
        driver: &mut D,
        scene: &mut S,
        report: &mut RegenerateReport,
    ) -> Option<VisualBlock>
    where
        D: AnimationDriver<BlockPose> + ?Sized,
        S: SceneRegistry + ?Sized,
    {
        self.supersede(&mut block, driver);

        let spec = TweenSpec::new(block.anim, BlockPose::HIDDEN, self.config.exit_duration())
            .with_delay(delay)
            .with_easing(self.config.easing);
        match driver.schedule(spec) {
            Ok(id) => {
                block.phase = BlockPhase::Exiting;
                block.transition = Some(id);
                self.transitions.insert(
                    id,
                    Transition {
                        object: block.object,
                        pos,
                        kind: TransitionKind::Exit,
                    },
                );
                report.exits += 1;
                Some(block)
            }
            Err(err) => {
                tracing::warn!(?pos, "exit transition refused, removing block: {err}");
                report.failed += 1;
                scene.set_visible(block.object, false);
                scene.remove(block.object);
                None
            }
        }
    }

    fn begin_enter<D, S>(
        &mut self,
        pos: GridPos,
        side: usize,
        delay: Duration,
        driver: &mut D,
        scene: &mut S,
        report: &mut RegenerateReport,
    ) -> VisualBlock
    where
        D: AnimationDriver<BlockPose> + ?Sized,
        S: SceneRegistry + ?Sized,
    {
        let thickness = self.config.thickness;
        let raised = BlockPose::raised(thickness);
        let mut block = VisualBlock {
            object: ObjectId::new(),
            anchor: self.config.anchor(pos, side),
            anim: BlockPose::HIDDEN,
            phase: BlockPhase::Entering,
            transition: None,
        };
        scene.add(
            block.object,
            block.anim.transform(block.anchor, thickness),
            false,
        );

        let spec = TweenSpec::new(BlockPose::HIDDEN, raised, self.config.enter_duration())
            .with_delay(delay)
            .with_easing(self.config.easing);
        match driver.schedule(spec) {
            Ok(id) => {
                block.transition = Some(id);
                self.transitions.insert(
                    id,
                    Transition {
                        object: block.object,
                        pos,
                        kind: TransitionKind::Enter,
                    },
                );
                report.enters += 1;
            }
            Err(err) => {
                tracing::warn!(?pos, "enter transition refused, showing block at rest: {err}");
                report.failed += 1;
                block.anim = raised;
                block.phase = BlockPhase::Standing;
                scene.set_transform(block.object, raised.transform(block.anchor, thickness));
                scene.set_visible(block.object, true);
            }
        }
        block
    }
}

/// Store `block` at `pos`, handing the cell back if `pos` is out of range.
fn set_or_return(
    snapshot: &mut GridSnapshot,
    pos: GridPos,
    block: VisualBlock,
) -> Result<(), VisualCell> {
    if snapshot.get(pos).is_some() {
        snapshot.set(pos, VisualCell::Present(block));
        Ok(())
    } else {
        Err(VisualCell::Present(block))
    }
}
