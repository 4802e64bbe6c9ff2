use std::fmt;

use mazescape_common::GridPos;
use mazescape_kernel::MazeGenerator;
use mazescape_render::RenderLoop;
use mazescape_sync::{BlockPhase, BlockPose, PhaseCounts};
use mazescape_tween::AnimationDriver;
use serde::Serialize;

/// Read-only queries against a running frame loop, for debugging UIs and
/// the headless CLI.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary<G, D>(rl: &RenderLoop<G, D>) -> SceneSummary
    where
        G: MazeGenerator,
        D: AnimationDriver<BlockPose>,
    {
        let sync = rl.synchronizer();
        let angles = rl.camera().state().current;
        SceneSummary {
            frame: rl.frame_count(),
            generation: sync.generation(),
            side: sync.grid().map_or(0, |g| g.side()),
            walls: sync.grid().map_or(0, |g| g.wall_count()),
            objects: rl.scene().len(),
            visible: rl.scene().visible_count(),
            phases: sync.snapshot().phase_counts(),
            retiring: sync.retiring_count(),
            in_flight: sync.in_flight(),
            driver_live: rl.driver().active_count(),
            camera_yaw: angles.yaw,
            camera_pitch: angles.pitch,
        }
    }

    /// Details of the block at `pos`, if one is present.
    pub fn inspect_block<G, D>(rl: &RenderLoop<G, D>, pos: GridPos) -> Option<BlockInfo>
    where
        G: MazeGenerator,
        D: AnimationDriver<BlockPose>,
    {
        let block = rl.synchronizer().snapshot().get(pos)?.block()?;
        let object = rl.scene().get(block.object);
        Some(BlockInfo {
            pos,
            id: block.object.short(),
            phase: block.phase,
            scale: block.anim.scale,
            offset_y: block.anim.offset_y,
            registered: object.is_some(),
            visible: object.is_some_and(|o| o.visible),
        })
    }
}

/// Snapshot of loop state at one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub frame: u64,
    pub generation: u64,
    pub side: usize,
    pub walls: usize,
    pub objects: usize,
    pub visible: usize,
    pub phases: PhaseCounts,
    pub retiring: usize,
    pub in_flight: usize,
    pub driver_live: usize,
    pub camera_yaw: f32,
    pub camera_pitch: f32,
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Maze: gen={} side={} walls={} frame={} | objects={} visible={} | entering={} standing={} exiting={} retiring={} | in_flight={}",
            self.generation,
            self.side,
            self.walls,
            self.frame,
            self.objects,
            self.visible,
            self.phases.entering,
            self.phases.standing,
            self.phases.exiting,
            self.retiring,
            self.in_flight,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockInfo {
    pub pos: GridPos,
    pub id: String,
    pub phase: BlockPhase,
    pub scale: f32,
    pub offset_y: f32,
    pub registered: bool,
    pub visible: bool,
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block [{}] at ({}, {}) {:?} scale={:.2} y={:.2}{}",
            self.id,
            self.pos.x,
            self.pos.y,
            self.phase,
            self.scale,
            self.offset_y,
            if self.visible { "" } else { " (hidden)" },
        )
    }
}
