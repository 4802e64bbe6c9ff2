use std::time::Duration;

use mazescape_input::Action;
use mazescape_kernel::MazeGenerator;
use mazescape_scene::SceneGraph;
use mazescape_sync::{BlockPose, MazeConfig, RegenerateReport, SceneSynchronizer, SyncError};
use mazescape_tween::{AnimationDriver, TweenDriver};

use crate::camera::OrbitCameraController;
use crate::config::AppConfig;
use crate::renderer::Renderer;

/// Per-frame glue: routes actions, advances the animation driver, feeds its
/// events to the synchronizer and eases the camera.
///
/// All mutation happens on the caller's thread, either in
/// [`handle_action`](Self::handle_action) or once per frame in
/// [`advance`](Self::advance).
pub struct RenderLoop<G, D = TweenDriver<BlockPose>> {
    synchronizer: SceneSynchronizer<G>,
    driver: D,
    scene: SceneGraph,
    camera: OrbitCameraController,
    frame_count: u64,
}

impl<G: MazeGenerator> RenderLoop<G> {
    /// Loop driven by the stock [`TweenDriver`].
    pub fn with_tween_driver(generator: G, config: &AppConfig, aspect: f32) -> Self {
        Self::new(generator, TweenDriver::new(), config, aspect)
    }
}

impl<G, D> RenderLoop<G, D>
where
    G: MazeGenerator,
    D: AnimationDriver<BlockPose>,
{
    pub fn new(generator: G, driver: D, config: &AppConfig, aspect: f32) -> Self {
        Self {
            synchronizer: SceneSynchronizer::new(generator, config.maze.clone()),
            driver,
            scene: SceneGraph::new(),
            camera: OrbitCameraController::new(
                config.orbit.clone(),
                config.orbit_distance(),
                aspect,
            ),
            frame_count: 0,
        }
    }

    /// Apply one input action. Returns the report when it triggered a
    /// regeneration.
    pub fn handle_action(&mut self, action: Action) -> Result<Option<RegenerateReport>, SyncError> {
        match action {
            Action::BeginDrag(pointer) => self.camera.begin_drag(pointer),
            Action::UpdateDrag(pointer) => self.camera.update_drag(pointer),
            Action::EndDrag => self.camera.end_drag(),
            Action::Regenerate { side } => {
                let side = side.unwrap_or(self.synchronizer.config().side);
                return self.regenerate(side).map(Some);
            }
            Action::Noop => {}
        }
        Ok(None)
    }

    /// Generate a maze of `side` and start its transitions. The orbit radius
    /// follows the maze size unless the config pins it.
    pub fn regenerate(&mut self, side: usize) -> Result<RegenerateReport, SyncError> {
        let report = self
            .synchronizer
            .regenerate(side, &mut self.driver, &mut self.scene)?;
        let maze = MazeConfig {
            side: report.side,
            ..self.synchronizer.config().clone()
        };
        self.camera.set_distance(maze.orbit_distance());
        Ok(report)
    }

    /// Advance one frame by `dt`. Returns the number of animation events applied.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let _span = tracing::trace_span!("frame", frame = self.frame_count).entered();

        let events = self.driver.advance(dt);
        let applied = self.synchronizer.apply_events(events, &mut self.scene);
        self.camera.tick();
        self.frame_count += 1;

        tracing::trace!(applied, live = self.driver.active_count(), "frame advanced");
        applied
    }

    /// Advance one frame, then render it.
    pub fn step<R: Renderer>(&mut self, dt: Duration, renderer: &R) -> R::Output {
        self.advance(dt);
        renderer.render(&self.scene, &self.camera.render_view())
    }

    /// True when no transitions are left to play.
    pub fn is_settled(&self) -> bool {
        self.driver.active_count() == 0
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn synchronizer(&self) -> &SceneSynchronizer<G> {
        &self.synchronizer
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn camera(&self) -> &OrbitCameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCameraController {
        &mut self.camera
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
