use glam::{Mat4, Vec3};
use mazescape_scene::SceneGraph;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 2000.0,
        }
    }
}

impl RenderView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view configuration, then produces
/// output. It never mutates the scene; the synchronizer owns block lifecycles.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &SceneGraph, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the visible scene.
///
/// Used by the CLI and by tests of the frame loop.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Cap on the number of objects listed.
    pub max_objects: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_objects(max: usize) -> Self {
        Self {
            max_objects: Some(max),
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene ({} objects, {} visible) ===\n",
            scene.len(),
            scene.visible_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov_degrees
        ));

        let limit = self.max_objects.unwrap_or(usize::MAX);
        for (id, object) in scene.visible().take(limit) {
            let p = object.transform.position;
            out.push_str(&format!(
                "  [{}] pos=({:.2}, {:.2}, {:.2}) height={:.2}\n",
                id.short(),
                p.x,
                p.y,
                p.z,
                object.transform.scale.y
            ));
        }
        let hidden = scene.visible_count().saturating_sub(limit);
        if hidden > 0 {
            out.push_str(&format!("  ... {hidden} more\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazescape_common::{ObjectId, Transform};
    use mazescape_scene::SceneRegistry;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = SceneGraph::new();
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("0 objects, 0 visible"));
        assert!(output.contains("fov=45"));
    }

    #[test]
    fn debug_renderer_lists_visible_objects_only() {
        let mut scene = SceneGraph::new();
        scene.add(
            ObjectId::new(),
            Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                ..Transform::default()
            },
            true,
        );
        scene.add(ObjectId::new(), Transform::default(), false);

        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("2 objects, 1 visible"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        assert_eq!(output.matches("pos=").count(), 1);
    }

    #[test]
    fn debug_renderer_truncates() {
        let mut scene = SceneGraph::new();
        for _ in 0..5 {
            scene.add(ObjectId::new(), Transform::default(), true);
        }
        let output = DebugTextRenderer::with_max_objects(2).render(&scene, &RenderView::default());
        assert_eq!(output.matches("pos=").count(), 2);
        assert!(output.contains("... 3 more"));
        // header, camera, two objects, overflow marker
        assert_eq!(output.lines().count(), 5);
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn render_view_projects_target_to_centre() {
        let view = RenderView::default();
        let clip = view.view_projection() * view.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
    }
}
