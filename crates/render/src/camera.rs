use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::renderer::RenderView;

/// Tuning for the orbit camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Pixels of drag per radian of rotation.
    pub sensitivity: f32,
    /// Distance kept below straight-down when pitching.
    pub pitch_margin: f32,
    /// Fraction of the remaining angle closed each tick, in (0, 1].
    pub smoothing: f32,
    pub initial_yaw: f32,
    pub initial_pitch: f32,
    /// Orbit radius. `None` derives it from the maze extent.
    pub distance: Option<f32>,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            sensitivity: 800.0,
            pitch_margin: 0.1,
            smoothing: 0.1,
            initial_yaw: 0.38639,
            initial_pitch: 0.648339,
            distance: None,
            fov_degrees: 45.0,
            near: 1.0,
            far: 2000.0,
        }
    }
}

impl OrbitConfig {
    /// Upper bound for pitch.
    pub fn max_pitch(&self) -> f32 {
        FRAC_PI_2 - self.pitch_margin
    }

    /// Describe the first problem with these settings, if any.
    pub fn problem(&self) -> Option<&'static str> {
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Some("orbit sensitivity must be positive");
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Some("orbit smoothing must be in (0, 1]");
        }
        if !(self.pitch_margin > 0.0 && self.pitch_margin < FRAC_PI_2) {
            return Some("orbit pitch margin must be in (0, pi/2)");
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Some("orbit clip planes must satisfy 0 < near < far");
        }
        if self.distance.is_some_and(|d| !(d.is_finite() && d > 0.0)) {
            return Some("orbit distance must be positive");
        }
        None
    }
}

/// Yaw about +Y and pitch above the horizon, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitAngles {
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitState {
    pub current: OrbitAngles,
    pub target: OrbitAngles,
    /// Pointer position where the active drag began.
    pub drag_anchor: Option<Vec2>,
}

/// Pointer-driven camera that orbits the origin with eased motion.
#[derive(Debug, Clone)]
pub struct OrbitCameraController {
    config: OrbitConfig,
    state: OrbitState,
    distance: f32,
    aspect: f32,
}

impl OrbitCameraController {
    /// `distance` is used when the config does not fix one.
    pub fn new(config: OrbitConfig, distance: f32, aspect: f32) -> Self {
        let initial = OrbitAngles {
            yaw: config.initial_yaw,
            pitch: config.initial_pitch.clamp(0.0, config.max_pitch()),
        };
        let distance = config.distance.unwrap_or(distance);
        Self {
            config,
            state: OrbitState {
                current: initial,
                target: initial,
                drag_anchor: None,
            },
            distance,
            aspect,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Change the orbit radius unless the config pins it.
    pub fn set_distance(&mut self, distance: f32) {
        if self.config.distance.is_none() && distance.is_finite() && distance > 0.0 {
            self.distance = distance;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state.drag_anchor.is_some()
    }

    /// Start a drag at `pointer`. A second call moves the anchor.
    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.state.drag_anchor = Some(pointer);
        tracing::debug!(x = pointer.x, y = pointer.y, "orbit drag started");
    }

    /// Retarget the orbit from the drag offset. Does nothing without an anchor.
    pub fn update_drag(&mut self, pointer: Vec2) {
        let Some(anchor) = self.state.drag_anchor else {
            return;
        };
        let k = self.config.sensitivity;
        let current = self.state.current;
        self.state.target = OrbitAngles {
            yaw: current.yaw + (anchor.x - pointer.x) / k,
            pitch: (current.pitch + (pointer.y - anchor.y) / k).clamp(0.0, self.config.max_pitch()),
        };
    }

    /// Release the drag. The camera keeps easing toward the last target.
    pub fn end_drag(&mut self) {
        if self.state.drag_anchor.take().is_some() {
            tracing::debug!(
                yaw = self.state.target.yaw,
                pitch = self.state.target.pitch,
                "orbit drag ended"
            );
        }
    }

    /// Ease the current angles toward the target. Call once per frame.
    pub fn tick(&mut self) {
        let s = self.config.smoothing;
        let OrbitState { current, target, .. } = &mut self.state;
        current.yaw += (target.yaw - current.yaw) * s;
        current.pitch += (target.pitch - current.pitch) * s;
    }

    /// Camera position: the reference vector `(distance, 0, 0)` pitched about
    /// Z, then yawed about Y.
    pub fn position(&self) -> Vec3 {
        let OrbitAngles { yaw, pitch } = self.state.current;
        let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_z(pitch);
        rotation * (Vec3::X * self.distance)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.position(),
            target: Vec3::ZERO,
            fov_degrees: self.config.fov_degrees,
            aspect: self.aspect,
            near: self.config.near,
            far: self.config.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCameraController {
        OrbitCameraController::new(OrbitConfig::default(), 700.0, 16.0 / 9.0)
    }

    #[test]
    fn drag_offset_sets_target_from_current() {
        let mut cam = camera();
        let before = cam.state().current;
        cam.begin_drag(Vec2::new(100.0, 100.0));
        cam.update_drag(Vec2::new(100.0, 50.0));

        let target = cam.state().target;
        assert!((target.pitch - (before.pitch - 0.0625)).abs() < 1e-6);
        assert_eq!(target.yaw, before.yaw);

        cam.update_drag(Vec2::new(20.0, 100.0));
        let target = cam.state().target;
        assert!((target.yaw - (before.yaw + 0.1)).abs() < 1e-6);
        assert!((target.pitch - before.pitch).abs() < 1e-6);
    }

    #[test]
    fn downward_drag_raises_pitch_by_offset_over_k() {
        let mut cam = camera();
        let before = cam.state().current.pitch;
        cam.begin_drag(Vec2::new(100.0, 50.0));
        cam.update_drag(Vec2::new(100.0, 100.0));
        assert!((cam.state().target.pitch - (before + 50.0 / 800.0)).abs() < 1e-6);
    }

    #[test]
    fn update_without_anchor_is_noop() {
        let mut cam = camera();
        let before = cam.state().clone();
        cam.update_drag(Vec2::new(400.0, -300.0));
        assert_eq!(cam.state(), &before);

        cam.begin_drag(Vec2::ZERO);
        cam.end_drag();
        let before = cam.state().clone();
        cam.update_drag(Vec2::new(400.0, -300.0));
        assert_eq!(cam.state(), &before);
    }

    #[test]
    fn pitch_target_stays_clamped() {
        let mut cam = camera();
        let max = cam.config().max_pitch();
        cam.begin_drag(Vec2::new(0.0, 0.0));
        for i in 0..200 {
            let y = if i % 3 == 0 { -5000.0 } else { 5000.0 } * (i as f32 / 10.0);
            cam.update_drag(Vec2::new(i as f32, y));
            let pitch = cam.state().target.pitch;
            assert!((0.0..=max).contains(&pitch), "pitch {pitch} escaped");
            cam.tick();
        }
    }

    #[test]
    fn tick_converges_without_overshoot() {
        let mut cam = camera();
        cam.begin_drag(Vec2::new(0.0, 0.0));
        cam.update_drag(Vec2::new(-400.0, 200.0));
        cam.end_drag();
        let target = cam.state().target;

        let mut last_gap = f32::MAX;
        for _ in 0..300 {
            cam.tick();
            let current = cam.state().current;
            assert!(current.yaw <= target.yaw);
            assert!(current.pitch <= target.pitch);
            let gap = (target.yaw - current.yaw) + (target.pitch - current.pitch);
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-4);
    }

    #[test]
    fn tick_converges_downward_without_overshoot() {
        let mut cam = camera();
        cam.begin_drag(Vec2::new(0.0, 0.0));
        cam.update_drag(Vec2::new(400.0, -200.0));
        cam.end_drag();
        let start = cam.state().current;
        let target = cam.state().target;
        assert!(target.yaw < start.yaw);
        assert!(target.pitch < start.pitch);
        assert!(target.pitch > 0.0);

        let mut last_gap = f32::MAX;
        for _ in 0..300 {
            cam.tick();
            let current = cam.state().current;
            assert!(current.yaw >= target.yaw);
            assert!(current.pitch >= target.pitch);
            let gap = (current.yaw - target.yaw) + (current.pitch - target.pitch);
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-4);
    }

    #[test]
    fn no_motion_before_any_drag() {
        let mut cam = camera();
        let before = cam.state().clone();
        let pos = cam.position();
        for _ in 0..50 {
            cam.tick();
        }
        assert_eq!(cam.state(), &before);
        assert_eq!(cam.position(), pos);
    }

    #[test]
    fn position_orbits_at_distance_above_the_floor() {
        let cam = camera();
        let pos = cam.position();
        assert!((pos.length() - 700.0).abs() < 1e-2);
        assert!(pos.y > 0.0);

        let pitch = cam.state().current.pitch;
        assert!((pos.y - 700.0 * pitch.sin()).abs() < 1e-2);
    }

    #[test]
    fn view_looks_at_origin() {
        let view = camera().render_view();
        let origin = view.view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-3);
        assert!(origin.y.abs() < 1e-3);
        assert!(origin.z < 0.0);
        assert!(!view.view_projection().col(0).x.is_nan());
    }

    #[test]
    fn configured_distance_wins() {
        let config = OrbitConfig {
            distance: Some(50.0),
            ..OrbitConfig::default()
        };
        let mut cam = OrbitCameraController::new(config, 700.0, 1.0);
        assert_eq!(cam.distance(), 50.0);
        cam.set_distance(900.0);
        assert_eq!(cam.distance(), 50.0);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut cam = camera();
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect(), 16.0 / 9.0);
        cam.set_aspect(2.0);
        assert_eq!(cam.render_view().aspect, 2.0);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(OrbitConfig::default().problem(), None);
        let bad = OrbitConfig {
            smoothing: 1.5,
            ..OrbitConfig::default()
        };
        assert!(bad.problem().is_some());
    }
}
