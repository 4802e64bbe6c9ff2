use std::collections::BTreeMap;

use mazescape_common::{ObjectId, Transform};
use serde::{Deserialize, Serialize};

/// Scene registration capability consumed by the synchronizer.
pub trait SceneRegistry {
    /// Register an object. Re-adding an existing id replaces its transform.
    fn add(&mut self, id: ObjectId, transform: Transform, visible: bool);

    /// Unregister an object. Returns false if it was not registered.
    fn remove(&mut self, id: ObjectId) -> bool;

    fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool;

    fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool;
}

/// A registered renderable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub transform: Transform,
    pub visible: bool,
}

/// Structural changes to the scene. Per-frame transform updates are not logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    Added { id: ObjectId },
    Removed { id: ObjectId },
    VisibilityChanged { id: ObjectId, visible: bool },
}

/// In-memory scene graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    objects: BTreeMap<ObjectId, SceneObject>,
    #[serde(skip)]
    events: Vec<SceneEvent>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Number of registered objects, visible or not.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.objects.values().filter(|o| o.visible).count()
    }

    /// Visible objects only, in id order.
    pub fn visible(&self) -> impl Iterator<Item = (&ObjectId, &SceneObject)> {
        self.objects.iter().filter(|(_, o)| o.visible)
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SceneRegistry for SceneGraph {
    fn add(&mut self, id: ObjectId, transform: Transform, visible: bool) {
        self.objects.insert(id, SceneObject { transform, visible });
        self.events.push(SceneEvent::Added { id });
        tracing::debug!(id = %id.short(), "scene object added");
    }

    fn remove(&mut self, id: ObjectId) -> bool {
        let removed = self.objects.remove(&id).is_some();
        if removed {
            self.events.push(SceneEvent::Removed { id });
            tracing::debug!(id = %id.short(), "scene object removed");
        }
        removed
    }

    fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        if object.visible != visible {
            object.visible = visible;
            self.events
                .push(SceneEvent::VisibilityChanged { id, visible });
        }
        true
    }

    fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.transform = transform;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn add_and_remove() {
        let mut scene = SceneGraph::new();
        let id = ObjectId::new();
        scene.add(id, Transform::default(), false);
        assert!(scene.get(id).is_some());
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.visible_count(), 0);

        assert!(scene.remove(id));
        assert!(!scene.remove(id));
        assert!(scene.is_empty());
        assert_eq!(
            scene.events(),
            &[SceneEvent::Added { id }, SceneEvent::Removed { id }]
        );
    }

    #[test]
    fn visibility_changes_are_logged_once() {
        let mut scene = SceneGraph::new();
        let id = ObjectId::new();
        scene.add(id, Transform::default(), false);
        scene.drain_events();

        assert!(scene.set_visible(id, true));
        assert!(scene.set_visible(id, true));
        assert_eq!(scene.visible_count(), 1);
        assert_eq!(
            scene.events(),
            &[SceneEvent::VisibilityChanged { id, visible: true }]
        );
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut scene = SceneGraph::new();
        let id = ObjectId::new();
        assert!(!scene.set_visible(id, true));
        assert!(!scene.set_transform(id, Transform::default()));
        assert!(scene.events().is_empty());
    }

    #[test]
    fn set_transform_updates_without_event() {
        let mut scene = SceneGraph::new();
        let id = ObjectId::new();
        scene.add(id, Transform::default(), true);
        scene.drain_events();

        let moved = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Transform::default()
        };
        assert!(scene.set_transform(id, moved));
        assert_eq!(scene.get(id).unwrap().transform, moved);
        assert!(scene.events().is_empty());
    }

    #[test]
    fn visible_iterates_only_shown_objects() {
        let mut scene = SceneGraph::new();
        let shown = ObjectId::new();
        let hidden = ObjectId::new();
        scene.add(shown, Transform::default(), true);
        scene.add(hidden, Transform::default(), false);
        let ids: Vec<ObjectId> = scene.visible().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![shown]);
    }
}
