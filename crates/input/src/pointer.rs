use glam::Vec2;

use crate::action::Action;

/// Raw pointer input in screen pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
}

impl From<PointerEvent> for Action {
    fn from(event: PointerEvent) -> Self {
        match event {
            PointerEvent::Down { x, y } => Action::BeginDrag(Vec2::new(x, y)),
            PointerEvent::Move { x, y } => Action::UpdateDrag(Vec2::new(x, y)),
            PointerEvent::Up => Action::EndDrag,
        }
    }
}

/// Collapses a stream of pointer events into actions, dropping moves that
/// carry no new position.
#[derive(Debug, Default)]
pub struct PointerMapper {
    last: Option<Vec2>,
}

impl PointerMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, event: PointerEvent) -> Action {
        match event {
            PointerEvent::Move { x, y } => {
                let pos = Vec2::new(x, y);
                if self.last == Some(pos) {
                    return Action::Noop;
                }
                self.last = Some(pos);
            }
            PointerEvent::Down { x, y } => {
                self.last = Some(Vec2::new(x, y));
                tracing::debug!(x, y, "pointer down");
            }
            PointerEvent::Up => {
                tracing::debug!("pointer up");
            }
        }
        event.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_map_to_drag_actions() {
        assert_eq!(
            Action::from(PointerEvent::Down { x: 100.0, y: 100.0 }),
            Action::BeginDrag(Vec2::new(100.0, 100.0))
        );
        assert_eq!(
            Action::from(PointerEvent::Move { x: 100.0, y: 50.0 }),
            Action::UpdateDrag(Vec2::new(100.0, 50.0))
        );
        assert_eq!(Action::from(PointerEvent::Up), Action::EndDrag);
    }

    #[test]
    fn mapper_drops_repeated_positions() {
        let mut mapper = PointerMapper::new();
        assert!(matches!(
            mapper.map(PointerEvent::Down { x: 1.0, y: 1.0 }),
            Action::BeginDrag(_)
        ));
        assert_eq!(mapper.map(PointerEvent::Move { x: 1.0, y: 1.0 }), Action::Noop);
        assert!(matches!(
            mapper.map(PointerEvent::Move { x: 2.0, y: 1.0 }),
            Action::UpdateDrag(_)
        ));
        assert_eq!(mapper.map(PointerEvent::Up), Action::EndDrag);
    }
}
