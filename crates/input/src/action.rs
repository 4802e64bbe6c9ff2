use glam::Vec2;

/// A high-level action consumed by the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Pointer pressed at this screen position; starts an orbit drag.
    BeginDrag(Vec2),
    /// Pointer moved to this screen position.
    UpdateDrag(Vec2),
    /// Pointer released.
    EndDrag,
    /// Generate a new maze. `None` keeps the configured side.
    Regenerate { side: Option<usize> },
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}
