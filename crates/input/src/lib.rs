//! Input mapping: pointer and trigger events turned into shared actions.
//!
//! The camera controller and frame loop consume [`Action`]s, never raw
//! window events, so the desktop app and headless drivers share one path.

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{PointerEvent, PointerMapper};
