//! Scene registration: the set of renderable objects the renderer draws.
//!
//! The scene holds registrations keyed by [`ObjectId`]; it never decides when
//! objects appear or disappear. Whoever owns an object's lifecycle drives it
//! through [`SceneRegistry`].
//!
//! # Invariants
//! - Registration, removal and visibility changes are recorded as events.
//! - Iteration order is deterministic (BTreeMap).

mod graph;

pub use graph::{SceneEvent, SceneGraph, SceneObject, SceneRegistry};
pub use mazescape_common::ObjectId;
