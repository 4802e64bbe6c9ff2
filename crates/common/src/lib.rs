//! Shared types used across the mazescape crates.

mod types;

pub use types::{GridPos, ObjectId, Transform};
