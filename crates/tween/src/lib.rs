//! Tween driver: timed property interpolation advanced once per frame.
//!
//! # Invariants
//! - Nothing happens between calls to `advance`; time only moves when the host advances it.
//! - Events for tweens firing in the same frame are emitted in scheduling order.
//! - A tween emits `Started` once, then `Updated` every frame it is live, then `Completed` once.

mod driver;
mod easing;

pub use driver::{AnimationDriver, TweenDriver, TweenError, TweenEvent, TweenId, TweenSpec, Tweenable};
pub use easing::Easing;
