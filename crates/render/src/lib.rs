//! Rendering Adapter: orbit camera, renderer-agnostic interface and the frame
//! loop that ties input, animation and the scene together.
//!
//! # Invariants
//! - Renderers only read the scene; block lifecycles belong to the synchronizer.
//! - The camera moves only inside `tick`, once per frame, and never before a drag.

mod camera;
mod config;
mod frame;
mod renderer;

pub use camera::{OrbitAngles, OrbitCameraController, OrbitConfig, OrbitState};
pub use config::{AppConfig, ConfigError};
pub use frame::RenderLoop;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
