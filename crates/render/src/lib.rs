//! Rendering Adapter: the seam between the lab core and a scene/render layer.
//!
//! # Invariants
//! - Renderers and scenes read lab state; they never mutate it.
//! - Camera pose is derived from the player every frame.
//!
//! # Workaround
//! `BoxScene` stands in for a real scene graph: equipment is picked against
//! per-category boxes. A renderer-backed scene only needs to implement
//! [`SceneRaycaster`].

mod camera;
mod renderer;
mod scene;

pub use camera::{CameraPose, Ray, RenderView};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{BoxScene, SceneHit, SceneRaycaster};

pub fn crate_info() -> &'static str {
    "labspace-render v0.1.0"
}
