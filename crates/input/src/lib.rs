//! Input mapping: per-frame boolean snapshots become high-level lab actions.
//!
//! # Invariants
//! - The simulation consumes actions, never raw device events.
//! - Interact and grab fire once per press, not once per frame held.

pub mod action;
pub mod mapper;

pub use action::LabAction;
pub use mapper::{EdgeTrigger, InputMapper, InputSnapshot};

pub fn crate_info() -> &'static str {
    "labspace-input v0.1.0"
}
