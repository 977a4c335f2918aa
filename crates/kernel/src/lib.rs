//! Lab Kernel: the authoritative lab state store.
//!
//! # Invariants
//! - All state mutations flow through named store operations.
//! - A commit replaces the whole state at once; readers never see partial updates.
//! - At most one equipment item is held; step completion never reverts.
//! - Pitch and player position stay inside their configured bounds.

pub mod config;
pub mod model;
pub mod store;

pub use config::{ArrangementConfig, LabConfig};
pub use model::{
    Equipment, Experiment, ExperimentStep, LabState, Panel, Panels, PlayerState, RequiredAction,
};
pub use store::{LabEvent, LabObserver, LabStore, SeedError, SubscriptionId};

pub fn crate_info() -> &'static str {
    "labspace-kernel v0.1.0"
}
