//! Developer Tooling: read-only inspection of a running lab.
//!
//! # Invariants
//! - Tools never mutate lab state.

mod inspector;

pub use inspector::{EquipmentInfo, ExperimentProgress, LabInspector, LabSummary};

pub fn crate_info() -> &'static str {
    "labspace-tools v0.1.0"
}
