//! Static data: the equipment/experiment catalog and lab tuning config.
//!
//! Both are plain YAML. The catalog is an opaque seed for the kernel; nothing
//! here mutates simulation state.

mod catalog;
mod config;

pub use catalog::Catalog;
pub use config::{apply_overrides, load_config, validate_config};

use labspace_common::{EquipmentId, ExperimentId, StepId};
use std::path::PathBuf;

/// Errors from loading catalogs and config files.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config value {field} = {value}")]
    InvalidConfig { field: &'static str, value: f32 },
    #[error("duplicate equipment id {0}")]
    DuplicateEquipment(EquipmentId),
    #[error("duplicate experiment id {0}")]
    DuplicateExperiment(ExperimentId),
    #[error("experiment {experiment} has duplicate step id {step}")]
    DuplicateStep {
        experiment: ExperimentId,
        step: StepId,
    },
    #[error("experiment {experiment} step {step} references unknown equipment {equipment}")]
    UnknownEquipment {
        experiment: ExperimentId,
        step: StepId,
        equipment: EquipmentId,
    },
    #[error("experiment {experiment} step {step} has a mix action without targets")]
    MixWithoutTarget {
        experiment: ExperimentId,
        step: StepId,
    },
    #[error(transparent)]
    Seed(#[from] labspace_kernel::SeedError),
}

pub fn crate_info() -> &'static str {
    "labspace-data v0.1.0"
}
