//! Shared types for the labspace simulation: identifiers and closed enumerations.
//!
//! # Invariants
//! - Identifiers come from the static catalog and never change during a session.

pub mod types;

pub use types::{
    Category, Difficulty, EquipmentId, ExperimentId, LookDirection, MoveDirection, StepId,
    Subject, TurnDirection,
};
