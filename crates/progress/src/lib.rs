//! Experiment Progress Evaluator: watches the active experiment and marks
//! steps completed once the lab state satisfies them.
//!
//! # Invariants
//! - A step is completed at most once per evaluator, and never un-completed.
//! - Completion goes through the store, so the event log records it.

mod evaluator;

pub use evaluator::{ProgressEvaluator, StepCompletion, action_satisfied, step_satisfied};

pub fn crate_info() -> &'static str {
    "labspace-progress v0.1.0"
}
