//! Interaction Resolver: turns pointer position and interact presses into
//! select, grab and place requests against the lab store.
//!
//! # Invariants
//! - Only interactive equipment that exists in the store can be targeted.
//! - The held item is never a target.
//! - Every store change goes through a named store operation.

mod resolver;

pub use resolver::{InteractOutcome, InteractionResolver, Target};

pub fn crate_info() -> &'static str {
    "labspace-interact v0.1.0"
}
