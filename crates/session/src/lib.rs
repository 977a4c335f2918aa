//! Lab Session: runs one frame of the lab core.
//!
//! Input snapshot → mapped actions → store mutations and interaction →
//! progress evaluation → audio cues.
//!
//! # Invariants
//! - The evaluator runs after the store changed, never re-entrantly from an observer.
//! - Each completed step produces exactly one success cue.
//! - Audio failures stay inside the sink.

mod audio;
mod session;

pub use audio::{AudioCue, AudioSink, NullAudio};
pub use session::{LabSession, TickReport};

pub fn crate_info() -> &'static str {
    "labspace-session v0.1.0"
}
