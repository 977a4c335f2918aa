use labspace_common::{LookDirection, MoveDirection, TurnDirection};

/// A high-level action produced from input.
///
/// Desktop keys, gamepads and scripted drivers all reduce to this set, so the
/// simulation never sees device specifics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabAction {
    /// Walk one step in a direction relative to facing.
    Move(MoveDirection),
    /// Turn the body.
    Turn(TurnDirection),
    /// Tilt the camera.
    Look(LookDirection),
    /// Generic interact: select what is under the pointer, or place what is held.
    Interact,
    /// Pick up the selection, or place what is held.
    Grab,
}
