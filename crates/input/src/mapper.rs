use crate::action::LabAction;
use labspace_common::{LookDirection, MoveDirection, TurnDirection};
use serde::{Deserialize, Serialize};

/// Boolean input state sampled once per frame by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub interact: bool,
    pub grab: bool,
}

impl InputSnapshot {
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Fires on false-to-true transitions only.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTrigger {
    prev: bool,
}

impl EdgeTrigger {
    /// Feed the current level; returns true on a rising edge.
    pub fn rising(&mut self, now: bool) -> bool {
        let fired = now && !self.prev;
        self.prev = now;
        fired
    }

    pub fn reset(&mut self) {
        self.prev = false;
    }
}

/// Turns snapshots into an ordered action list.
///
/// Held movement, turn and look keys repeat every frame; interact and grab
/// are edge-triggered.
#[derive(Debug, Default)]
pub struct InputMapper {
    interact: EdgeTrigger,
    grab: EdgeTrigger,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, input: &InputSnapshot) -> Vec<LabAction> {
        let mut actions = Vec::new();
        let moves = [
            (input.forward, MoveDirection::Forward),
            (input.backward, MoveDirection::Backward),
            (input.left, MoveDirection::Left),
            (input.right, MoveDirection::Right),
        ];
        actions.extend(moves.into_iter().filter(|(on, _)| *on).map(|(_, d)| LabAction::Move(d)));
        if input.rotate_left {
            actions.push(LabAction::Turn(TurnDirection::Left));
        }
        if input.rotate_right {
            actions.push(LabAction::Turn(TurnDirection::Right));
        }
        if input.look_up {
            actions.push(LabAction::Look(LookDirection::Up));
        }
        if input.look_down {
            actions.push(LabAction::Look(LookDirection::Down));
        }
        if self.interact.rising(input.interact) {
            tracing::trace!("interact pressed");
            actions.push(LabAction::Interact);
        }
        if self.grab.rising(input.grab) {
            tracing::trace!("grab pressed");
            actions.push(LabAction::Grab);
        }
        actions
    }

    /// Forget pressed state, e.g. after focus loss.
    pub fn reset(&mut self) {
        self.interact.reset();
        self.grab.reset();
    }
}
