use crate::config::LabConfig;
use crate::model::{Equipment, Experiment, LabState, Panel, Panels, PlayerState};
use glam::Vec3;
use labspace_common::{
    EquipmentId, ExperimentId, LookDirection, MoveDirection, StepId, TurnDirection,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An event record produced by every committed mutation of the lab state.
///
/// The log doubles as the diagnostic trace of the session. No-op operations
/// produce no event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabEvent {
    PlayerMoved {
        direction: MoveDirection,
        position: Vec3,
    },
    PlayerRotated { yaw: f32 },
    PitchChanged { pitch: f32 },
    EquipmentSelected { id: Option<EquipmentId> },
    EquipmentGrabbed { id: EquipmentId },
    /// Held item let go without a destination.
    EquipmentReleased { id: EquipmentId },
    EquipmentPlaced { id: EquipmentId, position: Vec3 },
    ExperimentStarted { id: ExperimentId },
    StepCompleted {
        experiment: ExperimentId,
        step: StepId,
        experiment_completed: bool,
    },
    ChemicalsMixed {
        source: EquipmentId,
        target: EquipmentId,
        color: String,
    },
    EquipmentHeated { id: EquipmentId, temperature: f32 },
    EquipmentObserved { id: EquipmentId },
    EquipmentArranged {
        experiment: ExperimentId,
        on_bench: usize,
        stored: usize,
    },
    MessageChanged { message: Option<String> },
    PanelToggled { panel: Panel, visible: bool },
}

/// Receives every committed event together with the state it produced.
pub trait LabObserver {
    fn on_event(&mut self, event: &LabEvent, state: &LabState);
}

impl<F> LabObserver for F
where
    F: FnMut(&LabEvent, &LabState),
{
    fn on_event(&mut self, event: &LabEvent, state: &LabState) {
        self(event, state)
    }
}

/// Handle returned by [`LabStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Errors from seeding a store with catalog data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("duplicate equipment id {0}")]
    DuplicateEquipment(EquipmentId),
    #[error("duplicate experiment id {0}")]
    DuplicateExperiment(ExperimentId),
}

/// The single source of truth for mutable simulation state.
///
/// Every named operation computes the next state from a copy of the current
/// one and commits it in one step, so readers never observe a half-applied
/// mutation. Invalid requests (unknown ids, unavailable items, nothing held)
/// are explicit no-ops: nothing is committed and the reason is traced at
/// debug level.
pub struct LabStore {
    state: LabState,
    config: LabConfig,
    revision: u64,
    /// Splitmix64 state for colours and layout jitter.
    rng: u64,
    event_log: Vec<LabEvent>,
    observers: Vec<(SubscriptionId, Box<dyn LabObserver>)>,
    next_subscription: u64,
}

impl std::fmt::Debug for LabStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabStore")
            .field("revision", &self.revision)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl LabStore {
    /// Seed a store from catalog equipment and experiments.
    pub fn new(
        equipment: Vec<Equipment>,
        experiments: Vec<Experiment>,
        config: LabConfig,
        seed: u64,
    ) -> Result<Self, SeedError> {
        let mut seen = HashSet::new();
        for e in &equipment {
            if !seen.insert(&e.id) {
                return Err(SeedError::DuplicateEquipment(e.id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for x in &experiments {
            if !seen.insert(&x.id) {
                return Err(SeedError::DuplicateExperiment(x.id.clone()));
            }
        }

        let state = LabState {
            player: PlayerState::spawn_at(config.spawn_position),
            equipment,
            experiments,
            active_experiment: None,
            message: None,
            panels: Panels::default(),
        };
        tracing::info!(
            equipment = state.equipment.len(),
            experiments = state.experiments.len(),
            "lab initialized"
        );
        Ok(Self {
            state,
            config,
            revision: 0,
            rng: seed,
            event_log: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// An empty lab with default tuning. Mostly useful in tests.
    pub fn empty() -> Self {
        Self {
            state: LabState {
                player: PlayerState::spawn_at(LabConfig::default().spawn_position),
                equipment: Vec::new(),
                experiments: Vec::new(),
                active_experiment: None,
                message: None,
                panels: Panels::default(),
            },
            config: LabConfig::default(),
            revision: 0,
            rng: 0,
            event_log: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &LabState {
        &self.state
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    /// Number of commits so far. Unchanged by no-op operations.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[LabEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<LabEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn subscribe(&mut self, observer: impl LabObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn commit(&mut self, next: LabState, event: LabEvent) -> &LabState {
        self.state = next;
        self.revision += 1;
        tracing::trace!(revision = self.revision, ?event, "commit");
        for (_, observer) in &mut self.observers {
            observer.on_event(&event, &self.state);
        }
        self.event_log.push(event);
        &self.state
    }

    fn next_random(&mut self) -> u64 {
        self.rng = splitmix64(self.rng);
        self.rng
    }

    /// Uniform sample in `[-1, 1]`.
    fn next_signed_unit(&mut self) -> f32 {
        let r = self.next_random() >> 40;
        (r as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
    }

    // --- Player ---

    pub fn move_player(&mut self, direction: MoveDirection) -> &LabState {
        let speed = self.config.move_speed;
        let limit = self.config.boundary;
        let yaw = self.state.player.yaw.to_radians();
        let (sin, cos) = yaw.sin_cos();
        let delta = match direction {
            MoveDirection::Forward => Vec3::new(-sin, 0.0, -cos),
            MoveDirection::Backward => Vec3::new(sin, 0.0, cos),
            MoveDirection::Left => Vec3::new(-cos, 0.0, sin),
            MoveDirection::Right => Vec3::new(cos, 0.0, -sin),
        } * speed;

        let mut next = self.state.clone();
        let mut p = next.player.position + delta;
        p.x = clamp_sym(p.x, limit);
        p.z = clamp_sym(p.z, limit);
        next.player.position = p;
        tracing::debug!(?direction, x = p.x, z = p.z, "player moved");
        self.commit(
            next,
            LabEvent::PlayerMoved {
                direction,
                position: p,
            },
        )
    }

    pub fn rotate_player(&mut self, direction: TurnDirection) -> &LabState {
        let step = self.config.turn_step_deg;
        let yaw = match direction {
            TurnDirection::Left => self.state.player.yaw - step,
            TurnDirection::Right => self.state.player.yaw + step,
        };
        self.set_player_rotation(yaw)
    }

    pub fn look_up_down(&mut self, direction: LookDirection) -> &LabState {
        let step = self.config.look_step_deg;
        let pitch = match direction {
            LookDirection::Up => self.state.player.pitch + step,
            LookDirection::Down => self.state.player.pitch - step,
        };
        self.set_camera_look_angle(pitch)
    }

    pub fn set_player_rotation(&mut self, yaw: f32) -> &LabState {
        let mut next = self.state.clone();
        next.player.yaw = yaw;
        tracing::debug!(yaw, "player rotated");
        self.commit(next, LabEvent::PlayerRotated { yaw })
    }

    /// Set the pitch directly; the value is clamped to the configured range.
    pub fn set_camera_look_angle(&mut self, pitch: f32) -> &LabState {
        let max = self.config.max_pitch_deg;
        let pitch = clamp_sym(pitch, max);
        let mut next = self.state.clone();
        next.player.pitch = pitch;
        tracing::debug!(pitch, "camera look angle");
        self.commit(next, LabEvent::PitchChanged { pitch })
    }

    // --- Equipment ---

    /// Point the selection at `id`. The id is not checked against the catalog.
    pub fn select_equipment(&mut self, id: Option<EquipmentId>) -> &LabState {
        let mut next = self.state.clone();
        next.player.selected = id.clone();
        tracing::debug!(id = id.as_ref().map_or("none", |i| i.as_str()), "selected equipment");
        self.commit(next, LabEvent::EquipmentSelected { id })
    }

    /// Pick up `id`, or with `None` let go of whatever is held.
    ///
    /// Grabbing is refused when the item is unknown, unavailable, or when
    /// something else is already in hand. Releasing leaves the item where it
    /// last stood and makes it available again; it is not just a cleared
    /// hold that leaves the item unavailable.
    pub fn grab_equipment(&mut self, id: Option<&EquipmentId>) -> &LabState {
        let Some(id) = id else {
            return self.release_held();
        };
        if let Some(held) = &self.state.player.held {
            tracing::debug!(%id, %held, "cannot grab: already holding equipment");
            return &self.state;
        }
        match self.state.equipment(id) {
            Some(e) if e.available => {}
            Some(_) => {
                tracing::debug!(%id, "cannot grab: not available");
                return &self.state;
            }
            None => {
                tracing::debug!(%id, "cannot grab: no such equipment");
                return &self.state;
            }
        }

        let mut next = self.state.clone();
        if let Some(e) = next.equipment_mut(id) {
            e.available = false;
        }
        next.player.held = Some(id.clone());
        tracing::info!(%id, "grabbed equipment");
        self.commit(next, LabEvent::EquipmentGrabbed { id: id.clone() })
    }

    fn release_held(&mut self) -> &LabState {
        let Some(id) = self.state.player.held.clone() else {
            tracing::debug!("nothing held to release");
            return &self.state;
        };
        let mut next = self.state.clone();
        if let Some(e) = next.equipment_mut(&id) {
            e.available = true;
        }
        next.player.held = None;
        tracing::info!(%id, "released equipment");
        self.commit(next, LabEvent::EquipmentReleased { id })
    }

    /// Put the held item down at `position`. No-op when nothing is held.
    pub fn place_equipment(&mut self, position: Vec3) -> &LabState {
        let Some(id) = self.state.player.held.clone() else {
            tracing::debug!("cannot place: nothing held");
            return &self.state;
        };
        let mut next = self.state.clone();
        if let Some(e) = next.equipment_mut(&id) {
            e.position = position;
            e.available = true;
        }
        next.player.held = None;
        tracing::info!(%id, x = position.x, y = position.y, z = position.z, "placed equipment");
        self.commit(next, LabEvent::EquipmentPlaced { id, position })
    }

    /// Pour the contents of `source` into `target`.
    ///
    /// Both items must exist, be distinct and be containers. The target takes
    /// a new pseudo-random colour to show the reaction.
    pub fn mix_chemicals(&mut self, source: &EquipmentId, target: &EquipmentId) -> &LabState {
        if source == target {
            tracing::debug!(%source, "cannot mix: source and target are the same");
            return &self.state;
        }
        let (Some(src), Some(dst)) = (self.state.equipment(source), self.state.equipment(target))
        else {
            tracing::debug!(%source, %target, "cannot mix: equipment not found");
            return &self.state;
        };
        let (Some(poured), Some(_)) = (src.contents.clone(), dst.contents.as_ref()) else {
            tracing::debug!(%source, %target, "cannot mix: no contents to mix");
            return &self.state;
        };

        let color = format!("#{:06x}", self.next_random() & 0x00ff_ffff);
        let mut next = self.state.clone();
        if let Some(dst) = next.equipment_mut(target) {
            dst.contents.get_or_insert_with(Vec::new).extend(poured);
            dst.color = Some(color.clone());
        }
        if let Some(src) = next.equipment_mut(source) {
            src.contents = Some(Vec::new());
        }
        tracing::info!(%source, %target, %color, "mixed chemicals");
        self.commit(
            next,
            LabEvent::ChemicalsMixed {
                source: source.clone(),
                target: target.clone(),
                color,
            },
        )
    }

    /// Record a temperature. Any value is accepted, including cooling.
    pub fn heat_equipment(&mut self, id: &EquipmentId, temperature: f32) -> &LabState {
        if self.state.equipment(id).is_none() {
            tracing::debug!(%id, "cannot heat: no such equipment");
            return &self.state;
        }
        let mut next = self.state.clone();
        if let Some(e) = next.equipment_mut(id) {
            e.temperature = Some(temperature);
        }
        tracing::info!(%id, temperature, "heated equipment");
        self.commit(
            next,
            LabEvent::EquipmentHeated {
                id: id.clone(),
                temperature,
            },
        )
    }

    /// Show a description of `id` in the message slot.
    pub fn observe_equipment(&mut self, id: &EquipmentId) -> &LabState {
        let Some(e) = self.state.equipment(id) else {
            tracing::debug!(%id, "cannot observe: no such equipment");
            return &self.state;
        };
        let message = format!("Observing {}: {}", e.name, e.description);
        let mut next = self.state.clone();
        next.message = Some(message);
        tracing::debug!(%id, "observing equipment");
        self.commit(next, LabEvent::EquipmentObserved { id: id.clone() })
    }

    // --- Experiments ---

    /// Make `id` the only active experiment and open the experiment panel.
    pub fn start_experiment(&mut self, id: &ExperimentId) -> &LabState {
        if self.state.experiment(id).is_none() {
            tracing::debug!(%id, "cannot start: no such experiment");
            return &self.state;
        }
        let mut next = self.state.clone();
        for exp in &mut next.experiments {
            exp.active = &exp.id == id;
        }
        next.active_experiment = Some(id.clone());
        next.panels.experiment_panel = true;
        tracing::info!(%id, "started experiment");
        self.commit(next, LabEvent::ExperimentStarted { id: id.clone() })
    }

    /// Mark a step completed and refresh the experiment's derived flag.
    ///
    /// Completing an already completed step is a no-op and emits nothing.
    pub fn complete_experiment_step(
        &mut self,
        experiment: &ExperimentId,
        step: &StepId,
    ) -> &LabState {
        match self.state.experiment(experiment).map(|e| e.step(step)) {
            None => {
                tracing::debug!(%experiment, "cannot complete step: no such experiment");
                return &self.state;
            }
            Some(None) => {
                tracing::debug!(%experiment, %step, "cannot complete step: no such step");
                return &self.state;
            }
            Some(Some(s)) if s.completed => {
                tracing::debug!(%experiment, %step, "step already completed");
                return &self.state;
            }
            Some(Some(_)) => {}
        }

        let mut next = self.state.clone();
        let mut experiment_completed = false;
        if let Some(exp) = next.experiment_mut(experiment) {
            for s in &mut exp.steps {
                if &s.id == step {
                    s.completed = true;
                }
            }
            exp.completed = exp.steps.iter().all(|s| s.completed);
            experiment_completed = exp.completed;
        }
        tracing::info!(%experiment, %step, experiment_completed, "completed experiment step");
        self.commit(
            next,
            LabEvent::StepCompleted {
                experiment: experiment.clone(),
                step: step.clone(),
                experiment_completed,
            },
        )
    }

    /// Lay the bench out for `id`.
    ///
    /// Items the experiment references go to their category slot on the work
    /// surface, slightly jittered, and become available and interactive.
    /// Everything else is stowed off-scene and disabled.
    pub fn arrange_equipment_for_experiment(&mut self, id: &ExperimentId) -> &LabState {
        let Some(exp) = self.state.experiment(id) else {
            tracing::debug!(%id, "cannot arrange: no such experiment");
            return &self.state;
        };
        let used: Vec<bool> = self
            .state
            .equipment
            .iter()
            .map(|e| exp.references(&e.id))
            .collect();

        let layout = self.config.arrangement.clone();
        let mut next = self.state.clone();
        let mut per_category = [0usize; 6];
        let mut stored = 0usize;
        for (e, used) in next.equipment.iter_mut().zip(used) {
            if used {
                let column = labspace_common::Category::ALL
                    .iter()
                    .position(|c| *c == e.category)
                    .unwrap_or(0);
                let slot = layout.slot(e.category, per_category[column]);
                per_category[column] += 1;
                let jitter = Vec3::new(
                    self.next_signed_unit() * layout.jitter,
                    0.0,
                    self.next_signed_unit() * layout.jitter,
                );
                e.position = slot + jitter;
                e.available = true;
                e.interactive = true;
            } else {
                e.position = layout.storage(stored);
                e.available = false;
                e.interactive = false;
                stored += 1;
            }
        }
        // An item in hand that was just stowed cannot stay in hand.
        if let Some(held) = next.player.held.clone() {
            if next.equipment(&held).is_some_and(|e| !e.interactive) {
                next.player.held = None;
            } else if let Some(e) = next.equipment_mut(&held) {
                e.available = false;
            }
        }
        let on_bench = next.equipment.len() - stored;
        tracing::info!(%id, on_bench, stored, "arranged equipment for experiment");
        self.commit(
            next,
            LabEvent::EquipmentArranged {
                experiment: id.clone(),
                on_bench,
                stored,
            },
        )
    }

    // --- UI ---

    pub fn set_message(&mut self, message: Option<String>) -> &LabState {
        if self.state.message == message {
            return &self.state;
        }
        let mut next = self.state.clone();
        next.message = message.clone();
        self.commit(next, LabEvent::MessageChanged { message })
    }

    pub fn toggle_experiment_panel(&mut self) -> &LabState {
        self.toggle_panel(Panel::Experiment)
    }

    pub fn toggle_equipment_info(&mut self) -> &LabState {
        self.toggle_panel(Panel::EquipmentInfo)
    }

    pub fn toggle_controls(&mut self) -> &LabState {
        self.toggle_panel(Panel::Controls)
    }

    fn toggle_panel(&mut self, panel: Panel) -> &LabState {
        let mut next = self.state.clone();
        let flag = match panel {
            Panel::Experiment => &mut next.panels.experiment_panel,
            Panel::EquipmentInfo => &mut next.panels.equipment_info,
            Panel::Controls => &mut next.panels.controls,
        };
        *flag = !*flag;
        let visible = *flag;
        self.commit(next, LabEvent::PanelToggled { panel, visible })
    }
}

/// Clamp to `[-limit, limit]`. A negative limit counts by magnitude; a
/// non-finite one leaves the value alone.
fn clamp_sym(value: f32, limit: f32) -> f32 {
    if limit.is_finite() {
        value.clamp(-limit.abs(), limit.abs())
    } else {
        value
    }
}

/// Splitmix64 step. Keeps colours and jitter reproducible for a given seed.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
