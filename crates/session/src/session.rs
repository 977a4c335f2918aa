use crate::audio::{AudioCue, AudioSink, NullAudio};
use glam::Vec2;
use labspace_input::{InputMapper, InputSnapshot, LabAction};
use labspace_interact::{InteractOutcome, InteractionResolver};
use labspace_kernel::{LabEvent, LabStore};
use labspace_progress::{ProgressEvaluator, StepCompletion};
use labspace_render::{RenderView, SceneRaycaster};

/// What one frame did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub actions: Vec<LabAction>,
    pub interactions: Vec<InteractOutcome>,
    pub completions: Vec<StepCompletion>,
    /// Store events since the previous frame, including those from `apply`.
    pub events: Vec<LabEvent>,
    /// A movement key was held; drives the host's footstep timer.
    pub moving: bool,
    /// Store revision after the frame.
    pub revision: u64,
}

/// Owns the store and drives it one frame at a time.
pub struct LabSession {
    store: LabStore,
    mapper: InputMapper,
    resolver: InteractionResolver,
    evaluator: ProgressEvaluator,
    audio: Box<dyn AudioSink>,
    /// Revision the evaluator last saw.
    evaluated_at: Option<u64>,
}

impl std::fmt::Debug for LabSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabSession")
            .field("revision", &self.store.revision())
            .field("pointer", &self.resolver.pointer())
            .field("evaluated_at", &self.evaluated_at)
            .finish()
    }
}

impl LabSession {
    pub fn new(store: LabStore) -> Self {
        Self::with_audio(store, NullAudio)
    }

    pub fn with_audio(store: LabStore, audio: impl AudioSink + 'static) -> Self {
        Self {
            store,
            mapper: InputMapper::new(),
            resolver: InteractionResolver::new(),
            evaluator: ProgressEvaluator::new(),
            audio: Box::new(audio),
            evaluated_at: None,
        }
    }

    pub fn store(&self) -> &LabStore {
        &self.store
    }

    pub fn into_store(self) -> LabStore {
        self.store
    }

    pub fn resolver(&self) -> &InteractionResolver {
        &self.resolver
    }

    pub fn on_pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.resolver.on_pointer_moved(x, y, width, height);
    }

    pub fn set_pointer_ndc(&mut self, ndc: Vec2) {
        self.resolver.set_pointer_ndc(ndc);
    }

    /// Run one frame. The store's event log is drained into the report.
    pub fn tick(
        &mut self,
        input: &InputSnapshot,
        scene: &dyn SceneRaycaster,
        view: &RenderView,
    ) -> TickReport {
        let actions = self.mapper.map(input);
        let mut interactions = Vec::new();
        for action in &actions {
            match *action {
                LabAction::Move(d) => {
                    self.store.move_player(d);
                }
                LabAction::Turn(d) => {
                    self.store.rotate_player(d);
                }
                LabAction::Look(d) => {
                    self.store.look_up_down(d);
                }
                LabAction::Interact => {
                    let outcome = self.resolver.on_interact_pressed(&mut self.store, scene, view);
                    interactions.push(outcome);
                }
                LabAction::Grab => {
                    let outcome = self.resolver.grab_request(&mut self.store, scene, view);
                    interactions.push(outcome);
                }
            }
        }
        for outcome in &interactions {
            if outcome.is_hit() {
                self.audio.play(AudioCue::Hit);
            }
        }

        let completions = self.evaluate();
        TickReport {
            actions,
            interactions,
            completions,
            events: self.store.drain_events(),
            moving: input.is_moving(),
            revision: self.store.revision(),
        }
    }

    /// Run store calls from the presentation layer, then evaluate progress.
    pub fn apply(&mut self, f: impl FnOnce(&mut LabStore)) -> Vec<StepCompletion> {
        f(&mut self.store);
        self.evaluate()
    }

    /// Drop held-key edges, e.g. when the window loses focus.
    pub fn reset_input(&mut self) {
        self.mapper.reset();
    }

    fn evaluate(&mut self) -> Vec<StepCompletion> {
        if self.evaluated_at == Some(self.store.revision()) {
            return Vec::new();
        }
        let completions = self.evaluator.evaluate(&mut self.store);
        for c in &completions {
            tracing::info!(experiment = %c.experiment, step = %c.step, "step completed");
            self.audio.play(AudioCue::Success);
        }
        self.evaluated_at = Some(self.store.revision());
        completions
    }
}
