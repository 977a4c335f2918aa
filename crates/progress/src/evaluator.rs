use labspace_common::{ExperimentId, StepId};
use labspace_kernel::{ExperimentStep, LabConfig, LabState, LabStore, RequiredAction};
use serde::Serialize;
use std::collections::HashSet;

/// A step the evaluator just completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepCompletion {
    pub experiment: ExperimentId,
    pub step: StepId,
    pub description: String,
    /// True when this step finished the whole experiment.
    pub experiment_completed: bool,
}

/// Whether a single required action holds in `state`.
pub fn action_satisfied(action: &RequiredAction, state: &LabState, config: &LabConfig) -> bool {
    match action {
        RequiredAction::Mix { source, targets } => {
            let Some(target) = targets.first() else {
                return false;
            };
            let src = state.equipment(source).and_then(|e| e.contents.as_ref());
            let dst = state.equipment(target).and_then(|e| e.contents.as_ref());
            matches!((src, dst), (Some(s), Some(d)) if s.is_empty() && !d.is_empty())
        }
        RequiredAction::Heat { equipment, value } => {
            let threshold = value.unwrap_or(config.default_heat_threshold);
            state
                .equipment(equipment)
                .and_then(|e| e.temperature)
                .is_some_and(|t| t >= threshold)
        }
        RequiredAction::Cool { equipment, value } => {
            let threshold = value.unwrap_or(config.default_cool_threshold);
            state
                .equipment(equipment)
                .and_then(|e| e.temperature)
                .is_some_and(|t| t <= threshold)
        }
        RequiredAction::Measure { equipment } => {
            state.player.selected.as_ref() == Some(equipment)
                && state.equipment(equipment).is_some_and(|e| e.available)
        }
        RequiredAction::Observe { equipment } => state.player.selected.as_ref() == Some(equipment),
    }
}

/// Required equipment present and available, and every action satisfied.
pub fn step_satisfied(step: &ExperimentStep, state: &LabState, config: &LabConfig) -> bool {
    let equipment_ready = step
        .required_equipment
        .iter()
        .all(|id| state.equipment(id).is_some_and(|e| e.available));
    equipment_ready
        && step
            .required_actions
            .iter()
            .all(|a| action_satisfied(a, state, config))
}

/// Promotes satisfied steps of the active experiment to completed.
///
/// Remembers which steps it has completed so a step is reported once even
/// if the store is evaluated again before the caller reacts.
#[derive(Debug, Default)]
pub struct ProgressEvaluator {
    checked: HashSet<(ExperimentId, StepId)>,
}

impl ProgressEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self, experiment: &ExperimentId, step: &StepId) -> bool {
        self.checked.contains(&(experiment.clone(), step.clone()))
    }

    /// Forget every checked step.
    pub fn reset(&mut self) {
        self.checked.clear();
    }

    /// Scan the active experiment once and complete what is satisfied.
    pub fn evaluate(&mut self, store: &mut LabStore) -> Vec<StepCompletion> {
        let Some(exp) = store.state().active_experiment() else {
            return Vec::new();
        };
        let experiment = exp.id.clone();
        let satisfied: Vec<(StepId, String)> = exp
            .steps
            .iter()
            .filter(|s| !s.completed && !self.is_checked(&experiment, &s.id))
            .filter(|s| {
                let ok = step_satisfied(s, store.state(), store.config());
                tracing::trace!(%experiment, step = %s.id, ok, "evaluated step");
                ok
            })
            .map(|s| (s.id.clone(), s.description.clone()))
            .collect();

        let mut completions = Vec::with_capacity(satisfied.len());
        for (step, description) in satisfied {
            store.complete_experiment_step(&experiment, &step);
            store.set_message(Some(format!("Step completed: {description}")));
            self.checked.insert((experiment.clone(), step.clone()));
            let experiment_completed = store
                .state()
                .experiment(&experiment)
                .is_some_and(|e| e.completed);
            tracing::info!(%experiment, %step, experiment_completed, "step satisfied");
            completions.push(StepCompletion {
                experiment: experiment.clone(),
                step,
                description,
                experiment_completed,
            });
        }
        completions
    }
}
