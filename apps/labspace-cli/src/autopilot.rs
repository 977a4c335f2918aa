//! Scripted driver that performs each step's required actions the way a
//! user would: mixing and heating through the store, selecting by pointing.

use labspace_common::EquipmentId;
use labspace_input::InputSnapshot;
use labspace_kernel::{ExperimentStep, RequiredAction};
use labspace_progress::StepCompletion;
use labspace_render::{BoxScene, CameraPose, RenderView};
use labspace_session::LabSession;

/// Perform every action of `step`. Returns the completions it triggered.
pub fn perform_step(
    session: &mut LabSession,
    step: &ExperimentStep,
    view: &RenderView,
) -> Vec<StepCompletion> {
    let mut completions = Vec::new();
    for action in &step.required_actions {
        tracing::debug!(step = %step.id, action = action.kind(), "autopilot action");
        let done = match action {
            RequiredAction::Mix { source, targets } => match targets.first() {
                Some(target) => session.apply(|store| {
                    store.mix_chemicals(source, target);
                }),
                None => Vec::new(),
            },
            RequiredAction::Heat { equipment, value } => {
                let t = value.unwrap_or(session.store().config().default_heat_threshold);
                session.apply(|store| {
                    store.heat_equipment(equipment, t);
                })
            }
            RequiredAction::Cool { equipment, value } => {
                let t = value.unwrap_or(session.store().config().default_cool_threshold);
                session.apply(|store| {
                    store.heat_equipment(equipment, t);
                })
            }
            RequiredAction::Measure { equipment } | RequiredAction::Observe { equipment } => {
                point_and_select(session, equipment, view)
            }
        };
        completions.extend(done);
    }
    completions
}

/// Aim the pointer at `id` and press interact. Falls back to a direct
/// selection when the item cannot be picked from where the player stands.
fn point_and_select(
    session: &mut LabSession,
    id: &EquipmentId,
    view: &RenderView,
) -> Vec<StepCompletion> {
    let state = session.store().state();
    let scene = BoxScene::from_state(state);
    let pose = CameraPose::from_player(&state.player);
    let ndc = scene.centre_of(id).and_then(|c| view.project(&pose, c));

    let mut completions = Vec::new();
    if let Some(ndc) = ndc {
        session.set_pointer_ndc(ndc);
        let press = InputSnapshot {
            interact: true,
            ..Default::default()
        };
        completions.extend(session.tick(&press, &scene, view).completions);
        completions.extend(
            session
                .tick(&InputSnapshot::default(), &scene, view)
                .completions,
        );
    }
    if session.store().state().player.selected.as_ref() != Some(id) {
        tracing::warn!(%id, "could not pick equipment, selecting directly");
        let id = id.clone();
        completions.extend(session.apply(move |store| {
            store.select_equipment(Some(id));
        }));
    }
    completions
}
