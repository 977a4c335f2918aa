//! Drives the built-in "dissolve salt" experiment end to end through input
//! snapshots and the reference box scene.

use labspace_data::Catalog;
use labspace_input::InputSnapshot;
use labspace_interact::InteractOutcome;
use labspace_kernel::{LabConfig, LabEvent};
use labspace_render::{BoxScene, CameraPose, RenderView};
use labspace_session::{AudioCue, LabSession, TickReport};
use std::cell::RefCell;
use std::rc::Rc;

fn session() -> (LabSession, Rc<RefCell<Vec<AudioCue>>>) {
    let store = Catalog::builtin()
        .unwrap()
        .into_store(LabConfig::default(), 42)
        .unwrap();
    let cues = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&cues);
    let session = LabSession::with_audio(store, move |c: AudioCue| sink.borrow_mut().push(c));
    (session, cues)
}

/// Point at the centre of `id` as the box scene sees it.
fn aim(session: &mut LabSession, id: &str) -> BoxScene {
    let state = session.store().state();
    let scene = BoxScene::from_state(state);
    let pose = CameraPose::from_player(&state.player);
    let centre = scene.centre_of(&id.into()).expect("item is in the scene");
    let ndc = RenderView::default()
        .project(&pose, centre)
        .expect("item is in front of the camera");
    session.set_pointer_ndc(ndc);
    scene
}

/// Press and release a key over `id`; returns the frame with the press.
/// Events from both frames are appended to `log`.
fn press(
    session: &mut LabSession,
    id: &str,
    key: fn(&mut InputSnapshot),
    log: &mut Vec<LabEvent>,
) -> TickReport {
    let scene = aim(session, id);
    let view = RenderView::default();
    let mut input = InputSnapshot::default();
    key(&mut input);
    let report = session.tick(&input, &scene, &view);
    log.extend(report.events.iter().cloned());
    log.extend(session.tick(&InputSnapshot::default(), &scene, &view).events);
    report
}

fn interact(i: &mut InputSnapshot) {
    i.interact = true;
}

fn grab(i: &mut InputSnapshot) {
    i.grab = true;
}

#[test]
fn dissolve_salt_walkthrough() {
    let (mut s, cues) = session();
    let mut log = Vec::new();
    let started = s.apply(|store| {
        store.start_experiment(&"dissolve-salt".into());
        store.arrange_equipment_for_experiment(&"dissolve-salt".into());
    });
    assert!(started.is_empty());
    let state = s.store().state();
    assert!(state.panels.experiment_panel);
    assert!(!state.equipment(&"microscope-1".into()).unwrap().interactive);

    // Select the test tube.
    let report = press(&mut s, "test-tube-1", interact, &mut log);
    assert_eq!(
        report.interactions,
        [InteractOutcome::Selected("test-tube-1".into())]
    );
    assert_eq!(s.store().state().message.as_deref(), Some("Selected: Test Tube"));

    // Pick it up and set it down on the burner.
    let report = press(&mut s, "test-tube-1", grab, &mut log);
    assert_eq!(
        report.interactions,
        [InteractOutcome::Grabbed("test-tube-1".into())]
    );
    let report = press(&mut s, "bunsen-burner-1", interact, &mut log);
    let InteractOutcome::Placed { equipment, position } = &report.interactions[0] else {
        panic!("expected a placement, got {:?}", report.interactions);
    };
    assert_eq!(equipment.as_str(), "test-tube-1");
    let tube = s.store().state().equipment(&"test-tube-1".into()).unwrap();
    assert_eq!(tube.position, *position);
    assert!(tube.available);
    assert!(s.store().state().player.held.is_none());

    // Pour, heat, then look at the beaker.
    let done = s.apply(|store| {
        store.mix_chemicals(&"test-tube-1".into(), &"beaker-1".into());
    });
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].step.as_str(), "add-salt");

    let done = s.apply(|store| {
        store.heat_equipment(&"beaker-1".into(), 65.0);
    });
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].step.as_str(), "warm-solution");
    assert!(!done[0].experiment_completed);

    let report = press(&mut s, "beaker-1", interact, &mut log);
    assert_eq!(report.completions.len(), 1);
    assert_eq!(report.completions[0].step.as_str(), "inspect-solution");
    assert!(report.completions[0].experiment_completed);

    let exp = s.store().state().experiment(&"dissolve-salt".into()).unwrap();
    assert!(exp.completed);
    assert!(exp.steps.iter().all(|st| st.completed));

    let successes = cues
        .borrow()
        .iter()
        .filter(|c| **c == AudioCue::Success)
        .count();
    assert_eq!(successes, 3);

    let completions = log
        .iter()
        .filter(|e| matches!(e, LabEvent::StepCompleted { .. }))
        .count();
    assert_eq!(completions, 3);
    assert!(s.store().events().is_empty());
}

#[test]
fn walking_stays_inside_the_room() {
    let (mut s, _) = session();
    let scene = BoxScene::new();
    let view = RenderView::default();
    let input = InputSnapshot {
        forward: true,
        look_up: true,
        ..Default::default()
    };
    for _ in 0..400 {
        s.tick(&input, &scene, &view);
    }
    let player = &s.store().state().player;
    assert_eq!(player.position.z, -10.0);
    assert_eq!(player.pitch, 45.0);
}

#[test]
fn same_seed_same_session() {
    let run = || {
        let (mut s, _) = session();
        s.apply(|store| {
            store.start_experiment(&"neutralization".into());
            store.arrange_equipment_for_experiment(&"neutralization".into());
            store.mix_chemicals(&"chemical-hcl".into(), &"beaker-2".into());
        });
        s.into_store().state().clone()
    };
    assert_eq!(run(), run());
}
