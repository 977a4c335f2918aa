use glam::{Vec2, Vec3};
use labspace_common::EquipmentId;
use labspace_kernel::{LabState, LabStore};
use labspace_render::{CameraPose, RenderView, SceneRaycaster};

/// The equipment under the pointer and where the ray met it.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub equipment: EquipmentId,
    pub point: Vec3,
}

/// What an interaction request ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractOutcome {
    Selected(EquipmentId),
    /// Pointer was over nothing; selection and message were cleared.
    Cleared,
    Grabbed(EquipmentId),
    Placed { equipment: EquipmentId, position: Vec3 },
    /// The request changed nothing.
    Nothing,
}

impl InteractOutcome {
    /// True when the host should give hit feedback.
    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            Self::Selected(_) | Self::Grabbed(_) | Self::Placed { .. }
        )
    }
}

/// Maps pointer input onto store operations.
#[derive(Debug, Clone, Default)]
pub struct InteractionResolver {
    pointer: Vec2,
}

impl InteractionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last pointer position in normalised device coordinates.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Record a pointer move in window pixels, origin top-left.
    pub fn on_pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            tracing::debug!(width, height, "ignoring pointer move on empty viewport");
            return;
        }
        self.pointer = Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0);
    }

    pub fn set_pointer_ndc(&mut self, ndc: Vec2) {
        self.pointer = ndc;
    }

    /// Nearest interactive equipment under the pointer.
    pub fn resolve_target(
        &self,
        state: &LabState,
        scene: &dyn SceneRaycaster,
        view: &RenderView,
    ) -> Option<Target> {
        let pose = CameraPose::from_player(&state.player);
        scene
            .pick(self.pointer, &pose, view)
            .into_iter()
            .find_map(|hit| {
                let id = hit.equipment?;
                if state.player.held.as_ref() == Some(&id) {
                    return None;
                }
                state
                    .equipment(&id)
                    .filter(|e| e.interactive)
                    .map(|_| Target {
                        equipment: id,
                        point: hit.point,
                    })
            })
    }

    /// Primary interact press: place when holding, otherwise select.
    pub fn on_interact_pressed(
        &self,
        store: &mut LabStore,
        scene: &dyn SceneRaycaster,
        view: &RenderView,
    ) -> InteractOutcome {
        if store.state().player.held.is_some() {
            return self.grab_request(store, scene, view);
        }
        match self.resolve_target(store.state(), scene, view) {
            Some(target) => {
                let name = store
                    .state()
                    .equipment(&target.equipment)
                    .map(|e| e.name.clone())
                    .unwrap_or_default();
                store.select_equipment(Some(target.equipment.clone()));
                store.set_message(Some(format!("Selected: {name}")));
                tracing::debug!(id = %target.equipment, "pointer selected equipment");
                InteractOutcome::Selected(target.equipment)
            }
            None => {
                store.select_equipment(None);
                store.set_message(None);
                InteractOutcome::Cleared
            }
        }
    }

    /// Grab press: place the held item on the target, or pick up the selection.
    pub fn grab_request(
        &self,
        store: &mut LabStore,
        scene: &dyn SceneRaycaster,
        view: &RenderView,
    ) -> InteractOutcome {
        if let Some(held) = store.state().player.held.clone() {
            let Some(target) = self.resolve_target(store.state(), scene, view) else {
                tracing::debug!(%held, "nothing to place on");
                return InteractOutcome::Nothing;
            };
            store.place_equipment(target.point);
            return InteractOutcome::Placed {
                equipment: held,
                position: target.point,
            };
        }

        let Some(selected) = store.state().player.selected.clone() else {
            return InteractOutcome::Nothing;
        };
        store.grab_equipment(Some(&selected));
        if store.state().player.held.as_ref() == Some(&selected) {
            InteractOutcome::Grabbed(selected)
        } else {
            InteractOutcome::Nothing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labspace_common::Category;
    use labspace_kernel::{Equipment, LabConfig};
    use labspace_render::{Ray, SceneHit};

    /// Returns the same hits for every ray.
    struct ScriptedScene(Vec<SceneHit>);

    impl SceneRaycaster for ScriptedScene {
        fn raycast(&self, _ray: &Ray) -> Vec<SceneHit> {
            self.0.clone()
        }
    }

    fn hit(distance: f32, id: Option<&str>) -> SceneHit {
        SceneHit {
            distance,
            point: Vec3::new(0.0, 1.05, -distance),
            equipment: id.map(EquipmentId::from),
        }
    }

    fn store() -> LabStore {
        let mut inert = Equipment::new("inert", "Inert", Category::Scale);
        inert.interactive = false;
        let eq = vec![
            Equipment::new("beaker", "Beaker", Category::Beaker),
            Equipment::new("tube", "Test Tube", Category::TestTube),
            inert,
        ];
        LabStore::new(eq, Vec::new(), LabConfig::default(), 0).unwrap()
    }

    fn view() -> RenderView {
        RenderView::default()
    }

    #[test]
    fn pointer_pixels_to_ndc() {
        let mut r = InteractionResolver::new();
        r.on_pointer_moved(0.0, 0.0, 800.0, 600.0);
        assert_eq!(r.pointer(), Vec2::new(-1.0, 1.0));
        r.on_pointer_moved(400.0, 300.0, 800.0, 600.0);
        assert_eq!(r.pointer(), Vec2::ZERO);
        r.on_pointer_moved(800.0, 600.0, 800.0, 600.0);
        assert_eq!(r.pointer(), Vec2::new(1.0, -1.0));
        r.on_pointer_moved(10.0, 10.0, 0.0, 600.0);
        assert_eq!(r.pointer(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn resolve_skips_anonymous_unknown_and_inert_hits() {
        let s = store();
        let scene = ScriptedScene(vec![
            hit(1.0, None),
            hit(2.0, Some("ghost")),
            hit(3.0, Some("inert")),
            hit(4.0, Some("tube")),
            hit(5.0, Some("beaker")),
        ]);
        let t = InteractionResolver::new()
            .resolve_target(s.state(), &scene, &view())
            .unwrap();
        assert_eq!(t.equipment.as_str(), "tube");
        assert_eq!(t.point.z, -4.0);
    }

    #[test]
    fn held_item_is_never_a_target() {
        let mut s = store();
        s.grab_equipment(Some(&"tube".into()));
        let scene = ScriptedScene(vec![hit(1.0, Some("tube")), hit(2.0, Some("beaker"))]);
        let t = InteractionResolver::new()
            .resolve_target(s.state(), &scene, &view())
            .unwrap();
        assert_eq!(t.equipment.as_str(), "beaker");
    }

    #[test]
    fn interact_selects_and_sets_message() {
        let mut s = store();
        let scene = ScriptedScene(vec![hit(1.0, Some("beaker"))]);
        let out = InteractionResolver::new().on_interact_pressed(&mut s, &scene, &view());
        assert_eq!(out, InteractOutcome::Selected("beaker".into()));
        assert!(out.is_hit());
        assert_eq!(s.state().player.selected, Some("beaker".into()));
        assert_eq!(s.state().message.as_deref(), Some("Selected: Beaker"));
    }

    #[test]
    fn interact_on_empty_space_clears() {
        let mut s = store();
        s.select_equipment(Some("beaker".into()));
        s.set_message(Some("Selected: Beaker".into()));
        let miss = ScriptedScene(Vec::new());
        let out = InteractionResolver::new().on_interact_pressed(&mut s, &miss, &view());
        assert_eq!(out, InteractOutcome::Cleared);
        assert!(!out.is_hit());
        assert!(s.state().player.selected.is_none());
        assert!(s.state().message.is_none());
    }

    #[test]
    fn grab_picks_up_selection() {
        let mut s = store();
        s.select_equipment(Some("tube".into()));
        let miss = ScriptedScene(Vec::new());
        let out = InteractionResolver::new().grab_request(&mut s, &miss, &view());
        assert_eq!(out, InteractOutcome::Grabbed("tube".into()));
        assert_eq!(s.state().player.held, Some("tube".into()));
    }

    #[test]
    fn grab_without_selection_does_nothing() {
        let mut s = store();
        let miss = ScriptedScene(Vec::new());
        let out = InteractionResolver::new().grab_request(&mut s, &miss, &view());
        assert_eq!(out, InteractOutcome::Nothing);
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn grab_of_unknown_selection_does_nothing() {
        let mut s = store();
        s.select_equipment(Some("ghost".into()));
        let rev = s.revision();
        let miss = ScriptedScene(Vec::new());
        let out = InteractionResolver::new().grab_request(&mut s, &miss, &view());
        assert_eq!(out, InteractOutcome::Nothing);
        assert_eq!(s.revision(), rev);
    }

    #[test]
    fn holding_and_interacting_places_on_target() {
        let mut s = store();
        s.grab_equipment(Some(&"tube".into()));
        let scene = ScriptedScene(vec![hit(1.5, Some("tube")), hit(3.0, Some("beaker"))]);
        let out = InteractionResolver::new().on_interact_pressed(&mut s, &scene, &view());
        let expected = Vec3::new(0.0, 1.05, -3.0);
        assert_eq!(
            out,
            InteractOutcome::Placed {
                equipment: "tube".into(),
                position: expected
            }
        );
        let tube = s.state().equipment(&"tube".into()).unwrap();
        assert_eq!(tube.position, expected);
        assert!(tube.available);
        assert!(s.state().player.held.is_none());
    }

    #[test]
    fn holding_with_nothing_under_pointer_keeps_item() {
        let mut s = store();
        s.grab_equipment(Some(&"tube".into()));
        let rev = s.revision();
        let scene = ScriptedScene(vec![hit(1.0, None)]);
        let out = InteractionResolver::new().grab_request(&mut s, &scene, &view());
        assert_eq!(out, InteractOutcome::Nothing);
        assert_eq!(s.revision(), rev);
        assert_eq!(s.state().player.held, Some("tube".into()));
    }
}
