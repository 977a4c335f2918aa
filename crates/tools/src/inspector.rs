use glam::Vec3;
use labspace_common::{Category, EquipmentId, ExperimentId};
use labspace_kernel::LabStore;
use serde::Serialize;

/// Lab inspector for developer tooling.
///
/// Provides read-only queries against the store for debugging and
/// development UI.
pub struct LabInspector;

impl LabInspector {
    /// Produce a summary of the lab state.
    pub fn summary(store: &LabStore) -> LabSummary {
        let state = store.state();
        LabSummary {
            revision: store.revision(),
            equipment_count: state.equipment.len(),
            available_count: state.equipment.iter().filter(|e| e.available).count(),
            held: state.player.held.clone(),
            selected: state.player.selected.clone(),
            active_experiment: state.active_experiment().map(|e| ExperimentProgress {
                id: e.id.clone(),
                name: e.name.clone(),
                done: e.completed_steps(),
                total: e.steps.len(),
                completed: e.completed,
            }),
            pending_events: store.events().len(),
        }
    }

    pub fn inspect_equipment(store: &LabStore, id: &EquipmentId) -> Option<EquipmentInfo> {
        store.state().equipment(id).map(|e| EquipmentInfo {
            id: e.id.clone(),
            name: e.name.clone(),
            category: e.category,
            position: e.position,
            available: e.available,
            interactive: e.interactive,
            contents: e.contents.clone(),
            temperature: e.temperature,
            color: e.color.clone(),
        })
    }

    pub fn list_equipment(store: &LabStore) -> Vec<EquipmentId> {
        store.state().equipment.iter().map(|e| e.id.clone()).collect()
    }
}

/// Summary of lab state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabSummary {
    pub revision: u64,
    pub equipment_count: usize,
    pub available_count: usize,
    pub held: Option<EquipmentId>,
    pub selected: Option<EquipmentId>,
    pub active_experiment: Option<ExperimentProgress>,
    pub pending_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentProgress {
    pub id: ExperimentId,
    pub name: String,
    pub done: usize,
    pub total: usize,
    pub completed: bool,
}

impl std::fmt::Display for LabSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lab: revision={} equipment={} available={} held={} selected={} pending_events={}",
            self.revision,
            self.equipment_count,
            self.available_count,
            self.held.as_ref().map_or("-", |i| i.as_str()),
            self.selected.as_ref().map_or("-", |i| i.as_str()),
            self.pending_events
        )?;
        if let Some(exp) = &self.active_experiment {
            write!(f, " experiment={} ({}/{})", exp.id, exp.done, exp.total)?;
        }
        Ok(())
    }
}

/// Detailed info about a single equipment item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentInfo {
    pub id: EquipmentId,
    pub name: String,
    pub category: Category,
    pub position: Vec3,
    pub available: bool,
    pub interactive: bool,
    pub contents: Option<Vec<String>>,
    pub temperature: Option<f32>,
    pub color: Option<String>,
}

impl std::fmt::Display for EquipmentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Equipment [{}] {} ({}) pos=({:.2}, {:.2}, {:.2}) available={} interactive={}",
            self.id,
            self.name,
            self.category,
            self.position.x,
            self.position.y,
            self.position.z,
            self.available,
            self.interactive,
        )?;
        if let Some(c) = &self.contents {
            write!(f, " contents=[{}]", c.join(", "))?;
        }
        if let Some(t) = self.temperature {
            write!(f, " temp={t:.1}")?;
        }
        if let Some(c) = &self.color {
            write!(f, " color={c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labspace_kernel::{Equipment, LabConfig};

    fn store() -> LabStore {
        let eq = vec![
            Equipment::new("b1", "Beaker", Category::Beaker)
                .at(Vec3::new(1.0, 2.0, 3.0))
                .with_contents(["Water"]),
            Equipment::new("s1", "Scale", Category::Scale),
        ];
        LabStore::new(eq, Vec::new(), LabConfig::default(), 0).unwrap()
    }

    #[test]
    fn summary_empty_lab() {
        let s = LabStore::empty();
        let summary = LabInspector::summary(&s);
        assert_eq!(summary.revision, 0);
        assert_eq!(summary.equipment_count, 0);
        assert!(summary.active_experiment.is_none());
    }

    #[test]
    fn summary_tracks_held_and_events() {
        let mut s = store();
        s.grab_equipment(Some(&"b1".into()));
        s.toggle_controls();
        let summary = LabInspector::summary(&s);
        assert_eq!(summary.revision, 2);
        assert_eq!(summary.equipment_count, 2);
        assert_eq!(summary.available_count, 1);
        assert_eq!(summary.held, Some("b1".into()));
        assert_eq!(summary.pending_events, 2);
        assert!(summary.to_string().contains("held=b1"));
    }

    #[test]
    fn inspect_equipment_found() {
        let mut s = store();
        s.heat_equipment(&"b1".into(), 42.0);
        let info = LabInspector::inspect_equipment(&s, &"b1".into()).unwrap();
        assert_eq!(info.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(info.temperature, Some(42.0));
        let text = info.to_string();
        assert!(text.contains("(beaker)"));
        assert!(text.contains("contents=[Water]"));
        assert!(text.contains("temp=42.0"));
    }

    #[test]
    fn inspect_equipment_not_found() {
        assert!(LabInspector::inspect_equipment(&store(), &"nope".into()).is_none());
    }

    #[test]
    fn list_equipment_in_catalog_order() {
        let ids = LabInspector::list_equipment(&store());
        assert_eq!(ids, [EquipmentId::from("b1"), EquipmentId::from("s1")]);
    }

    #[test]
    fn summary_serializes() {
        let json = serde_json::to_value(LabInspector::summary(&store())).unwrap();
        assert_eq!(json["equipment_count"], 2);
        assert!(json["held"].is_null());
    }
}
