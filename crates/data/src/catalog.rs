use crate::DataError;
use labspace_common::EquipmentId;
use labspace_kernel::{Equipment, Experiment, LabConfig, LabStore, RequiredAction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../data/lab_catalog.yaml");

/// The immutable seed list of equipment and experiments.
///
/// A catalog that made it through [`Catalog::from_yaml_str`] or
/// [`Catalog::load`] has unique ids and no dangling equipment references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub equipment: Vec<Equipment>,
    pub experiments: Vec<Experiment>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, DataError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, DataError> {
        let catalog: Self = serde_yaml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            equipment = catalog.equipment.len(),
            experiments = catalog.experiments.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Check id uniqueness and that every referenced equipment id exists.
    pub fn validate(&self) -> Result<(), DataError> {
        let mut equipment_ids = HashSet::new();
        for e in &self.equipment {
            if !equipment_ids.insert(&e.id) {
                return Err(DataError::DuplicateEquipment(e.id.clone()));
            }
        }

        let mut experiment_ids = HashSet::new();
        for exp in &self.experiments {
            if !experiment_ids.insert(&exp.id) {
                return Err(DataError::DuplicateExperiment(exp.id.clone()));
            }
            let mut step_ids = HashSet::new();
            for step in &exp.steps {
                if !step_ids.insert(&step.id) {
                    return Err(DataError::DuplicateStep {
                        experiment: exp.id.clone(),
                        step: step.id.clone(),
                    });
                }
                let empty_mix = step.required_actions.iter().any(
                    |a| matches!(a, RequiredAction::Mix { targets, .. } if targets.is_empty()),
                );
                if empty_mix {
                    return Err(DataError::MixWithoutTarget {
                        experiment: exp.id.clone(),
                        step: step.id.clone(),
                    });
                }
                if let Some(missing) = step
                    .referenced_equipment()
                    .find(|id| !equipment_ids.contains(id))
                {
                    return Err(DataError::UnknownEquipment {
                        experiment: exp.id.clone(),
                        step: step.id.clone(),
                        equipment: missing.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn equipment(&self, id: &EquipmentId) -> Option<&Equipment> {
        self.equipment.iter().find(|e| &e.id == id)
    }

    /// Seed a store from this catalog.
    pub fn into_store(self, config: LabConfig, seed: u64) -> Result<LabStore, DataError> {
        Ok(LabStore::new(self.equipment, self.experiments, config, seed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labspace_common::{Category, Subject};
    use std::io::Write;

    #[test]
    fn builtin_catalog_is_valid() {
        let c = Catalog::builtin().unwrap();
        assert!(c.equipment.len() >= 6);
        for subject in [Subject::Chemistry, Subject::Physics] {
            assert!(c.experiments.iter().any(|x| x.subject == subject));
        }
        for cat in Category::ALL {
            assert!(
                c.equipment.iter().any(|e| e.category == cat),
                "no {cat} in builtin catalog"
            );
        }
        assert!(c.experiments.iter().all(|e| !e.completed && !e.active));
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let c = Catalog::from_yaml_str(
            r#"
equipment:
  - id: scope
    name: Microscope
    category: microscope
    position: [1.0, 1.0, 1.0]
experiments: []
"#,
        )
        .unwrap();
        let e = &c.equipment[0];
        assert!(e.available && e.interactive);
        assert!(e.contents.is_none());
        assert!(e.temperature.is_none());
        assert_eq!(e.description, "");
    }

    #[test]
    fn actions_parse_into_variants() {
        let c = Catalog::builtin().unwrap();
        let exp = c
            .experiments
            .iter()
            .find(|e| e.id.as_str() == "thermal-mass")
            .unwrap();
        let kinds: Vec<&str> = exp
            .steps
            .iter()
            .flat_map(|s| s.required_actions.iter().map(|a| a.kind()))
            .collect();
        assert_eq!(kinds, ["measure", "heat", "cool"]);
    }

    #[test]
    fn duplicate_equipment_is_rejected() {
        let err = Catalog::from_yaml_str(
            r#"
equipment:
  - { id: a, name: A, category: beaker, position: [0, 0, 0] }
  - { id: a, name: B, category: scale, position: [0, 0, 0] }
experiments: []
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateEquipment(_)));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let err = Catalog::from_yaml_str(
            r#"
equipment:
  - { id: a, name: A, category: beaker, position: [0, 0, 0], contents: [] }
experiments:
  - id: x
    name: X
    difficulty: beginner
    subject: chemistry
    steps:
      - id: s
        description: mix
        required_actions:
          - { action: mix, source: a, targets: [ghost] }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::UnknownEquipment { .. }));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn duplicate_step_is_rejected() {
        let err = Catalog::from_yaml_str(
            r#"
equipment: []
experiments:
  - id: x
    name: X
    difficulty: advanced
    subject: physics
    steps:
      - { id: s, description: one }
      - { id: s, description: two }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateStep { .. }));
    }

    #[test]
    fn mix_needs_a_target() {
        let err = Catalog::from_yaml_str(
            r#"
equipment:
  - { id: a, name: A, category: beaker, position: [0, 0, 0] }
experiments:
  - id: x
    name: X
    difficulty: beginner
    subject: chemistry
    steps:
      - id: s
        description: mix
        required_actions:
          - { action: mix, source: a, targets: [] }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::MixWithoutTarget { .. }));
    }

    #[test]
    fn unknown_action_kind_is_a_parse_error() {
        let err = Catalog::from_yaml_str(
            r#"
equipment:
  - { id: a, name: A, category: beaker, position: [0, 0, 0] }
experiments:
  - id: x
    name: X
    difficulty: beginner
    subject: chemistry
    steps:
      - id: s
        description: shake
        required_actions:
          - { action: shake, equipment: a }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(
            b"equipment:\n  - { id: s, name: Scale, category: scale, position: [0, 1, 0] }\nexperiments: []\n",
        )
        .unwrap();
        let c = Catalog::load(tmp.path()).unwrap();
        assert_eq!(c.equipment.len(), 1);
        assert!(c.equipment(&"s".into()).is_some());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn builtin_seeds_a_store() {
        let store = Catalog::builtin()
            .unwrap()
            .into_store(LabConfig::default(), 1)
            .unwrap();
        assert!(store.state().active_experiment.is_none());
        assert!(!store.state().equipment.is_empty());
    }
}
