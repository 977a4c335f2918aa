use glam::Vec3;
use labspace_common::{Category, Difficulty, EquipmentId, ExperimentId, StepId, Subject};
use serde::{Deserialize, Serialize};

/// A placeable, interactable piece of lab equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub category: Category,
    pub position: Vec3,
    /// Euler angles in radians.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub description: String,
    /// False while held or stowed away.
    #[serde(default = "default_true")]
    pub available: bool,
    /// Whether pointer picks may target this item.
    #[serde(default = "default_true")]
    pub interactive: bool,
    /// `None` means the item is not a container at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<String>>,
    /// Degrees Celsius, once something has heated or cooled it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Equipment {
    pub fn new(id: impl Into<EquipmentId>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            description: String::new(),
            available: true,
            interactive: true,
            contents: None,
            temperature: None,
            color: None,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_contents<S: Into<String>>(mut self, contents: impl IntoIterator<Item = S>) -> Self {
        self.contents = Some(contents.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn has_contents(&self) -> bool {
        self.contents.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// One thing a step expects the user to have done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RequiredAction {
    /// Pour `source` into the first of `targets`.
    Mix {
        source: EquipmentId,
        targets: Vec<EquipmentId>,
    },
    /// Bring `equipment` to at least `value` degrees.
    Heat {
        equipment: EquipmentId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f32>,
    },
    /// Bring `equipment` down to at most `value` degrees.
    Cool {
        equipment: EquipmentId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f32>,
    },
    /// Read an instrument that sits on the bench.
    Measure { equipment: EquipmentId },
    Observe { equipment: EquipmentId },
}

impl RequiredAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mix { .. } => "mix",
            Self::Heat { .. } => "heat",
            Self::Cool { .. } => "cool",
            Self::Measure { .. } => "measure",
            Self::Observe { .. } => "observe",
        }
    }

    /// Every equipment id this action touches.
    pub fn equipment_ids(&self) -> Vec<&EquipmentId> {
        match self {
            Self::Mix { source, targets } => std::iter::once(source).chain(targets).collect(),
            Self::Heat { equipment, .. }
            | Self::Cool { equipment, .. }
            | Self::Measure { equipment }
            | Self::Observe { equipment } => vec![equipment],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentStep {
    pub id: StepId,
    pub description: String,
    #[serde(default)]
    pub required_equipment: Vec<EquipmentId>,
    #[serde(default)]
    pub required_actions: Vec<RequiredAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Goes false to true once and stays there.
    #[serde(default)]
    pub completed: bool,
}

impl ExperimentStep {
    /// Every equipment id the step references, required or acted upon.
    pub fn referenced_equipment(&self) -> impl Iterator<Item = &EquipmentId> {
        self.required_equipment
            .iter()
            .chain(self.required_actions.iter().flat_map(|a| a.equipment_ids()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: ExperimentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    pub subject: Subject,
    pub steps: Vec<ExperimentStep>,
    /// Derived: true iff every step is completed.
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub active: bool,
}

impl Experiment {
    pub fn step(&self, id: &StepId) -> Option<&ExperimentStep> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }

    pub fn references(&self, id: &EquipmentId) -> bool {
        self.steps
            .iter()
            .any(|s| s.referenced_equipment().any(|e| e == id))
    }
}

/// Visibility flags read by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panels {
    pub experiment_panel: bool,
    pub equipment_info: bool,
    pub controls: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            experiment_panel: false,
            equipment_info: false,
            controls: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Experiment,
    EquipmentInfo,
    Controls,
}

/// First-person pose and the player's current focus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    /// Degrees; unbounded.
    pub yaw: f32,
    /// Degrees; clamped to the configured range.
    pub pitch: f32,
    pub selected: Option<EquipmentId>,
    pub held: Option<EquipmentId>,
}

impl PlayerState {
    pub fn spawn_at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            selected: None,
            held: None,
        }
    }
}

/// A full, self-consistent snapshot of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabState {
    pub player: PlayerState,
    pub equipment: Vec<Equipment>,
    pub experiments: Vec<Experiment>,
    pub active_experiment: Option<ExperimentId>,
    pub message: Option<String>,
    pub panels: Panels,
}

impl LabState {
    pub fn equipment(&self, id: &EquipmentId) -> Option<&Equipment> {
        self.equipment.iter().find(|e| &e.id == id)
    }

    pub fn equipment_mut(&mut self, id: &EquipmentId) -> Option<&mut Equipment> {
        self.equipment.iter_mut().find(|e| &e.id == id)
    }

    pub fn experiment(&self, id: &ExperimentId) -> Option<&Experiment> {
        self.experiments.iter().find(|e| &e.id == id)
    }

    pub fn experiment_mut(&mut self, id: &ExperimentId) -> Option<&mut Experiment> {
        self.experiments.iter_mut().find(|e| &e.id == id)
    }

    pub fn active_experiment(&self) -> Option<&Experiment> {
        self.active_experiment
            .as_ref()
            .and_then(|id| self.experiment(id))
    }

    pub fn held(&self) -> Option<&Equipment> {
        self.player.held.as_ref().and_then(|id| self.equipment(id))
    }

    pub fn selected(&self) -> Option<&Equipment> {
        self.player
            .selected
            .as_ref()
            .and_then(|id| self.equipment(id))
    }
}
