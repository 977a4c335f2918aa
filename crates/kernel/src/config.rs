use glam::Vec3;
use labspace_common::Category;
use serde::{Deserialize, Serialize};

/// Tuning constants for player motion, experiment thresholds and bench layout.
///
/// Every field has a default so partial config files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Distance covered by one `move_player` call.
    pub move_speed: f32,
    /// Half-extent of the walkable square on the x and z axes.
    pub boundary: f32,
    /// Yaw change per `rotate_player` call, in degrees.
    pub turn_step_deg: f32,
    /// Pitch change per `look_up_down` call, in degrees.
    pub look_step_deg: f32,
    /// Symmetric pitch clamp, in degrees.
    pub max_pitch_deg: f32,
    pub spawn_position: Vec3,
    /// Threshold used by `heat` actions that carry no value.
    pub default_heat_threshold: f32,
    /// Threshold used by `cool` actions that carry no value.
    pub default_cool_threshold: f32,
    pub arrangement: ArrangementConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            boundary: 10.0,
            turn_step_deg: 3.0,
            look_step_deg: 2.0,
            max_pitch_deg: 45.0,
            spawn_position: Vec3::new(0.0, 1.6, 5.0),
            default_heat_threshold: 50.0,
            default_cool_threshold: 25.0,
            arrangement: ArrangementConfig::default(),
        }
    }
}

/// Where `arrange_equipment_for_experiment` puts things.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangementConfig {
    /// Centre of the bench top the experiment items are laid out on.
    pub work_surface: Vec3,
    /// Spacing between items of the same category, along z.
    pub slot_spacing: f32,
    /// Maximum random offset applied on x and z.
    pub jitter: f32,
    /// Origin of the off-scene storage row for unused items.
    pub storage_origin: Vec3,
    pub storage_spacing: f32,
    /// Bench x offset per category, in `Category::ALL` order.
    pub category_offsets: [f32; 6],
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            work_surface: Vec3::new(0.0, 1.05, -3.0),
            slot_spacing: 0.35,
            jitter: 0.05,
            storage_origin: Vec3::new(0.0, -10.0, -20.0),
            storage_spacing: 0.5,
            category_offsets: [-2.5, -1.5, 0.0, 1.5, 2.5, -3.5],
        }
    }
}

impl ArrangementConfig {
    /// Bench slot for the `index`-th item of a category, before jitter.
    pub fn slot(&self, category: Category, index: usize) -> Vec3 {
        let column = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0);
        let x = self.category_offsets[column];
        // Alternate in front of and behind the bench centre line.
        let row = (index / 2 + 1) as f32 * self.slot_spacing;
        let z = match index {
            0 => 0.0,
            i if i % 2 == 1 => -row,
            _ => row - self.slot_spacing,
        };
        self.work_surface + Vec3::new(x, 0.0, z)
    }

    /// Storage coordinates for the `index`-th item sent off-scene.
    pub fn storage(&self, index: usize) -> Vec3 {
        self.storage_origin + Vec3::new(index as f32 * self.storage_spacing, 0.0, 0.0)
    }
}
