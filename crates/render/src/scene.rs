use crate::camera::{CameraPose, Ray, RenderView};
use glam::{Vec2, Vec3};
use labspace_common::{Category, EquipmentId};
use labspace_kernel::LabState;

/// One intersection reported by a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHit {
    /// Distance along the ray.
    pub distance: f32,
    pub point: Vec3,
    /// Equipment attached to the hit object, if any.
    pub equipment: Option<EquipmentId>,
}

/// Ray queries against whatever the host renders.
///
/// Hits come back nearest first. Objects without an equipment id (walls,
/// furniture) may be reported; callers skip them.
pub trait SceneRaycaster {
    fn raycast(&self, ray: &Ray) -> Vec<SceneHit>;

    /// Cast through a normalised pointer position from the given camera.
    fn pick(&self, pointer: Vec2, pose: &CameraPose, view: &RenderView) -> Vec<SceneHit> {
        self.raycast(&view.pointer_ray(pose, pointer))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SceneBox {
    min: Vec3,
    max: Vec3,
    equipment: Option<EquipmentId>,
}

/// Axis-aligned box stand-in for the lab scene graph.
///
/// Each equipment item gets a box sized by category, resting on its
/// position. The bench is included as an anonymous blocker. Held items are
/// in the player's hand and not part of the scene.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    boxes: Vec<SceneBox>,
}

/// Bench body and top, matching the room layout.
const BENCH_MIN: Vec3 = Vec3::new(-4.0, 0.0, -4.0);
const BENCH_MAX: Vec3 = Vec3::new(4.0, 1.05, -2.0);

fn half_extents(category: Category) -> Vec3 {
    match category {
        Category::Beaker => Vec3::new(0.08, 0.1, 0.08),
        Category::TestTube => Vec3::new(0.03, 0.08, 0.03),
        Category::BunsenBurner => Vec3::new(0.07, 0.12, 0.07),
        Category::Microscope => Vec3::new(0.12, 0.2, 0.12),
        Category::Scale => Vec3::new(0.15, 0.03, 0.15),
        Category::Chemical => Vec3::new(0.06, 0.12, 0.06),
    }
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build boxes for the current lab state, bench included.
    pub fn from_state(state: &LabState) -> Self {
        let mut scene = Self::new();
        scene.add_blocker(BENCH_MIN, BENCH_MAX);
        for e in &state.equipment {
            if state.player.held.as_ref() == Some(&e.id) {
                continue;
            }
            let h = half_extents(e.category);
            let centre = e.position + Vec3::new(0.0, h.y, 0.0);
            scene.boxes.push(SceneBox {
                min: centre - h,
                max: centre + h,
                equipment: Some(e.id.clone()),
            });
        }
        tracing::trace!(boxes = scene.boxes.len(), "built box scene");
        scene
    }

    /// Add a box that blocks rays but carries no equipment.
    pub fn add_blocker(&mut self, min: Vec3, max: Vec3) {
        self.boxes.push(SceneBox {
            min,
            max,
            equipment: None,
        });
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Centre of the box of `id`, handy for aiming the pointer.
    pub fn centre_of(&self, id: &EquipmentId) -> Option<Vec3> {
        self.boxes
            .iter()
            .find(|b| b.equipment.as_ref() == Some(id))
            .map(|b| (b.min + b.max) * 0.5)
    }
}

impl SceneRaycaster for BoxScene {
    fn raycast(&self, ray: &Ray) -> Vec<SceneHit> {
        let mut hits: Vec<SceneHit> = self
            .boxes
            .iter()
            .filter_map(|b| {
                ray_aabb_enter_t(ray, b.min, b.max).map(|t| SceneHit {
                    distance: t,
                    point: ray.at(t),
                    equipment: b.equipment.clone(),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Slab test. Returns the entry distance, or the exit distance when the ray
/// starts inside the box.
fn ray_aabb_enter_t(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    for i in 0..3 {
        let o = ray.origin[i];
        let d = ray.dir[i];
        if d.abs() < 1e-6 {
            if o < min[i] || o > max[i] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[i] - o) * inv;
        let mut t1 = (max[i] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        tmin = tmin.max(t0);
        tmax = tmax.min(t1);
        if tmin > tmax {
            return None;
        }
    }
    if tmax < 0.0 {
        None
    } else if tmin >= 0.0 {
        Some(tmin)
    } else {
        Some(tmax)
    }
}
