use glam::{Vec2, Vec3};
use labspace_kernel::PlayerState;

/// First-person camera pose derived from the player.
///
/// Yaw 0 faces -Z; positive yaw turns toward -X. Positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

impl CameraPose {
    pub fn from_player(player: &PlayerState) -> Self {
        Self {
            position: player.position,
            yaw_deg: player.yaw,
            pitch_deg: player.pitch,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw_deg.to_radians().sin_cos();
        let (sp, cp) = self.pitch_deg.to_radians().sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Horizontal right vector; matches the player's strafe direction.
    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw_deg.to_radians().sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }
}

/// A half-line in world space. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Projection parameters for turning pointer coordinates into rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width over height.
    pub aspect: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl RenderView {
    fn half_extents(&self) -> Vec2 {
        let tan = (self.fov_degrees.to_radians() * 0.5).tan();
        Vec2::new(tan * self.aspect, tan)
    }

    /// Ray from the camera through a normalised pointer position.
    ///
    /// `ndc` is in `[-1, 1]` on both axes with +y up.
    pub fn pointer_ray(&self, pose: &CameraPose, ndc: Vec2) -> Ray {
        let h = self.half_extents();
        let dir = pose.forward() + pose.right() * (ndc.x * h.x) + pose.up() * (ndc.y * h.y);
        Ray::new(pose.position, dir)
    }

    /// Normalised pointer position that would aim at `point`.
    ///
    /// `None` when the point is behind the camera.
    pub fn project(&self, pose: &CameraPose, point: Vec3) -> Option<Vec2> {
        let v = point - pose.position;
        let depth = v.dot(pose.forward());
        if depth <= 1e-6 {
            return None;
        }
        let h = self.half_extents();
        Some(Vec2::new(
            v.dot(pose.right()) / (depth * h.x),
            v.dot(pose.up()) / (depth * h.y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(yaw: f32, pitch: f32) -> CameraPose {
        CameraPose {
            position: Vec3::new(0.0, 1.6, 5.0),
            yaw_deg: yaw,
            pitch_deg: pitch,
        }
    }

    #[test]
    fn default_pose_faces_negative_z() {
        let p = pose(0.0, 0.0);
        assert!(p.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(p.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(p.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn basis_is_orthonormal() {
        let p = pose(37.0, -21.0);
        let (f, r, u) = (p.forward(), p.right(), p.up());
        assert!(f.dot(r).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn centre_pointer_ray_is_forward() {
        let p = pose(12.0, 8.0);
        let ray = RenderView::default().pointer_ray(&p, Vec2::ZERO);
        assert!(ray.dir.abs_diff_eq(p.forward(), 1e-5));
        assert_eq!(ray.origin, p.position);
    }

    #[test]
    fn project_inverts_pointer_ray() {
        let p = pose(-20.0, -10.0);
        let view = RenderView::default();
        let target = Vec3::new(-1.0, 1.05, -3.0);
        let ndc = view.project(&p, target).unwrap();
        let ray = view.pointer_ray(&p, ndc);
        let t = (target - p.position).length();
        assert!(ray.at(t).abs_diff_eq(target, 1e-3));
    }

    #[test]
    fn points_behind_do_not_project() {
        let p = pose(0.0, 0.0);
        assert!(RenderView::default().project(&p, Vec3::new(0.0, 1.6, 9.0)).is_none());
    }
}
