//! Platform abstraction layer
//!
//! The viewpoint contract (camera pose and pointer capture) and a headless
//! free-look camera implementing it.

use glam::Vec3;

/// Camera the player looks through
///
/// Position is read and written by the session for clamping and respawn;
/// `move_forward` and `move_right` move along the horizontal look direction.
pub trait Viewpoint {
    /// Pointer/input capture is active
    fn is_captured(&self) -> bool;
    fn lock(&mut self);
    fn unlock(&mut self);
    fn move_forward(&mut self, amount: f32);
    fn move_right(&mut self, amount: f32);
    fn position(&self) -> Vec3;
    fn set_position(&mut self, pos: Vec3);
    /// Unit look direction
    fn facing(&self) -> Vec3;
}

/// Free-look camera without a window: yaw/pitch plus position
#[derive(Debug, Clone)]
pub struct FreeCamera {
    pub pos: Vec3,
    /// Radians, 0 looks down -Z, positive turns left
    pub yaw: f32,
    /// Radians, positive looks up
    pub pitch: f32,
    captured: bool,
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self {
            pos: crate::consts::PLAYER_SPAWN,
            yaw: 0.0,
            pitch: 0.0,
            captured: false,
        }
    }
}

impl FreeCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal forward direction
    fn ground_forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right direction
    fn ground_right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Turn to look at a point on the ground plane
    pub fn face_toward(&mut self, target: Vec3) {
        let d = crate::flatten(target - self.pos);
        if d.length_squared() > f32::EPSILON {
            self.yaw = (-d.x).atan2(-d.z);
        }
    }
}

impl Viewpoint for FreeCamera {
    fn is_captured(&self) -> bool {
        self.captured
    }

    fn lock(&mut self) {
        if !self.captured {
            log::debug!("Pointer lock ACQUIRED");
        }
        self.captured = true;
    }

    fn unlock(&mut self) {
        if self.captured {
            log::debug!("Pointer lock RELEASED");
        }
        self.captured = false;
    }

    fn move_forward(&mut self, amount: f32) {
        self.pos += self.ground_forward() * amount;
    }

    fn move_right(&mut self, amount: f32) {
        self.pos += self.ground_right() * amount;
    }

    fn position(&self) -> Vec3 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    fn facing(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-self.yaw.sin() * cp, sp, -self.yaw.cos() * cp)
    }
}
