//! Player movement controller
//!
//! Turns the four direction intents into a camera-relative displacement with
//! exponentially damped velocity, so starts and stops ease in and out.

use glam::Vec3;

use super::state::GameState;
use crate::consts::{EYE_HEIGHT, WORLD_HALF_EXTENT};

/// Direction keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Any direction key held
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Normalized intent (x = right, z = forward); zero when nothing or only opposite keys are held
    pub fn direction(&self) -> Vec3 {
        let x = self.right as i32 - self.left as i32;
        let z = self.forward as i32 - self.backward as i32;
        Vec3::new(x as f32, 0.0, z as f32).normalize_or_zero()
    }
}

/// Camera-relative move for this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Displacement {
    pub forward: f32,
    pub right: f32,
}

/// Sprint speed if sprint is requested and stamina or adrenaline allows it
pub fn effective_speed(state: &GameState) -> f32 {
    if state.sprint_requested && (state.stamina > 0.0 || state.adrenaline > 0.0) {
        state.tuning.sprint_speed
    } else {
        state.tuning.walk_speed
    }
}

/// Damp velocity, add this frame's acceleration and return the displacement
pub fn update_movement(state: &mut GameState, intent: &MoveIntent, dt: f32) -> Displacement {
    let speed = effective_speed(state);
    let decay = (state.tuning.damping * dt).min(1.0);

    let mut vel = state.velocity;
    vel.x -= vel.x * decay;
    vel.z -= vel.z * decay;

    let dir = intent.direction();
    if intent.forward || intent.backward {
        vel.z -= dir.z * speed * dt;
    }
    if intent.left || intent.right {
        vel.x -= dir.x * speed * dt;
    }
    vel.y = 0.0;
    state.velocity = vel;

    Displacement {
        forward: -vel.z * dt,
        right: -vel.x * dt,
    }
}

/// Pin the eye height and keep the player inside the world square
pub fn constrain_position(pos: Vec3) -> Vec3 {
    Vec3::new(
        pos.x.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
        EYE_HEIGHT,
        pos.z.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_state() -> GameState {
        let mut rng = Pcg32::seed_from_u64(3);
        GameState::new(Tuning::default(), &mut rng)
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let intent = MoveIntent {
            forward: true,
            backward: true,
            ..Default::default()
        };
        assert_eq!(intent.direction(), Vec3::ZERO);
        assert!(intent.any());
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let intent = MoveIntent {
            forward: true,
            right: true,
            ..Default::default()
        };
        assert!((intent.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_forward_accelerates_and_eases_out() {
        let mut state = new_state();
        let intent = MoveIntent {
            forward: true,
            ..Default::default()
        };
        let first = update_movement(&mut state, &intent, 0.016);
        let second = update_movement(&mut state, &intent, 0.016);
        assert!(first.forward > 0.0);
        assert!(second.forward > first.forward);
        assert_eq!(first.right, 0.0);

        // Release: still drifting forward, but slowing
        let coast1 = update_movement(&mut state, &MoveIntent::default(), 0.016);
        let coast2 = update_movement(&mut state, &MoveIntent::default(), 0.016);
        assert!(coast1.forward > 0.0);
        assert!(coast2.forward < coast1.forward);
    }

    #[test]
    fn test_sprint_needs_stamina_or_adrenaline() {
        let mut state = new_state();
        assert_eq!(effective_speed(&state), 38.0);
        state.sprint_requested = true;
        assert_eq!(effective_speed(&state), 95.0);
        state.stamina = 0.0;
        assert_eq!(effective_speed(&state), 38.0);
        state.adrenaline = 10.0;
        assert_eq!(effective_speed(&state), 95.0);
    }

    #[test]
    fn test_constrain_position() {
        let pos = constrain_position(Vec3::new(150.0, 9.0, -120.0));
        assert_eq!(pos, Vec3::new(100.0, EYE_HEIGHT, -100.0));
    }
}
