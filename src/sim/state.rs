//! Game state and core simulation types
//!
//! One mutable record owned by the session. Everything the simulation knows
//! about a run lives here, including the outstanding timers and the queue of
//! events waiting to be forwarded to the frontend.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::events::RandomSource;
use super::timers::TimerRegistry;
use crate::audio::Sound;
use crate::consts::*;
use crate::tuning::Tuning;

/// Monster behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonsterState {
    /// Parked off-world, no per-frame motion
    #[default]
    Hidden,
    /// Visible behind the player but not yet moving
    Approaching,
    /// Pursuing the player every frame
    Chasing,
}

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// Clock ran out before the last note
    TimeUp,
    /// Monster got within capture distance
    Captured,
}

/// Session result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Playing,
    Won,
    Lost(LossCause),
}

/// Full-screen overlays driven by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Overlay {
    /// White flash during a jump-scare
    Flash,
    /// Blood vignette
    Blood,
    /// Visual static
    Static,
    /// Adrenaline bar wrapper
    AdrenalineBar,
    DeathScreen,
    WinScreen,
}

/// Message text color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    Pale,
    Red,
    Cyan,
    Green,
}

impl Tint {
    pub fn hex(&self) -> u32 {
        match self {
            Tint::Pale => 0xffcccc,
            Tint::Red => 0xff0000,
            Tint::Cyan => 0x00ffff,
            Tint::Green => 0x00ff00,
        }
    }
}

/// Something the frontend should present
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(Sound),
    Message {
        text: &'static str,
        duration_ms: u32,
        tint: Tint,
    },
    /// Shown on every even note count
    Checkpoint,
    Overlay {
        overlay: Overlay,
        visible: bool,
    },
    /// Ambient drone volume
    DroneGain(f32),
    NoteCollected {
        count: u32,
    },
    Won,
    Lost(LossCause),
}

/// Where the player stands and looks, read from the viewpoint each call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    pub position: Vec3,
    /// Unit look direction (may have a vertical component)
    pub facing: Vec3,
}

impl Default for PlayerPose {
    fn default() -> Self {
        Self {
            position: PLAYER_SPAWN,
            facing: Vec3::NEG_Z,
        }
    }
}

/// A collectible note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u32,
    pub pos: Vec3,
    pub collected: bool,
}

/// The antagonist actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vec3,
    /// Horizontal unit vector the monster faces
    pub facing: Vec3,
}

impl Default for Monster {
    fn default() -> Self {
        Self {
            pos: MONSTER_PARKED,
            facing: Vec3::Z,
        }
    }
}

impl Monster {
    /// Move off-world
    pub fn park(&mut self) {
        self.pos = MONSTER_PARKED;
    }

    pub fn is_parked(&self) -> bool {
        self.pos == MONSTER_PARKED
    }

    /// Turn toward a point on the ground plane
    pub fn look_at(&mut self, target: Vec3) {
        let dir = crate::flatten(target - self.pos).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.facing = dir;
        }
    }
}

/// Flashlight state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashlight {
    pub on: bool,
    /// Light output this frame
    pub intensity: f32,
    /// Current flicker step is dark
    pub flicker_dark: bool,
    /// Flicker steps still to run
    pub flicker_steps_left: u32,
}

impl Default for Flashlight {
    fn default() -> Self {
        Self {
            on: true,
            intensity: FLASHLIGHT_INTENSITY,
            flicker_dark: false,
            flicker_steps_left: 0,
        }
    }
}

/// Scene parameters the effects play with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub fog_color: u32,
    pub background: u32,
    pub fog_density: f32,
}

impl Environment {
    pub fn new(fog_density: f32) -> Self {
        Self {
            fog_color: FOG_COLOR,
            background: FOG_COLOR,
            fog_density,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance table
    pub tuning: Tuning,
    pub notes_collected: u32,
    pub notes_required: u32,
    /// Notes still in the world
    pub notes: Vec<Note>,
    pub outcome: Outcome,
    pub monster_state: MonsterState,
    pub monster: Monster,
    /// Sprint key intent, independent of whether sprinting is possible
    pub sprint_requested: bool,
    pub stamina: f32,
    pub battery: f32,
    pub adrenaline: f32,
    /// Camera FOV wobble
    pub panic_mode: bool,
    /// Reserved for an inverted-controls effect; no event sets it yet
    pub inverted_mode: bool,
    pub time_left: f32,
    pub max_time: f32,
    pub flashlight: Flashlight,
    pub environment: Environment,
    /// Movement controller velocity (x = strafe, z = forward axis)
    pub velocity: Vec3,
    /// Simulated seconds since the session began (animations)
    pub elapsed: f32,
    /// Outstanding delayed actions
    pub timers: TimerRegistry,
    /// Events not yet forwarded to the frontend
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state and scatter the notes
    pub fn new(tuning: Tuning, rng: &mut dyn RandomSource) -> Self {
        let environment = Environment::new(tuning.fog_density);
        let mut state = Self {
            tuning,
            notes_collected: 0,
            notes_required: NOTES_REQUIRED,
            notes: Vec::new(),
            outcome: Outcome::Playing,
            monster_state: MonsterState::Hidden,
            monster: Monster::default(),
            sprint_requested: false,
            stamina: RESOURCE_MAX,
            battery: RESOURCE_MAX,
            adrenaline: 0.0,
            panic_mode: false,
            inverted_mode: false,
            time_left: MAX_TIME,
            max_time: MAX_TIME,
            flashlight: Flashlight::default(),
            environment,
            velocity: Vec3::ZERO,
            elapsed: 0.0,
            timers: TimerRegistry::new(),
            events: Vec::new(),
            next_id: 1,
        };

        for _ in 0..state.notes_required {
            let pos = super::progress::scatter_position(rng);
            let id = state.next_entity_id();
            state.notes.push(Note {
                id,
                pos,
                collected: false,
            });
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Win or loss has been decided; simulation is frozen until respawn
    pub fn is_game_over(&self) -> bool {
        self.outcome != Outcome::Playing
    }

    pub fn all_notes_collected(&self) -> bool {
        self.notes_collected >= self.notes_required
    }

    /// Queue a frontend event
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, sound: Sound) {
        self.emit(GameEvent::Sound(sound));
    }

    pub fn message(&mut self, text: &'static str, duration_ms: u32, tint: Tint) {
        self.emit(GameEvent::Message {
            text,
            duration_ms,
            tint,
        });
    }

    pub fn overlay(&mut self, overlay: Overlay, visible: bool) {
        self.emit(GameEvent::Overlay { overlay, visible });
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Camera field of view in degrees (wobbles in panic mode)
    pub fn field_of_view(&self, reduced_motion: bool) -> f32 {
        if self.panic_mode && !reduced_motion {
            // One wobble every 2π/10 seconds
            BASE_FOV + (self.elapsed * 10.0).sin() * 10.0
        } else {
            BASE_FOV
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_state_defaults() {
        let mut rng = Pcg32::seed_from_u64(7);
        let state = GameState::new(Tuning::default(), &mut rng);
        assert_eq!(state.notes.len(), NOTES_REQUIRED as usize);
        assert_eq!(state.notes_collected, 0);
        assert_eq!(state.monster_state, MonsterState::Hidden);
        assert!(state.monster.is_parked());
        assert_eq!(state.stamina, 100.0);
        assert_eq!(state.battery, 100.0);
        assert_eq!(state.time_left, 600.0);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_note_ids_unique() {
        let mut rng = Pcg32::seed_from_u64(7);
        let state = GameState::new(Tuning::default(), &mut rng);
        let mut ids: Vec<u32> = state.notes.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), state.notes.len());
    }

    #[test]
    fn test_fov_wobble_only_in_panic() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::new(Tuning::default(), &mut rng);
        state.elapsed = 0.3;
        assert_eq!(state.field_of_view(false), BASE_FOV);
        state.panic_mode = true;
        assert_ne!(state.field_of_view(false), BASE_FOV);
        assert_eq!(state.field_of_view(true), BASE_FOV);
    }

    #[test]
    fn test_monster_look_at_is_horizontal() {
        let mut monster = Monster {
            pos: Vec3::new(0.0, MONSTER_HEIGHT, 0.0),
            facing: Vec3::Z,
        };
        monster.look_at(Vec3::new(3.0, 10.0, 4.0));
        assert!((monster.facing - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
    }
}
