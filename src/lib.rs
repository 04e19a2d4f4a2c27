//! Dark Pines - A note hunt in a haunted forest
//!
//! Core modules:
//! - `sim`: Deterministic simulation (resources, notes, events, monster, timers)
//! - `session`: Orchestrates the simulation against the frontend collaborators
//! - `platform`: Viewpoint/input contract and a headless camera
//! - `audio`, `ui`, `renderer`: Collaborator contracts plus headless implementations
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use session::{Frontend, Session};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Notes needed to finish a session
    pub const NOTES_REQUIRED: u32 = 10;
    /// Session time limit in seconds
    pub const MAX_TIME: f32 = 600.0;

    /// Upper bound of stamina, battery and adrenaline
    pub const RESOURCE_MAX: f32 = 100.0;

    /// Camera height above the floor (no vertical physics)
    pub const EYE_HEIGHT: f32 = 1.7;
    /// Monster body center height
    pub const MONSTER_HEIGHT: f32 = 1.3;
    /// Notes hover at this height on their sticks
    pub const NOTE_HEIGHT: f32 = 1.5;

    /// Player is kept inside [-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT] on x and z
    pub const WORLD_HALF_EXTENT: f32 = 100.0;
    /// Notes are scattered inside this half extent
    pub const NOTE_SCATTER_HALF_EXTENT: f32 = 90.0;
    /// No note closer than this to the spawn point
    pub const NOTE_MIN_SPAWN_DISTANCE: f32 = 15.0;

    /// Where the player (re)spawns
    pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, EYE_HEIGHT, 0.0);
    /// Parking spot for the monster while it is not in play
    pub const MONSTER_PARKED: Vec3 = Vec3::new(0.0, -100.0, 0.0);

    /// Flashlight intensity while lit
    pub const FLASHLIGHT_INTENSITY: f32 = 1.2;
    /// Default camera field of view (degrees)
    pub const BASE_FOV: f32 = 75.0;

    /// Ambient drone gain outside and during a chase
    pub const DRONE_GAIN_CALM: f32 = 0.05;
    pub const DRONE_GAIN_CHASE: f32 = 0.2;

    /// Scene colors
    pub const FOG_COLOR: u32 = 0x020202;
    pub const BLOOD_FOG_COLOR: u32 = 0x550000;
    pub const INVERTED_FOG_COLOR: u32 = 0xffffff;
    pub const INVERTED_BACKGROUND_COLOR: u32 = 0xaaaaaa;
}

/// Drop the vertical component of a vector
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points measured on the ground plane
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}
