//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only (frame deltas and the timer registry clock)
//! - Injected randomness only (`RandomSource`)
//! - No rendering, audio or platform calls; presentation is queued as `GameEvent`s

pub mod events;
pub mod monster;
pub mod movement;
pub mod progress;
pub mod resources;
pub mod state;
pub mod tick;
pub mod timers;

pub use events::{CHASE_MILESTONE, Milestone, RandomSource, TransientEffect, on_milestone};
pub use movement::{Displacement, MoveIntent};
pub use progress::{collect_note, nearest_note_within};
pub use state::{
    GameEvent, GameState, LossCause, Monster, MonsterState, Note, Outcome, Overlay, PlayerPose,
    Tint,
};
pub use tick::{TickInput, advance_timers, respawn, step_player, step_world};
pub use timers::{TimerAction, TimerGroup, TimerHandle, TimerRegistry};
