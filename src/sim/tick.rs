//! Per-frame simulation step
//!
//! A frame is split in two around the viewpoint move: `step_player`
//! integrates resources and produces the camera displacement, `step_world`
//! then moves the monster toward where the player ended up. Timers run on
//! the same simulated clock through `advance_timers`.

use super::events::{self, RandomSource};
use super::monster;
use super::movement::{self, Displacement, MoveIntent};
use super::resources::update_resources;
use super::state::{GameEvent, GameState, MonsterState, Outcome, Overlay, PlayerPose, Tint};
use super::timers::{TimerAction, secs};
use crate::audio::Sound;
use crate::consts::*;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Direction keys held
    pub movement: MoveIntent,
}

/// Resources and movement. Returns `None` once the session is over.
pub fn step_player(state: &mut GameState, input: &TickInput, dt: f32) -> Option<Displacement> {
    if state.is_game_over() {
        return None;
    }
    state.elapsed += dt;

    if let Some(cause) = update_resources(state, dt, input.movement.any()) {
        resolve(state, Outcome::Lost(cause));
        return None;
    }
    Some(movement::update_movement(state, &input.movement, dt))
}

/// Monster pursuit and the win/loss predicates, after the player moved
pub fn step_world(state: &mut GameState, player: &PlayerPose, dt: f32) {
    if state.is_game_over() {
        return;
    }

    if let Some(cause) = monster::update_monster(state, player.position, dt) {
        resolve(state, Outcome::Lost(cause));
        return;
    }

    if state.all_notes_collected() && state.time_left > 0.0 {
        resolve(state, Outcome::Won);
    }
}

/// Move the timer clock forward and fire whatever came due
pub fn advance_timers(state: &mut GameState, dt: f32, rng: &mut dyn RandomSource) {
    state.timers.advance(secs(dt));
    run_timers(state, rng);
}

/// Fire due timers one at a time, so a handler can cancel the rest
pub fn run_timers(state: &mut GameState, rng: &mut dyn RandomSource) {
    while let Some(fired) = state.timers.pop_due() {
        log::trace!("Timer {:?} fired ({:?})", fired.action, fired.group);
        match fired.action {
            TimerAction::BeginPursuit => monster::begin_pursuit(state),
            TimerAction::ChaseTimeout => monster::chase_timeout(state),
            TimerAction::HeartbeatTick => monster::heartbeat_tick(state),
            TimerAction::ClearAdrenaline => monster::clear_adrenaline(state),
            TimerAction::FlickerStep => events::flicker_step(state, rng),
            TimerAction::EndJumpScare
            | TimerAction::EndBlood
            | TimerAction::EndPanic
            | TimerAction::EndStatic
            | TimerAction::EndFogInversion => events::end_effect(state, fired.action),
        }
    }
}

/// Decide the run. Later calls are ignored.
///
/// Pending effect reversals are dropped with the timers, so their
/// presentation is undone here before the end screen goes up.
pub fn resolve(state: &mut GameState, outcome: Outcome) {
    if state.is_game_over() || outcome == Outcome::Playing {
        return;
    }
    state.outcome = outcome;
    clear_presentation(state);

    match outcome {
        Outcome::Won => {
            log::info!(
                "Session won with {:.1}s left ({}/{} notes)",
                state.time_left,
                state.notes_collected,
                state.notes_required
            );
            state.overlay(Overlay::WinScreen, true);
            state.emit(GameEvent::Won);
        }
        Outcome::Lost(cause) => {
            log::info!("Session lost: {:?}", cause);
            state.overlay(Overlay::DeathScreen, true);
            state.play(Sound::Scream);
            state.emit(GameEvent::Lost(cause));
        }
        Outcome::Playing => {}
    }
}

/// Reset the player for another attempt
///
/// All timers are cancelled so nothing scheduled before the respawn can
/// touch the fresh state. Collected notes stay collected.
pub fn respawn(state: &mut GameState) {
    state.outcome = Outcome::Playing;
    state.stamina = RESOURCE_MAX;
    state.battery = RESOURCE_MAX;
    state.time_left = state.max_time;
    state.sprint_requested = false;
    reset_presentation(state);

    state.message("RESPAWNED", 3000, Tint::Green);
    log::info!(
        "Respawned ({}/{} notes kept)",
        state.notes_collected,
        state.notes_required
    );
}

/// Take down everything a run left on screen, end screens included
pub fn reset_presentation(state: &mut GameState) {
    clear_presentation(state);
    state.overlay(Overlay::DeathScreen, false);
    state.overlay(Overlay::WinScreen, false);
}

/// Cancel all timers and undo the chase and every transient effect
fn clear_presentation(state: &mut GameState) {
    state.timers.reset();

    state.monster_state = MonsterState::Hidden;
    state.monster.park();
    state.adrenaline = 0.0;
    state.panic_mode = false;
    state.inverted_mode = false;
    state.velocity = glam::Vec3::ZERO;
    state.flashlight.flicker_dark = false;
    state.flashlight.flicker_steps_left = 0;
    state.environment.fog_color = FOG_COLOR;
    state.environment.background = FOG_COLOR;

    for overlay in [
        Overlay::Blood,
        Overlay::Static,
        Overlay::Flash,
        Overlay::AdrenalineBar,
    ] {
        state.overlay(overlay, false);
    }
    state.emit(GameEvent::DroneGain(DRONE_GAIN_CALM));
}
