//! Monster state machine
//!
//! Hidden -> Approaching (3 s dread window) -> Chasing -> Hidden when the
//! chase times out. A capture ends the run instead. The jump-scare borrows
//! the actor without touching the state.

use glam::Vec3;

use super::state::{GameEvent, GameState, LossCause, MonsterState, Overlay, PlayerPose, Tint};
use super::timers::{TimerAction, TimerGroup, secs};
use crate::audio::Sound;
use crate::consts::*;
use crate::{flatten, planar_distance};

const HEARTBEAT_PERIOD_SECS: f32 = 0.5;
/// Adrenaline lingers this long after the chase ends
const ADRENALINE_COOLDOWN_SECS: f32 = 2.0;

/// Horizontal look direction, falling back to -Z when looking straight up or down
fn ground_facing(pose: &PlayerPose) -> Vec3 {
    flatten(pose.facing).normalize_or(Vec3::NEG_Z)
}

/// Teleport the monster behind the player and start the chase
///
/// Only valid from Hidden; anything else is a re-entrant trigger and is ignored.
pub fn start_chase(state: &mut GameState, pose: &PlayerPose) -> bool {
    if state.is_game_over() || state.monster_state != MonsterState::Hidden {
        log::warn!(
            "Chase start ignored (monster {:?}, outcome {:?})",
            state.monster_state,
            state.outcome
        );
        return false;
    }

    let behind = pose.position - ground_facing(pose) * state.tuning.spawn_distance;
    state.monster.pos = Vec3::new(behind.x, MONSTER_HEIGHT, behind.z);
    state.monster.look_at(pose.position);
    state.monster_state = MonsterState::Approaching;
    log::info!("Chase started, monster at {:?}", state.monster.pos);

    state.adrenaline = RESOURCE_MAX;
    state.timers.cancel_group(TimerGroup::Adrenaline);
    state.overlay(Overlay::AdrenalineBar, true);
    state.message("RUN! (15 sec)", 5000, Tint::Cyan);
    state.emit(GameEvent::DroneGain(DRONE_GAIN_CHASE));

    if !state.timers.group_pending(TimerGroup::Heartbeat) {
        state.timers.schedule_every(
            TimerGroup::Heartbeat,
            secs(HEARTBEAT_PERIOD_SECS),
            TimerAction::HeartbeatTick,
        );
    }

    state.timers.cancel_group(TimerGroup::Chase);
    let delay = secs(state.tuning.chase_delay);
    let duration = secs(state.tuning.chase_duration);
    state
        .timers
        .schedule_once(TimerGroup::Chase, delay, TimerAction::BeginPursuit);
    state
        .timers
        .schedule_once(TimerGroup::Chase, duration, TimerAction::ChaseTimeout);
    true
}

/// Approach delay is over
pub fn begin_pursuit(state: &mut GameState) {
    if state.is_game_over() || state.monster_state != MonsterState::Approaching {
        return;
    }
    state.monster_state = MonsterState::Chasing;
    log::info!("Monster is chasing");
}

/// Chase ran its full length; the player survived it
pub fn chase_timeout(state: &mut GameState) {
    if state.is_game_over() || state.all_notes_collected() {
        return;
    }
    end_chase(state);
}

/// Send the monster away and calm everything down
pub fn end_chase(state: &mut GameState) {
    state.monster_state = MonsterState::Hidden;
    state.monster.park();
    state.timers.cancel_group(TimerGroup::Chase);
    state.timers.cancel_group(TimerGroup::Heartbeat);
    log::info!("Chase over, player escaped");

    state.message("Silence...", 4000, Tint::Green);
    state.emit(GameEvent::DroneGain(DRONE_GAIN_CALM));
    state.timers.schedule_once(
        TimerGroup::Adrenaline,
        secs(ADRENALINE_COOLDOWN_SECS),
        TimerAction::ClearAdrenaline,
    );
}

/// Post-chase adrenaline cooldown finished
pub fn clear_adrenaline(state: &mut GameState) {
    state.adrenaline = 0.0;
    state.overlay(Overlay::AdrenalineBar, false);
}

/// One heartbeat; stops itself once the run is decided
pub fn heartbeat_tick(state: &mut GameState) {
    if state.is_game_over() || state.all_notes_collected() {
        state.timers.cancel_group(TimerGroup::Heartbeat);
        return;
    }
    state.play(Sound::Heartbeat);
}

/// Put the monster right in front of the camera
///
/// While the monster is in a chase it stays where it is.
pub fn jump_scare(state: &mut GameState, pose: &PlayerPose) -> bool {
    if state.monster_state != MonsterState::Hidden {
        return false;
    }
    let reach = state.tuning.jump_scare_distance;
    let front = pose.position + pose.facing.normalize_or(Vec3::NEG_Z) * reach;
    state.monster.pos = Vec3::new(front.x, MONSTER_HEIGHT, front.z);
    state.monster.look_at(pose.position);
    true
}

/// Jump-scare over: park the monster unless a chase has claimed it meanwhile
pub fn end_jump_scare(state: &mut GameState) {
    if state.monster_state == MonsterState::Hidden {
        state.monster.park();
    }
}

/// Per-frame pursuit; returns `Captured` once the monster is close enough
pub fn update_monster(state: &mut GameState, player: Vec3, dt: f32) -> Option<LossCause> {
    if state.monster_state != MonsterState::Chasing {
        return None;
    }

    let to_player = flatten(player - state.monster.pos);
    let dist = to_player.length();
    let step = (state.tuning.monster_speed * dt).min(dist);
    let next = state.monster.pos + to_player.normalize_or_zero() * step;
    state.monster.pos = Vec3::new(next.x, MONSTER_HEIGHT, next.z);
    state.monster.look_at(player);

    (planar_distance(state.monster.pos, player) < state.tuning.capture_distance)
        .then_some(LossCause::Captured)
}
