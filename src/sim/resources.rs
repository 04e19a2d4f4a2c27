//! Player resource model
//!
//! Countdown clock, adrenaline, stamina and flashlight battery, integrated
//! once per frame. Adrenaline is applied before stamina because it overrides
//! the sprint drain entirely.

use super::state::{GameState, LossCause};
use crate::consts::{FLASHLIGHT_INTENSITY, RESOURCE_MAX};

/// Advance all resources by `dt` seconds
///
/// `moving` is true while any direction key is held. Returns the loss cause
/// when the clock runs out with notes still missing.
pub fn update_resources(state: &mut GameState, dt: f32, moving: bool) -> Option<LossCause> {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let tuning = &state.tuning;

    // Clock
    state.time_left = (state.time_left - dt).clamp(0.0, state.max_time);
    let expired = state.time_left <= 0.0 && !state.all_notes_collected();

    // Adrenaline overrides stamina drain
    if state.adrenaline > 0.0 {
        state.adrenaline = (state.adrenaline - tuning.adrenaline_rate * dt).max(0.0);
        state.stamina = RESOURCE_MAX;
    } else if state.sprint_requested && moving {
        state.stamina -= tuning.stamina_drain_rate * dt;
        if state.stamina <= 0.0 {
            state.stamina = 0.0;
            state.sprint_requested = false;
        }
    } else {
        state.stamina = (state.stamina + tuning.stamina_regen_rate * dt).min(RESOURCE_MAX);
    }

    // Battery
    if state.flashlight.on {
        state.battery = (state.battery - tuning.battery_drain_rate * dt).max(0.0);
        state.flashlight.intensity = if state.battery <= 0.0 || state.flashlight.flicker_dark {
            0.0
        } else {
            FLASHLIGHT_INTENSITY
        };
    } else {
        state.battery = (state.battery + tuning.battery_regen_rate * dt).min(RESOURCE_MAX);
        state.flashlight.intensity = 0.0;
    }

    state.stamina = state.stamina.clamp(0.0, RESOURCE_MAX);
    state.battery = state.battery.clamp(0.0, RESOURCE_MAX);
    state.adrenaline = state.adrenaline.clamp(0.0, RESOURCE_MAX);

    expired.then_some(LossCause::TimeUp)
}
