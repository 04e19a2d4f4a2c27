//! Milestone dispatch and transient scare effects
//!
//! Note 7 starts the chase, the last note decides the run, every other count
//! draws one effect uniformly from the pool. Each effect reverses itself via
//! a timer in its own group, so triggering it again restarts the duration.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::monster;
use super::state::{GameState, LossCause, Outcome, Overlay, PlayerPose, Tint};
use super::tick::resolve;
use super::timers::{TimerAction, TimerGroup, secs};
use crate::audio::Sound;
use crate::consts::*;

/// Note count that starts the chase
pub const CHASE_MILESTONE: u32 = 7;

/// Flicker steps per flicker effect (on/off pairs plus the last step)
const FLICKER_STEPS: u32 = 11;
const FLICKER_PERIOD_SECS: f32 = 0.1;

/// Source of randomness for effect selection and flicker
pub trait RandomSource {
    /// Uniform index in `0..len`
    fn pick(&mut self, len: usize) -> usize;
    /// Uniform value in `[0, 1)`
    fn chance(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len.max(1))
    }

    fn chance(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Short-lived, self-reversing scares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransientEffect {
    /// Monster right in front of the camera
    JumpScare,
    /// Red fog and blood vignette
    Blood,
    /// Flashlight stutters
    Flicker,
    /// FOV wobble
    Panic,
    /// Whisper sound with visual static
    Whispers,
    /// Fog and background turn pale
    FogInversion,
}

impl TransientEffect {
    /// The effect pool, in selection order
    pub const ALL: [TransientEffect; 6] = [
        TransientEffect::JumpScare,
        TransientEffect::Blood,
        TransientEffect::Flicker,
        TransientEffect::Panic,
        TransientEffect::Whispers,
        TransientEffect::FogInversion,
    ];
}

/// What a milestone turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    ChaseStart,
    Finale(Outcome),
    Effect(TransientEffect),
    /// Session already over or count out of range
    Ignored,
}

/// Uniform index into a pool of `pool_size` entries
pub fn select_effect(pool_size: usize, rng: &mut dyn RandomSource) -> usize {
    rng.pick(pool_size).min(pool_size.saturating_sub(1))
}

/// React to the note count reaching `count`
pub fn on_milestone(
    state: &mut GameState,
    count: u32,
    pose: &PlayerPose,
    rng: &mut dyn RandomSource,
) -> Milestone {
    if state.is_game_over() {
        log::warn!("Milestone {} after the session ended, ignoring", count);
        return Milestone::Ignored;
    }

    if count == CHASE_MILESTONE {
        monster::start_chase(state, pose);
        return Milestone::ChaseStart;
    }

    if count == state.notes_required {
        let outcome = if state.time_left > 0.0 {
            Outcome::Won
        } else {
            Outcome::Lost(LossCause::TimeUp)
        };
        resolve(state, outcome);
        return Milestone::Finale(outcome);
    }

    if count == 0 || count > state.notes_required {
        return Milestone::Ignored;
    }

    let effect = TransientEffect::ALL[select_effect(TransientEffect::ALL.len(), rng)];
    log::debug!("Milestone {} -> {:?}", count, effect);
    apply_effect(state, effect, pose);
    Milestone::Effect(effect)
}

/// Start an effect, restarting its reversal if one is already pending
pub fn apply_effect(state: &mut GameState, effect: TransientEffect, pose: &PlayerPose) {
    let group = TimerGroup::Effect(effect);
    state.timers.cancel_group(group);

    match effect {
        TransientEffect::JumpScare => {
            monster::jump_scare(state, pose);
            state.play(Sound::Scream);
            state.overlay(Overlay::Flash, true);
            state
                .timers
                .schedule_once(group, secs(0.8), TimerAction::EndJumpScare);
        }
        TransientEffect::Blood => {
            state.message("BLOOD", 4000, Tint::Red);
            state.overlay(Overlay::Blood, true);
            state.environment.fog_color = BLOOD_FOG_COLOR;
            state.play(Sound::Scream);
            state
                .timers
                .schedule_once(group, secs(5.0), TimerAction::EndBlood);
        }
        TransientEffect::Flicker => {
            state.message("The light is unstable.", 3000, Tint::Pale);
            state.flashlight.flicker_steps_left = FLICKER_STEPS;
            state
                .timers
                .schedule_every(group, secs(FLICKER_PERIOD_SECS), TimerAction::FlickerStep);
        }
        TransientEffect::Panic => {
            state.message("Dizziness...", 4000, Tint::Pale);
            state.panic_mode = true;
            state
                .timers
                .schedule_once(group, secs(8.0), TimerAction::EndPanic);
        }
        TransientEffect::Whispers => {
            state.message("They whisper...", 4000, Tint::Pale);
            state.play(Sound::Whisper);
            state.overlay(Overlay::Static, true);
            state
                .timers
                .schedule_once(group, secs(1.0), TimerAction::EndStatic);
        }
        TransientEffect::FogInversion => {
            state.message("Eyes adjusting to the dark?", 4000, Tint::Pale);
            state.environment.fog_color = INVERTED_FOG_COLOR;
            state.environment.background = INVERTED_BACKGROUND_COLOR;
            state
                .timers
                .schedule_once(group, secs(5.0), TimerAction::EndFogInversion);
        }
    }
}

/// One flicker step: randomly dark or lit, with a click
pub fn flicker_step(state: &mut GameState, rng: &mut dyn RandomSource) {
    if state.flashlight.flicker_steps_left == 0 {
        state
            .timers
            .cancel_group(TimerGroup::Effect(TransientEffect::Flicker));
        state.flashlight.flicker_dark = false;
        return;
    }

    state.flashlight.flicker_dark = rng.chance() > 0.5;
    state.play(Sound::Flicker);
    state.flashlight.flicker_steps_left -= 1;

    if state.flashlight.flicker_steps_left == 0 {
        state
            .timers
            .cancel_group(TimerGroup::Effect(TransientEffect::Flicker));
        state.flashlight.flicker_dark = false;
    }
}

/// Undo a timed effect
pub fn end_effect(state: &mut GameState, action: TimerAction) {
    match action {
        TimerAction::EndJumpScare => {
            monster::end_jump_scare(state);
            state.overlay(Overlay::Flash, false);
        }
        TimerAction::EndBlood => {
            state.overlay(Overlay::Blood, false);
            state.environment.fog_color = FOG_COLOR;
        }
        TimerAction::EndPanic => state.panic_mode = false,
        TimerAction::EndStatic => state.overlay(Overlay::Static, false),
        TimerAction::EndFogInversion => {
            state.environment.fog_color = FOG_COLOR;
            state.environment.background = FOG_COLOR;
        }
        other => log::warn!("{:?} is not an effect reversal", other),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sim::state::{GameEvent, MonsterState};
    use crate::sim::tick::run_timers;
    use crate::tuning::Tuning;
    use glam::Vec3;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Replays scripted picks, counting how often it was consulted
    pub(crate) struct ScriptedPicks {
        pub picks: VecDeque<usize>,
        pub calls: usize,
    }

    impl ScriptedPicks {
        pub(crate) fn new(picks: &[usize]) -> Self {
            Self {
                picks: picks.iter().copied().collect(),
                calls: 0,
            }
        }
    }

    impl RandomSource for ScriptedPicks {
        fn pick(&mut self, len: usize) -> usize {
            self.calls += 1;
            self.picks.pop_front().unwrap_or(0) % len
        }

        fn chance(&mut self) -> f32 {
            0.75
        }
    }

    fn new_state() -> GameState {
        let mut rng = Pcg32::seed_from_u64(21);
        GameState::new(Tuning::default(), &mut rng)
    }

    #[test]
    fn test_select_effect_uses_source() {
        let mut picks = ScriptedPicks::new(&[4, 2]);
        assert_eq!(select_effect(6, &mut picks), 4);
        assert_eq!(select_effect(6, &mut picks), 2);
        assert_eq!(picks.calls, 2);
    }

    #[test]
    fn test_select_effect_is_roughly_uniform() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut hits = [0u32; 6];
        for _ in 0..6000 {
            hits[select_effect(6, &mut rng)] += 1;
        }
        assert!(hits.iter().all(|&h| h > 800 && h < 1200), "{hits:?}");
    }

    #[test]
    fn test_chase_milestone_skips_pool() {
        let mut state = new_state();
        let mut picks = ScriptedPicks::new(&[]);
        let result = on_milestone(&mut state, CHASE_MILESTONE, &PlayerPose::default(), &mut picks);
        assert_eq!(result, Milestone::ChaseStart);
        assert_eq!(state.monster_state, MonsterState::Approaching);
        assert_eq!(picks.calls, 0);
    }

    #[test]
    fn test_finale_win_and_loss() {
        let mut state = new_state();
        state.time_left = 1.0;
        let mut picks = ScriptedPicks::new(&[]);
        assert_eq!(
            on_milestone(&mut state, 10, &PlayerPose::default(), &mut picks),
            Milestone::Finale(Outcome::Won)
        );
        assert_eq!(state.outcome, Outcome::Won);

        let mut state = new_state();
        state.time_left = 0.0;
        assert_eq!(
            on_milestone(&mut state, 10, &PlayerPose::default(), &mut picks),
            Milestone::Finale(Outcome::Lost(LossCause::TimeUp))
        );
        assert!(state.is_game_over());
        assert_eq!(picks.calls, 0);
    }

    #[test]
    fn test_milestone_after_game_over_ignored() {
        let mut state = new_state();
        resolve(&mut state, Outcome::Lost(LossCause::Captured));
        let mut picks = ScriptedPicks::new(&[]);
        assert_eq!(
            on_milestone(&mut state, CHASE_MILESTONE, &PlayerPose::default(), &mut picks),
            Milestone::Ignored
        );
        assert_eq!(state.monster_state, MonsterState::Hidden);
    }

    #[test]
    fn test_blood_reverts_after_five_seconds() {
        let mut state = new_state();
        let mut picks = ScriptedPicks::new(&[1]);
        let pose = PlayerPose::default();
        assert_eq!(
            on_milestone(&mut state, 1, &pose, &mut picks),
            Milestone::Effect(TransientEffect::Blood)
        );
        assert_eq!(state.environment.fog_color, BLOOD_FOG_COLOR);

        state.timers.advance(secs(4.9));
        run_timers(&mut state, &mut picks);
        assert_eq!(state.environment.fog_color, BLOOD_FOG_COLOR);

        state.timers.advance(secs(0.1));
        run_timers(&mut state, &mut picks);
        assert_eq!(state.environment.fog_color, FOG_COLOR);
        assert!(state.drain_events().contains(&GameEvent::Overlay {
            overlay: Overlay::Blood,
            visible: false
        }));
    }

    #[test]
    fn test_retrigger_restarts_duration() {
        let mut state = new_state();
        let pose = PlayerPose::default();
        let mut picks = ScriptedPicks::new(&[]);

        apply_effect(&mut state, TransientEffect::Panic, &pose);
        state.timers.advance(secs(6.0));
        run_timers(&mut state, &mut picks);
        apply_effect(&mut state, TransientEffect::Panic, &pose);
        assert_eq!(state.timers.len(), 1);

        // The first reversal would have fired at 8s
        state.timers.advance(secs(3.0));
        run_timers(&mut state, &mut picks);
        assert!(state.panic_mode);

        state.timers.advance(secs(5.0));
        run_timers(&mut state, &mut picks);
        assert!(!state.panic_mode);
    }

    #[test]
    fn test_flicker_runs_eleven_steps() {
        let mut state = new_state();
        let pose = PlayerPose::default();
        let mut picks = ScriptedPicks::new(&[]);
        apply_effect(&mut state, TransientEffect::Flicker, &pose);
        state.drain_events();

        state.timers.advance(secs(2.0));
        run_timers(&mut state, &mut picks);
        let clicks = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Sound(Sound::Flicker))
            .count();
        assert_eq!(clicks, 11);
        assert!(!state.flashlight.flicker_dark);
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_jump_scare_in_front_then_parked() {
        let mut state = new_state();
        let pose = PlayerPose {
            position: Vec3::new(10.0, EYE_HEIGHT, 0.0),
            facing: Vec3::X,
        };
        let mut picks = ScriptedPicks::new(&[]);
        apply_effect(&mut state, TransientEffect::JumpScare, &pose);
        assert!((state.monster.pos - Vec3::new(11.5, MONSTER_HEIGHT, 0.0)).length() < 1e-5);
        assert_eq!(state.monster_state, MonsterState::Hidden);

        state.timers.advance(secs(0.8));
        run_timers(&mut state, &mut picks);
        assert!(state.monster.is_parked());
    }
}
