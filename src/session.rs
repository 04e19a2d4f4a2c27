//! Game session orchestrator
//!
//! Owns the `GameState`, runs the frame loop against the frontend
//! collaborators and forwards queued simulation events to them. Win, loss
//! and respawn transitions that touch the frontend (pointer capture, camera
//! position) happen here.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioManager, AudioSink, Sound, VoiceHandle};
use crate::consts::PLAYER_SPAWN;
use crate::platform::{FreeCamera, Viewpoint};
use crate::renderer::{FrameRecorder, Renderer, SceneView};
use crate::settings::Settings;
use crate::sim::movement::constrain_position;
use crate::sim::tick::{self, TickInput};
use crate::sim::{
    GameEvent, GameState, Milestone, Outcome, Overlay, PlayerPose, RandomSource, collect_note,
    nearest_note_within, on_milestone,
};
use crate::tuning::Tuning;
use crate::ui::{Bar, ConsoleHud, Presenter};

/// The collaborators a session drives
pub struct Frontend<'a> {
    pub viewpoint: &'a mut dyn Viewpoint,
    pub audio: &'a mut dyn AudioSink,
    pub ui: &'a mut dyn Presenter,
    pub renderer: &'a mut dyn Renderer,
}

impl Frontend<'_> {
    fn pose(&self) -> PlayerPose {
        PlayerPose {
            position: self.viewpoint.position(),
            facing: self.viewpoint.facing(),
        }
    }
}

/// Windowless collaborators for the demo binary and tests
#[derive(Debug, Clone, Default)]
pub struct Headless {
    pub camera: FreeCamera,
    pub audio: AudioManager,
    pub hud: ConsoleHud,
    pub frames: FrameRecorder,
}

impl Headless {
    pub fn new(settings: &Settings) -> Self {
        Self {
            audio: AudioManager::new(settings.effective_volume()),
            ..Default::default()
        }
    }

    pub fn frontend(&mut self) -> Frontend<'_> {
        Frontend {
            viewpoint: &mut self.camera,
            audio: &mut self.audio,
            ui: &mut self.hud,
            renderer: &mut self.frames,
        }
    }
}

/// One play session
pub struct Session<R: RandomSource = Pcg32> {
    state: GameState,
    settings: Settings,
    rng: R,
    drone: Option<VoiceHandle>,
}

impl Session<Pcg32> {
    /// Seeded session
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        log::info!("Session seed: {}", seed);
        Self::with_random(Pcg32::seed_from_u64(seed), tuning, settings)
    }
}

impl<R: RandomSource> Session<R> {
    /// Session with an injected random source
    pub fn with_random(mut rng: R, tuning: Tuning, settings: Settings) -> Self {
        let state = GameState::new(tuning, &mut rng);
        Self {
            state,
            settings,
            rng,
            drone: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start button: capture input, reset the clock, start the ambient drone
    pub fn start(&mut self, fe: &mut Frontend<'_>) {
        self.state.time_left = self.state.max_time;
        fe.viewpoint.lock();
        if self.drone.is_none() {
            self.drone = fe.audio.play(Sound::Drone);
        }
        fe.ui.set_note_counter(self.state.notes_collected, self.state.notes_required);
        log::info!("Session started");
    }

    /// Sprint key held or released
    pub fn set_sprint(&mut self, held: bool) {
        self.state.sprint_requested = held;
    }

    pub fn toggle_flashlight(&mut self, fe: &mut Frontend<'_>) {
        if self.state.is_game_over() {
            return;
        }
        self.state.flashlight.on = !self.state.flashlight.on;
        self.state.play(Sound::Flicker);
        self.flush(fe);
    }

    /// Pick up the nearest note within reach of the camera
    pub fn interact(&mut self, fe: &mut Frontend<'_>) -> Option<Milestone> {
        if !fe.viewpoint.is_captured() || self.state.is_game_over() {
            return None;
        }
        let reach = self.state.tuning.interact_distance;
        let id = nearest_note_within(&self.state, fe.viewpoint.position(), reach)?;
        self.collect(id, fe)
    }

    /// Collect a note the caller has checked is within reach
    pub fn collect(&mut self, note_id: u32, fe: &mut Frontend<'_>) -> Option<Milestone> {
        if self.state.is_game_over() {
            return None;
        }
        let count = collect_note(&mut self.state, note_id)?;
        let pose = fe.pose();
        let milestone = on_milestone(&mut self.state, count, &pose, &mut self.rng);
        self.flush(fe);
        Some(milestone)
    }

    /// Run one frame
    ///
    /// The simulation only advances while input is captured and the session
    /// is live; timers always run and a frame is always rendered.
    pub fn frame(&mut self, raw_dt: f32, input: &TickInput, fe: &mut Frontend<'_>) {
        let dt = self.state.tuning.clamp_delta(raw_dt);
        if raw_dt > self.state.tuning.max_frame_delta {
            log::debug!("Frame delta {:.3}s clamped to {:.3}s", raw_dt, dt);
        }

        if fe.viewpoint.is_captured() && !self.state.is_game_over() {
            if let Some(disp) = tick::step_player(&mut self.state, input, dt) {
                fe.viewpoint.move_right(disp.right);
                fe.viewpoint.move_forward(disp.forward);
                let pos = constrain_position(fe.viewpoint.position());
                fe.viewpoint.set_position(pos);

                let pose = fe.pose();
                tick::step_world(&mut self.state, &pose, dt);
            }
        }

        tick::advance_timers(&mut self.state, dt, &mut self.rng);
        self.flush(fe);
        self.push_hud(fe);

        let scene = SceneView::from_state(
            &self.state,
            fe.viewpoint.position(),
            fe.viewpoint.facing(),
            &self.settings,
        );
        fe.renderer.render_frame(&scene);
    }

    /// Back to the spawn point for another attempt
    ///
    /// Only offered from the death screen; returns `false` otherwise.
    pub fn respawn(&mut self, fe: &mut Frontend<'_>) -> bool {
        if !matches!(self.state.outcome, Outcome::Lost(_)) {
            log::warn!("Respawn ignored (outcome {:?})", self.state.outcome);
            return false;
        }
        tick::respawn(&mut self.state);
        fe.viewpoint.set_position(PLAYER_SPAWN);
        fe.viewpoint.lock();
        self.flush(fe);
        true
    }

    /// Throw the run away and scatter a fresh set of notes
    pub fn restart(&mut self, fe: &mut Frontend<'_>) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(tuning, &mut self.rng);
        tick::reset_presentation(&mut self.state);
        self.flush(fe);
        fe.viewpoint.set_position(PLAYER_SPAWN);
        self.start(fe);
        log::info!("Session restarted");
    }

    /// Forward queued simulation events to the collaborators
    fn flush(&mut self, fe: &mut Frontend<'_>) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(sound) => {
                    fe.audio.play(sound);
                }
                GameEvent::Message {
                    text,
                    duration_ms,
                    tint,
                } => fe.ui.show_message(text, duration_ms, tint),
                GameEvent::Checkpoint => fe.ui.show_checkpoint(),
                GameEvent::Overlay {
                    overlay: Overlay::Flash,
                    visible: true,
                } if self.settings.reduced_motion => {}
                GameEvent::Overlay { overlay, visible } => {
                    fe.ui.set_overlay_visible(overlay, visible)
                }
                GameEvent::DroneGain(gain) => {
                    if let Some(drone) = self.drone {
                        fe.audio.set_gain(drone, gain);
                    }
                }
                GameEvent::NoteCollected { count } => {
                    fe.ui.set_note_counter(count, self.state.notes_required)
                }
                GameEvent::Won | GameEvent::Lost(_) => fe.viewpoint.unlock(),
            }
        }
    }

    fn push_hud(&self, fe: &mut Frontend<'_>) {
        if !self.settings.show_bars {
            return;
        }
        let s = &self.state;
        fe.ui.set_bar_fill(Bar::Stamina, s.stamina);
        fe.ui.set_bar_fill(Bar::Battery, s.battery);
        fe.ui.set_bar_fill(Bar::Adrenaline, s.adrenaline);
        fe.ui.set_bar_fill(Bar::Time, s.time_left / s.max_time * 100.0);
    }
}
