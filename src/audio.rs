//! Audio collaborator contract
//!
//! Procedurally generated sound effects - no external files needed! The
//! simulation only names sounds; a backend turns each `Sound` into
//! oscillators and noise following its `SoundRecipe`.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    /// Note picked up
    Pickup,
    /// Monster scream (jump-scare, blood, death)
    Scream,
    /// Band-passed noise whisper
    Whisper,
    /// Continuous ambient drone
    Drone,
    /// Low thump during the chase
    Heartbeat,
    /// Flashlight click
    Flicker,
}

/// Oscillator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// Noise layer filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseFilter {
    Lowpass(f32),
    Bandpass(f32),
}

/// How to synthesize a sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundRecipe {
    pub waveform: Option<Waveform>,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Peak gain before master volume
    pub gain: f32,
    /// Length in seconds; `None` loops until stopped
    pub duration: Option<f32>,
    pub noise: Option<NoiseFilter>,
}

impl Sound {
    pub fn recipe(&self) -> SoundRecipe {
        match self {
            Sound::Pickup => SoundRecipe {
                waveform: Some(Waveform::Sine),
                start_hz: 600.0,
                end_hz: 1200.0,
                gain: 0.2,
                duration: Some(0.5),
                noise: None,
            },
            Sound::Scream => SoundRecipe {
                waveform: Some(Waveform::Sawtooth),
                start_hz: 150.0,
                end_hz: 50.0,
                gain: 1.0,
                duration: Some(2.0),
                noise: Some(NoiseFilter::Lowpass(2000.0)),
            },
            Sound::Whisper => SoundRecipe {
                waveform: None,
                start_hz: 0.0,
                end_hz: 0.0,
                gain: 0.8,
                duration: Some(1.0),
                noise: Some(NoiseFilter::Bandpass(400.0)),
            },
            Sound::Drone => SoundRecipe {
                waveform: Some(Waveform::Sine),
                start_hz: 60.0,
                end_hz: 60.0,
                gain: crate::consts::DRONE_GAIN_CALM,
                duration: None,
                noise: None,
            },
            Sound::Heartbeat => SoundRecipe {
                waveform: Some(Waveform::Sine),
                start_hz: 50.0,
                end_hz: 1.0,
                gain: 0.8,
                duration: Some(0.15),
                noise: None,
            },
            Sound::Flicker => SoundRecipe {
                waveform: Some(Waveform::Square),
                start_hz: 50.0,
                end_hz: 50.0,
                gain: 0.1,
                duration: Some(0.05),
                noise: None,
            },
        }
    }

    /// Loops until stopped and hands back a voice handle
    pub fn is_continuous(&self) -> bool {
        self.recipe().duration.is_none()
    }
}

/// Handle to a continuous voice whose gain can be changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceHandle(pub u32);

/// Audio backend
pub trait AudioSink {
    /// Fire-and-forget; continuous sounds return a handle
    fn play(&mut self, sound: Sound) -> Option<VoiceHandle>;
    /// Adjust a continuous voice (gain before master volume)
    fn set_gain(&mut self, voice: VoiceHandle, gain: f32);
}

/// Headless audio manager: applies volume and records what would be heard
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    muted: bool,
    next_voice: u32,
    /// Continuous voices and their current effective gain
    voices: Vec<(VoiceHandle, Sound, f32)>,
    /// Sounds played so far with their effective peak gain
    pub played: Vec<(Sound, f32)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl AudioManager {
    pub fn new(master_volume: f32) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            muted: false,
            next_voice: 1,
            voices: Vec::new(),
            played: Vec::new(),
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Current effective gain of a voice
    pub fn voice_gain(&self, voice: VoiceHandle) -> Option<f32> {
        self.voices
            .iter()
            .find(|(h, _, _)| *h == voice)
            .map(|(_, _, g)| *g)
    }

    /// How many times a sound was played
    pub fn count(&self, sound: Sound) -> usize {
        self.played.iter().filter(|(s, _)| *s == sound).count()
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, sound: Sound) -> Option<VoiceHandle> {
        let recipe = sound.recipe();
        let gain = recipe.gain * self.effective_volume();
        log::debug!("Sound {:?} at gain {:.2}", sound, gain);
        self.played.push((sound, gain));

        if !sound.is_continuous() {
            return None;
        }
        let handle = VoiceHandle(self.next_voice);
        self.next_voice += 1;
        self.voices.push((handle, sound, gain));
        Some(handle)
    }

    fn set_gain(&mut self, voice: VoiceHandle, gain: f32) {
        let effective = gain.clamp(0.0, 1.0) * self.effective_volume();
        match self.voices.iter_mut().find(|(h, _, _)| *h == voice) {
            Some(entry) => entry.2 = effective,
            None => log::warn!("Gain change for unknown voice {:?}", voice),
        }
    }
}
