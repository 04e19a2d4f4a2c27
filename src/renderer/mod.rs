//! Renderer collaborator contract
//!
//! Each frame the session flattens the simulation into a `SceneView` and
//! hands it to the renderer, whatever the session phase.

use glam::Vec3;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{GameState, MonsterState};

/// Note bob/pulse speed (radians per second)
const NOTE_PULSE_RATE: f32 = 3.0;

/// A note as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteView {
    pub pos: Vec3,
    /// Uniform scale (pulses around 1.0)
    pub scale: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    /// Simulated seconds since start
    pub time: f32,
    pub camera_pos: Vec3,
    pub camera_facing: Vec3,
    pub fov: f32,
    pub flashlight_intensity: f32,
    pub fog_color: u32,
    pub fog_density: f32,
    pub background: u32,
    pub monster_pos: Vec3,
    pub monster_facing: Vec3,
    pub monster_state: MonsterState,
    pub notes: Vec<NoteView>,
}

impl SceneView {
    pub fn from_state(
        state: &GameState,
        camera_pos: Vec3,
        camera_facing: Vec3,
        settings: &Settings,
    ) -> Self {
        let scale = 1.0 + (state.elapsed * NOTE_PULSE_RATE).sin() * 0.1;
        Self {
            time: state.elapsed,
            camera_pos,
            camera_facing,
            fov: state.field_of_view(settings.reduced_motion),
            flashlight_intensity: state.flashlight.intensity,
            fog_color: state.environment.fog_color,
            fog_density: state.environment.fog_density,
            background: state.environment.background,
            monster_pos: state.monster.pos,
            monster_facing: state.monster.facing,
            monster_state: state.monster_state,
            notes: crate::sim::progress::remaining_notes(state)
                .map(|n| NoteView { pos: n.pos, scale })
                .collect(),
        }
    }
}

/// Rendering backend
pub trait Renderer {
    fn render_frame(&mut self, scene: &SceneView);
}

/// Headless renderer: counts frames and keeps the last scene
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub frames: u64,
    pub last: Option<SceneView>,
}

impl Renderer for FrameRecorder {
    fn render_frame(&mut self, scene: &SceneView) {
        self.frames += 1;
        self.last = Some(scene.clone());
    }
}
