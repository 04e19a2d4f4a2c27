//! Presentation collaborator contract
//!
//! One-way: the session pushes messages, overlays and bar fills, and never
//! reads UI state back.

use std::collections::HashSet;

pub use crate::sim::{Overlay, Tint};

/// HUD bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bar {
    Stamina,
    Battery,
    Adrenaline,
    Time,
}

impl Bar {
    fn index(&self) -> usize {
        match self {
            Bar::Stamina => 0,
            Bar::Battery => 1,
            Bar::Adrenaline => 2,
            Bar::Time => 3,
        }
    }
}

/// Battery bar turns red below this fill
pub const BATTERY_WARNING_PERCENT: f32 = 20.0;

/// UI backend
pub trait Presenter {
    /// Show `text` for `duration_ms`, replacing any current message
    fn show_message(&mut self, text: &str, duration_ms: u32, tint: Tint);
    /// Brief "checkpoint" banner
    fn show_checkpoint(&mut self);
    fn set_overlay_visible(&mut self, overlay: Overlay, visible: bool);
    /// Fill a bar, 0 - 100
    fn set_bar_fill(&mut self, bar: Bar, percent: f32);
    fn set_note_counter(&mut self, collected: u32, required: u32);
}

/// Headless HUD that logs what a player would see
#[derive(Debug, Clone, Default)]
pub struct ConsoleHud {
    pub last_message: Option<(String, Tint)>,
    pub checkpoints: u32,
    pub overlays: HashSet<Overlay>,
    pub bars: [f32; 4],
    pub note_counter: String,
}

impl ConsoleHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bar(&self, bar: Bar) -> f32 {
        self.bars[bar.index()]
    }

    pub fn is_visible(&self, overlay: Overlay) -> bool {
        self.overlays.contains(&overlay)
    }

    /// Battery bar should be drawn in its warning color
    pub fn battery_warning(&self) -> bool {
        self.bar(Bar::Battery) < BATTERY_WARNING_PERCENT
    }
}

impl Presenter for ConsoleHud {
    fn show_message(&mut self, text: &str, duration_ms: u32, tint: Tint) {
        log::info!("[#{:06x} {}ms] {}", tint.hex(), duration_ms, text);
        self.last_message = Some((text.to_string(), tint));
    }

    fn show_checkpoint(&mut self) {
        log::info!("Checkpoint");
        self.checkpoints += 1;
    }

    fn set_overlay_visible(&mut self, overlay: Overlay, visible: bool) {
        let changed = if visible {
            self.overlays.insert(overlay)
        } else {
            self.overlays.remove(&overlay)
        };
        if changed {
            log::debug!("Overlay {:?} {}", overlay, if visible { "on" } else { "off" });
        }
    }

    fn set_bar_fill(&mut self, bar: Bar, percent: f32) {
        self.bars[bar.index()] = percent.clamp(0.0, 100.0);
    }

    fn set_note_counter(&mut self, collected: u32, required: u32) {
        self.note_counter = format!("{} / {}", collected, required);
    }
}
