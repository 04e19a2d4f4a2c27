//! Data-driven game balance
//!
//! Every gameplay rate and distance lives here so it can be tweaked from a
//! JSON file without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors raised while loading a tuning table
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning value `{field}`: {value}")]
    Invalid { field: &'static str, value: f32 },
}

/// Balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player walk acceleration (units/s²)
    pub walk_speed: f32,
    /// Player sprint acceleration (units/s²)
    pub sprint_speed: f32,
    /// Velocity damping coefficient (1/s)
    pub damping: f32,
    /// Monster pursuit speed (units/s)
    pub monster_speed: f32,
    /// Distance behind the player where the chase monster appears
    pub spawn_distance: f32,
    /// Monster-player distance that ends the session
    pub capture_distance: f32,
    /// Distance in front of the player for the jump-scare
    pub jump_scare_distance: f32,
    /// Notes farther than this cannot be picked up
    pub interact_distance: f32,
    /// Adrenaline drain (points/s)
    pub adrenaline_rate: f32,
    /// Stamina drain while sprinting (points/s)
    pub stamina_drain_rate: f32,
    /// Stamina regen otherwise (points/s)
    pub stamina_regen_rate: f32,
    /// Battery drain while the flashlight is on (points/s)
    pub battery_drain_rate: f32,
    /// Battery regen while the flashlight is off (points/s)
    pub battery_regen_rate: f32,
    /// Exponential fog density
    pub fog_density: f32,
    /// Dread window between the monster appearing and pursuing (s)
    pub chase_delay: f32,
    /// Whole chase length counted from its start (s)
    pub chase_duration: f32,
    /// Largest frame delta the simulation accepts (s)
    pub max_frame_delta: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            walk_speed: 38.0,
            sprint_speed: 95.0,
            damping: 10.0,
            monster_speed: 40.0,
            spawn_distance: 35.0,
            capture_distance: 2.0,
            jump_scare_distance: 1.5,
            interact_distance: 8.0,
            adrenaline_rate: 3.0,
            stamina_drain_rate: 20.0,
            stamina_regen_rate: 10.0,
            battery_drain_rate: 2.0,
            battery_regen_rate: 5.0,
            fog_density: 0.03,
            chase_delay: 3.0,
            chase_duration: 15.0,
            max_frame_delta: 0.1,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject negative or non-finite values
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("damping", self.damping),
            ("monster_speed", self.monster_speed),
            ("spawn_distance", self.spawn_distance),
            ("capture_distance", self.capture_distance),
            ("jump_scare_distance", self.jump_scare_distance),
            ("interact_distance", self.interact_distance),
            ("adrenaline_rate", self.adrenaline_rate),
            ("stamina_drain_rate", self.stamina_drain_rate),
            ("stamina_regen_rate", self.stamina_regen_rate),
            ("battery_drain_rate", self.battery_drain_rate),
            ("battery_regen_rate", self.battery_regen_rate),
            ("fog_density", self.fog_density),
            ("chase_delay", self.chase_delay),
            ("chase_duration", self.chase_duration),
            ("max_frame_delta", self.max_frame_delta),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid { field, value });
            }
        }
        Ok(())
    }

    /// Clamp a raw frame delta into [0, max_frame_delta]
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "monster_speed": 55.0 }"#).unwrap();
        assert_eq!(tuning.monster_speed, 55.0);
        assert_eq!(tuning.walk_speed, Tuning::default().walk_speed);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = Tuning::from_json(r#"{ "battery_drain_rate": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "battery_drain_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_clamp_delta() {
        let tuning = Tuning::default();
        assert_eq!(tuning.clamp_delta(-0.5), 0.0);
        assert_eq!(tuning.clamp_delta(5.0), 0.1);
        assert_eq!(tuning.clamp_delta(f32::NAN), 0.0);
        assert_eq!(tuning.clamp_delta(0.016), 0.016);
    }
}
