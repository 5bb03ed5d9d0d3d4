use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::HitSource;
use crate::constants::*;

/// Settle heuristic thresholds. Projectile cutoffs are tighter than debris cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    pub projectile_linear: f32,
    pub projectile_angular: f32,
    pub debris_linear: f32,
    pub debris_angular: f32,
    /// Seconds after launch before `is_settled` is polled.
    pub grace: f32,
    /// Seconds after launch at which the world is treated as settled regardless.
    pub max_wait: f32,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            projectile_linear: SETTLE_PROJECTILE_LINEAR,
            projectile_angular: SETTLE_PROJECTILE_ANGULAR,
            debris_linear: SETTLE_DEBRIS_LINEAR,
            debris_angular: SETTLE_DEBRIS_ANGULAR,
            grace: SETTLE_GRACE,
            max_wait: SETTLE_MAX_WAIT,
        }
    }
}

/// Impact thresholds used to turn contacts into kills and damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    pub kill_threshold: f32,
    pub damage_threshold: f32,
    pub damage_divisor: f32,
    pub debris_kill_threshold: f32,
    pub target_wake_radius: f32,
    pub block_wake_radius: f32,
}

impl ImpactConfig {
    /// Force a target hit must exceed to kill, by what struck it.
    pub fn threshold_for(&self, source: HitSource) -> f32 {
        match source {
            HitSource::Projectile => self.kill_threshold,
            HitSource::Debris => self.debris_kill_threshold,
        }
    }
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            kill_threshold: KILL_THRESHOLD,
            damage_threshold: DAMAGE_THRESHOLD,
            damage_divisor: DAMAGE_DIVISOR,
            debris_kill_threshold: DEBRIS_KILL_THRESHOLD,
            target_wake_radius: TARGET_WAKE_RADIUS,
            block_wake_radius: BLOCK_WAKE_RADIUS,
        }
    }
}

/// Engine configuration. Every field has a default, so a partial JSON object is valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed physics sub-step in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum sub-steps run for one frame.
    pub max_substeps: u32,
    /// Frame deltas above this are clamped.
    pub max_frame_dt: f32,
    /// Gravity vector, Y up.
    pub gravity: Vec3,
    /// Seed used by a new game unless overridden.
    pub seed: u32,
    pub launcher: Vec3,
    pub projectile_radius: f32,
    pub target_radius: f32,
    /// Samples produced by the trajectory preview.
    pub trajectory_samples: usize,
    pub settle: SettleConfig,
    pub impact: ImpactConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: FIXED_DT,
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            gravity: Vec3::new(0.0, GRAVITY_Y, 0.0),
            seed: DEFAULT_SEED,
            launcher: Vec3::new(LAUNCHER_X, LAUNCHER_Y, LAUNCHER_Z),
            projectile_radius: PROJECTILE_RADIUS,
            target_radius: TARGET_RADIUS,
            trajectory_samples: 60,
            settle: SettleConfig::default(),
            impact: ImpactConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::Invalid(field) => write!(f, "config field out of range: {field}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl GameConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid("fixed_dt"));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps"));
        }
        if !(self.max_frame_dt > 0.0) {
            return Err(ConfigError::Invalid("max_frame_dt"));
        }
        if self.settle.max_wait < self.settle.grace {
            return Err(ConfigError::Invalid("settle.max_wait"));
        }
        if !(self.impact.damage_divisor > 0.0) {
            return Err(ConfigError::Invalid("impact.damage_divisor"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "seed": 99, "settle": { "max_wait": 4.0 } }"#)
            .unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.settle.max_wait, 4.0);
        assert_eq!(config.settle.grace, SETTLE_GRACE);
        assert_eq!(config.fixed_dt, FIXED_DT);
        assert_eq!(config.impact, ImpactConfig::default());
    }

    #[test]
    fn gravity_parses_as_array() {
        let config = GameConfig::from_json(r#"{ "gravity": [0.0, -20.0, 0.0] }"#).unwrap();
        assert_eq!(config.gravity, Vec3::new(0.0, -20.0, 0.0));
    }

    #[test]
    fn rejects_nonsense() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "fixed_dt": 0.0 }"#),
            Err(ConfigError::Invalid("fixed_dt"))
        ));
        assert!(matches!(GameConfig::from_json("not json"), Err(ConfigError::Parse(_))));
    }
}
