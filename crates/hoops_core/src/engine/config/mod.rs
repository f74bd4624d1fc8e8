//! # Engine Configuration Module
//!
//! Every tuning constant of the engine, grouped per subsystem.
//!
//! ## Purpose
//! - One place for weight tables and constants, validated once at load
//! - Presets (Realistic, High-Scoring, Grind)
//!
//! ## Usage
//! ```rust
//! use hoops_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let shootout = EngineConfig::high_scoring();
//! assert!(shootout.validate().is_ok());
//! ```

mod clock_config;
mod end_game_config;
mod foul_config;
mod rebound_config;
mod rotation_config;
mod shot_config;
mod stamina_config;
mod timeout_config;
mod turnover_config;
mod weights;

pub use clock_config::{ClockConfig, DurationProfile};
pub use end_game_config::EndGameConfig;
pub use foul_config::FoulConfig;
pub use rebound_config::ReboundConfig;
pub use rotation_config::RotationConfig;
pub use shot_config::{ShotConfig, ShotTypeValues};
pub use stamina_config::StaminaConfig;
pub use timeout_config::TimeoutConfig;
pub use turnover_config::TurnoverConfig;
pub use weights::{CompositeWeights, WeightTable, WEIGHT_SUM_TOLERANCE};

use crate::error::ConfigError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Shared realistic defaults, built once.
pub static DEFAULT_CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::realistic);

/// Full engine configuration. Any omitted section or field takes its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Composite weight tables
    pub weights: CompositeWeights,
    pub clock: ClockConfig,
    pub stamina: StaminaConfig,
    pub shot: ShotConfig,
    pub rebound: ReboundConfig,
    pub turnover: TurnoverConfig,
    /// Fouls and free throws
    pub foul: FoulConfig,
    pub rotation: RotationConfig,
    pub timeout: TimeoutConfig,
    pub end_game: EndGameConfig,
}

impl EngineConfig {
    /// Realistic simulation (default)
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Open floor: better shooting, fewer turnovers, quicker possessions.
    pub fn high_scoring() -> Self {
        let mut cfg = Self::default();
        cfg.shot.base_rate = ShotTypeValues::new(0.41, 0.47, 0.66);
        cfg.shot.contested_penalty = ShotTypeValues::new(0.04, 0.035, 0.025);
        cfg.shot.contest_base_distance = 10.5;
        cfg.turnover.base_rate = 0.10;
        cfg.clock.standard = DurationProfile::new(5.0, 12.0, 22.0);
        cfg.foul.free_throw_base = 0.78;
        cfg
    }

    /// Half-court grind: tighter defense, longer possessions, more fouls.
    pub fn grind() -> Self {
        let mut cfg = Self::default();
        cfg.shot.base_rate = ShotTypeValues::new(0.35, 0.41, 0.58);
        cfg.shot.heavy_penalty = ShotTypeValues::new(0.13, 0.11, 0.09);
        cfg.shot.contest_base_distance = 8.5;
        cfg.turnover.base_rate = 0.14;
        cfg.clock.standard = DurationProfile::new(8.0, 17.0, 24.0);
        cfg.foul.non_shooting_rate = 0.08;
        cfg.stamina.drain_per_second = 0.07;
        cfg
    }

    /// Check every table and parameter. Nothing is corrected silently.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.clock.validate()?;
        self.stamina.validate()?;
        self.shot.validate()?;
        self.rebound.validate()?;
        self.turnover.validate()?;
        self.foul.validate()?;
        self.rotation.validate()?;
        self.timeout.validate()?;
        self.end_game.validate()?;
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attribute;

    #[test]
    fn test_presets_are_valid() {
        assert!(EngineConfig::realistic().validate().is_ok());
        assert!(EngineConfig::high_scoring().validate().is_ok());
        assert!(EngineConfig::grind().validate().is_ok());
        assert_eq!(*DEFAULT_CONFIG, EngineConfig::default());
    }

    #[test]
    fn test_high_scoring_shoots_better() {
        let realistic = EngineConfig::realistic();
        let high = EngineConfig::high_scoring();
        let grind = EngineConfig::grind();

        assert!(high.shot.base_rate.rim > realistic.shot.base_rate.rim);
        assert!(high.turnover.base_rate < realistic.turnover.base_rate);
        assert!(grind.shot.base_rate.three_point < realistic.shot.base_rate.three_point);
        assert!(grind.clock.standard.mode > realistic.clock.standard.mode);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "clock:\n  period_seconds: 600\nfoul:\n  personal_foul_limit: 5\n";
        let cfg = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.clock.period_seconds, 600.0);
        assert_eq!(cfg.clock.overtime_seconds, 300.0);
        assert_eq!(cfg.foul.personal_foul_limit, 5);
        assert_eq!(cfg.shot, ShotConfig::default());
    }

    #[test]
    fn test_bad_weight_table_rejected_at_load() {
        let json = r#"{"weights": {"block": {"height": 0.5, "jumping": 0.3}}}"#;
        match EngineConfig::from_json_str(json) {
            Err(ConfigError::WeightSum { table, .. }) => assert_eq!(table, "block"),
            other => panic!("expected WeightSum, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_table_accepted() {
        let json = r#"{"weights": {"jump_ball": {"height": 0.6, "jumping": 0.4}}}"#;
        let cfg = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.weights.jump_ball.weight(Attribute::Height), 0.6);
        assert_eq!(cfg.weights.jump_ball.weight(Attribute::Reactions), 0.0);
    }

    #[test]
    fn test_unparseable_input() {
        assert!(matches!(EngineConfig::from_json_str("{not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::grind();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
