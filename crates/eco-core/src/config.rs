//! Configuration types for the simulation.

use crate::{CellKind, Error, Result, Step};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest edge length the boundary clamping rule stays in-bounds for
pub const MIN_EDGE: usize = 3;

/// World configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: usize,
    /// Height of the world grid
    pub height: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
        }
    }
}

/// Constants of the per-cell update rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Steps between plant reproduction attempts
    pub plant_cooldown: i64,
    /// Steps between animal reproduction attempts
    pub animal_cooldown: i64,
    /// Ledger margin above the clock at which an animal starves
    pub animal_die_threshold: i64,
    /// Energy an animal spends every step
    pub metabolic_cost: i64,
    /// Energy gained from eating a plant of identical color
    pub predation_reward: f64,
    /// Divisor normalizing the color distance
    pub color_distance_scale: f32,
    /// The first animal appears once the clock passes
    /// `plant_cooldown * release_cooldown_multiple`
    pub release_cooldown_multiple: i64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            plant_cooldown: 30,
            animal_cooldown: 26,
            animal_die_threshold: 30,
            metabolic_cost: 3,
            predation_reward: 20.0,
            color_distance_scale: 33.0,
            release_cooldown_multiple: 120,
        }
    }
}

impl RuleConfig {
    pub fn cooldown(&self, kind: CellKind) -> i64 {
        match kind {
            CellKind::Plant => self.plant_cooldown,
            CellKind::Animal => self.animal_cooldown,
            CellKind::Empty => 0,
        }
    }

    pub fn animal_release_step(&self) -> Step {
        self.plant_cooldown * self.release_cooldown_multiple
    }
}

/// Cadences and switches for the headless driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Target simulation steps per second
    pub steps_per_second: u32,
    /// Target rendered frames per second
    pub frames_per_second: u32,
    /// Simulation rate once the first animal has been released
    pub steps_per_second_after_release: u32,
    /// Increment used by the rate adjustment commands
    pub rate_adjust_step: u32,
    /// Interval between statistics log lines
    pub stats_interval_secs: u64,
    /// Stop after this many steps (runs until interrupted when unset)
    pub max_steps: Option<u64>,
    /// Fixed RNG seed; seeded from OS entropy when unset
    pub seed: Option<u64>,
    /// Paint only animals on full redraws
    pub animals_only: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            steps_per_second: 1000,
            frames_per_second: 30,
            steps_per_second_after_release: 20,
            rate_adjust_step: 10,
            stats_interval_secs: 1,
            max_steps: None,
            seed: None,
            animals_only: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    pub world: WorldConfig,
    pub rules: RuleConfig,
    pub driver: DriverConfig,
}

impl EcosystemConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let WorldConfig { width, height } = self.world;
        if width < MIN_EDGE || height < MIN_EDGE {
            return Err(Error::InvalidDimensions { width, height });
        }
        if self.rules.color_distance_scale <= 0.0 {
            return Err(Error::InvalidConfig(
                "color_distance_scale must be positive".to_string(),
            ));
        }
        let driver = &self.driver;
        if driver.steps_per_second == 0
            || driver.frames_per_second == 0
            || driver.steps_per_second_after_release == 0
        {
            return Err(Error::InvalidConfig("rates must be at least 1".to_string()));
        }
        if driver.stats_interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "stats_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let world = WorldConfig::default();
        assert_eq!(world.width, 600);
        assert_eq!(world.height, 600);

        let rules = RuleConfig::default();
        assert_eq!(rules.cooldown(CellKind::Plant), 30);
        assert_eq!(rules.cooldown(CellKind::Animal), 26);
        assert_eq!(rules.animal_release_step(), 3600);

        let driver = DriverConfig::default();
        assert_eq!(driver.steps_per_second, 1000);
        assert_eq!(driver.frames_per_second, 30);
        assert!(driver.seed.is_none());

        assert!(EcosystemConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EcosystemConfig::from_json_str(
            r#"{ "world": { "width": 40 }, "driver": { "seed": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.world.width, 40);
        assert_eq!(config.world.height, 600);
        assert_eq!(config.driver.seed, Some(7));
        assert_eq!(config.rules, RuleConfig::default());
    }

    #[test]
    fn test_rejects_small_grid() {
        let err = EcosystemConfig::from_json_str(r#"{ "world": { "width": 2, "height": 10 } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { width: 2, height: 10 }));
    }

    #[test]
    fn test_rejects_zero_rates() {
        let mut config = EcosystemConfig::default();
        config.driver.frames_per_second = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EcosystemConfig::from_json_file("/nonexistent/eco.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
