//! TOML round configuration layered over the built-in defaults.
//!
//! ```toml
//! starting_lives = 3
//! duration_limit_secs = 60.0   # 0 disables the countdown
//! hazard_pool_size = 0
//! initial_direction = "left"
//!
//! [grid]
//! width = 30
//! height = 20
//! safe_zone_height = 2
//! ```

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use snake_arcade_core::{Direction, GridGeometry, RoundConfig};

/// Optional overrides read from a configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    grid: Option<GridSection>,
    starting_lives: Option<u32>,
    duration_limit_secs: Option<f64>,
    hazard_pool_size: Option<u32>,
    hazard_ttl_secs: Option<f64>,
    hazard_spawn_interval_secs: Option<f64>,
    special_food_chance: Option<f64>,
    base_tick_rate: Option<f64>,
    seed: Option<u64>,
    initial_direction: Option<Direction>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    width: u32,
    height: u32,
    safe_zone_height: u32,
}

impl ConfigFile {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read round config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid round config at {}", path.display()))
    }

    /// Parses configuration file contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse round config toml contents")
    }

    /// Applies the overrides on top of `base`.
    pub(crate) fn apply(self, base: RoundConfig) -> Result<RoundConfig> {
        let mut config = base;

        if let Some(grid) = self.grid {
            config.grid = GridGeometry::new(grid.width, grid.height, grid.safe_zone_height)
                .context("invalid [grid] section")?;
        }
        if let Some(lives) = self.starting_lives {
            ensure!(lives > 0, "starting_lives must be at least 1");
            config.starting_lives = lives;
        }
        if let Some(secs) = self.duration_limit_secs {
            config.duration_limit = if secs == 0.0 {
                None
            } else {
                Some(seconds("duration_limit_secs", secs)?)
            };
        }
        if let Some(size) = self.hazard_pool_size {
            config.hazard_pool_size = size;
        }
        if let Some(secs) = self.hazard_ttl_secs {
            config.hazard_ttl = seconds("hazard_ttl_secs", secs)?;
        }
        if let Some(secs) = self.hazard_spawn_interval_secs {
            config.hazard_spawn_interval = seconds("hazard_spawn_interval_secs", secs)?;
        }
        if let Some(chance) = self.special_food_chance {
            ensure!(
                (0.0..=1.0).contains(&chance),
                "special_food_chance must lie within 0.0..=1.0, got {chance}"
            );
            config.special_food_chance = chance;
        }
        if let Some(rate) = self.base_tick_rate {
            ensure!(
                rate.is_finite() && rate > 0.0,
                "base_tick_rate must be positive, got {rate}"
            );
            config.base_tick_rate = rate;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(direction) = self.initial_direction {
            config.initial_direction = Some(direction);
        }

        Ok(config)
    }
}

fn seconds(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{field} must be a non-negative number of seconds, got {secs}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = ConfigFile::parse("")
            .and_then(|file| file.apply(RoundConfig::default()))
            .expect("valid config");
        assert_eq!(config, RoundConfig::default());
    }

    #[test]
    fn overrides_every_field() {
        let contents = r#"
            starting_lives = 4
            duration_limit_secs = 0.0
            hazard_pool_size = 0
            hazard_ttl_secs = 1.5
            hazard_spawn_interval_secs = 0.25
            special_food_chance = 0.5
            base_tick_rate = 12.0
            seed = 7
            initial_direction = "left"

            [grid]
            width = 20
            height = 12
            safe_zone_height = 1
        "#;
        let config = ConfigFile::parse(contents)
            .and_then(|file| file.apply(RoundConfig::default()))
            .expect("valid config");

        assert_eq!(config.grid, GridGeometry::new(20, 12, 1).expect("valid geometry"));
        assert_eq!(config.starting_lives, 4);
        assert_eq!(config.duration_limit, None);
        assert_eq!(config.hazard_pool_size, 0);
        assert_eq!(config.hazard_ttl, Duration::from_millis(1_500));
        assert_eq!(config.hazard_spawn_interval, Duration::from_millis(250));
        assert!((config.special_food_chance - 0.5).abs() < f64::EPSILON);
        assert!((config.base_tick_rate - 12.0).abs() < f64::EPSILON);
        assert_eq!(config.seed, 7);
        assert_eq!(config.initial_direction, Some(Direction::Left));
    }

    #[test]
    fn rejects_invalid_values() {
        for contents in [
            "unknown_field = 1",
            "starting_lives = 0",
            "special_food_chance = 1.5",
            "hazard_ttl_secs = -1.0",
            "base_tick_rate = 0.0",
            "initial_direction = \"sideways\"",
            "[grid]\nwidth = 10\nheight = 2\nsafe_zone_height = 2",
        ] {
            let result =
                ConfigFile::parse(contents).and_then(|file| file.apply(RoundConfig::default()));
            assert!(result.is_err(), "accepted invalid config: {contents}");
        }
    }
}
