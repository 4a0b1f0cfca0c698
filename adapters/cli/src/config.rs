//! TOML configuration consumed by the command-line adapter.

use std::{fs, path::Path, time::Duration};

use angkor_escape_system_boss::Config as BossConfig;
use angkor_escape_system_combat::DamageRules;
use angkor_escape_system_maze_generation::{
    Config as GeneratorConfig, DEFAULT_COLUMNS, DEFAULT_ROWS,
};
use angkor_escape_world::Tuning;
use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while parsing or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The maze needs at least one column and one row.
    #[error("maze dimensions must be non-zero, got {columns}x{rows}")]
    ZeroDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// Tiles need a positive edge length.
    #[error("tile length must be positive, got {0}")]
    InvalidTileLength(f32),
    /// A hazard density lies outside `[0, 1]`.
    #[error("{name} density must lie in [0, 1], got {value}")]
    DensityOutOfRange {
        /// Name of the offending field.
        name: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// Spikes and fire together would need more than every eligible cell.
    #[error("combined hazard density {0} exceeds 1")]
    DensitiesExceedOne(f32),
    /// The session cannot run at zero frames per second.
    #[error("frames per second must be non-zero")]
    ZeroFps,
}

/// Maze generation and hazard settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MazeSection {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Edge length of one tile in world units.
    pub tile_length: f32,
    /// Share of eligible open cells turned into spikes.
    pub spike_density: f32,
    /// Share of eligible open cells turned into fire.
    pub fire_density: f32,
    /// Damage dealt by an active spike tile.
    pub spike_damage: u32,
    /// Damage dealt by an active fire tile.
    pub fire_damage: u32,
}

impl Default for MazeSection {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        let rules = DamageRules::default();
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            tile_length: generator.tile_length(),
            spike_density: generator.spike_density(),
            fire_density: generator.fire_density(),
            spike_damage: rules.spike,
            fire_damage: rules.fire,
        }
    }
}

/// Boss fight settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaSection {
    /// Boss health at spawn.
    pub boss_health: u32,
    /// Milliseconds the boss waits between volleys.
    pub volley_interval_ms: u64,
    /// Milliseconds between boss wander re-targets.
    pub retarget_interval_ms: u64,
    /// Damage a fireball deals to the player.
    pub fireball_damage: u32,
    /// Damage a spear deals to the boss.
    pub spear_damage: u32,
}

impl Default for ArenaSection {
    fn default() -> Self {
        let tuning = Tuning::default();
        let rules = DamageRules::default();
        Self {
            boss_health: tuning.boss.max_health,
            volley_interval_ms: duration_millis(tuning.arena.volley_interval),
            retarget_interval_ms: duration_millis(tuning.arena.retarget_interval),
            fireball_damage: rules.boss_projectile,
            spear_damage: rules.player_projectile,
        }
    }
}

/// Run settings of the headless session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    /// Seed shared by the maze generator and the boss controller.
    pub seed: u64,
    /// Simulated frames per second.
    pub fps: u32,
    /// Upper bound on simulated ticks before the run stops.
    pub max_ticks: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            seed: 0,
            fps: 60,
            max_ticks: 36_000,
        }
    }
}

/// Complete configuration of a headless run.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Maze settings.
    pub maze: MazeSection,
    /// Arena settings.
    pub arena: ArenaSection,
    /// Session settings.
    pub session: SessionSection,
}

impl GameConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parse {}", path.display()))
    }

    /// Checks every setting a session depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let maze = &self.maze;
        if maze.columns == 0 || maze.rows == 0 {
            return Err(ConfigError::ZeroDimensions {
                columns: maze.columns,
                rows: maze.rows,
            });
        }
        if !(maze.tile_length > 0.0 && maze.tile_length.is_finite()) {
            return Err(ConfigError::InvalidTileLength(maze.tile_length));
        }
        for (name, value) in [
            ("spike", maze.spike_density),
            ("fire", maze.fire_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::DensityOutOfRange { name, value });
            }
        }
        let total = maze.spike_density + maze.fire_density;
        if total > 1.0 {
            return Err(ConfigError::DensitiesExceedOne(total));
        }
        if self.session.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        Ok(())
    }

    /// Simulated time covered by one tick.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.session.fps.max(1)
    }

    /// World tuning with the arena overrides applied.
    #[must_use]
    pub fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default();
        tuning.boss.max_health = self.arena.boss_health;
        tuning.arena.volley_interval = Duration::from_millis(self.arena.volley_interval_ms);
        tuning.arena.retarget_interval = Duration::from_millis(self.arena.retarget_interval_ms);
        tuning
    }

    /// Maze generator configuration.
    #[must_use]
    pub fn generator(&self) -> GeneratorConfig {
        GeneratorConfig::new(
            self.maze.spike_density,
            self.maze.fire_density,
            self.maze.tile_length,
            self.session.seed,
        )
    }

    /// Boss controller configuration.
    #[must_use]
    pub fn boss(&self) -> BossConfig {
        BossConfig::new(self.session.seed)
    }

    /// Damage amounts used by the combat system.
    #[must_use]
    pub fn damage_rules(&self) -> DamageRules {
        DamageRules::new(
            self.maze.spike_damage,
            self.maze.fire_damage,
            self.arena.fireball_damage,
            self.arena.spear_damage,
        )
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GameConfig::from_toml_str("").expect("empty config parses");

        assert_eq!(config, GameConfig::default());
        assert_eq!(config.maze.columns, 25);
        assert_eq!(config.maze.spike_damage, 10);
        assert_eq!(config.arena.volley_interval_ms, 2_000);
        assert_eq!(config.tuning(), Tuning::default());
        assert_eq!(config.damage_rules(), DamageRules::default());
    }

    #[test]
    fn sections_override_individual_fields() {
        let config = GameConfig::from_toml_str(
            r#"
                [maze]
                columns = 11
                fire_density = 0.1

                [arena]
                boss_health = 40

                [session]
                seed = 9
                fps = 50
            "#,
        )
        .expect("config parses");

        assert_eq!(config.maze.columns, 11);
        assert_eq!(config.maze.rows, 25);
        assert!((config.generator().fire_density() - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.tuning().boss.max_health, 40);
        assert_eq!(config.frame_duration(), Duration::from_millis(20));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = GameConfig::from_toml_str("[maze]\nwidth = 3\n").expect_err("unknown field");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut config = GameConfig::default();
        config.maze.rows = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDimensions { columns: 25, rows: 0 })
        ));

        let mut config = GameConfig::default();
        config.maze.spike_density = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DensityOutOfRange { name: "spike", .. })
        ));

        let mut config = GameConfig::default();
        config.maze.spike_density = 0.7;
        config.maze.fire_density = 0.6;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DensitiesExceedOne(_))
        ));

        let mut config = GameConfig::default();
        config.session.fps = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroFps)));
    }
}
