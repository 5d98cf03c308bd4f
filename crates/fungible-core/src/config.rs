//! Configuration loading and typed config structures for the Fungible
//! simulation.
//!
//! The canonical configuration lives in `fungible-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, a loader that reads the file, and [`SimulationConfig::validate`]
//! which rejects values the simulation cannot run with.

use std::path::Path;

use fungible_agents::AgentConfig;
use glam::Vec3;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of its allowed range.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong with the value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `fungible-config.yaml`. Every field has a
/// default matching the shipped game tuning.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed).
    #[serde(default)]
    pub world: WorldConfig,

    /// Arena extents and vertical boundaries.
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Spawn rate and spawn size.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Agent controller tuning.
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Headless session parameters.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ensure_finite()?;

        let arena = &self.arena;
        ensure(arena.x_min < arena.x_max, "arena.x_min must be below arena.x_max")?;
        ensure(arena.z_min < arena.z_max, "arena.z_min must be below arena.z_max")?;
        ensure(
            arena.spawn_height_min < arena.spawn_height_max,
            "arena.spawn_height_min must be below arena.spawn_height_max",
        )?;
        ensure(
            arena.kill_height < arena.floor_y,
            "arena.kill_height must be below arena.floor_y",
        )?;
        ensure(
            arena.cleanup_height <= arena.kill_height,
            "arena.cleanup_height must not be above arena.kill_height",
        )?;
        ensure(
            arena.player_radius >= 0.0 && arena.body_radius_factor >= 0.0,
            "arena radii must not be negative",
        )?;

        let population = &self.population;
        ensure(
            population.base_spawn_rate.is_finite() && population.base_spawn_rate >= 0.0,
            "population.base_spawn_rate must be a non-negative number",
        )?;
        ensure(
            population.spawn_scale.is_finite()
                && population.spawn_scale.min_element() >= self.agents.min_scale,
            "population.spawn_scale components must be at least agents.min_scale",
        )?;

        let agents = &self.agents;
        ensure(agents.wander_rate > 0.0, "agents.wander_rate must be positive")?;
        ensure(
            (1.5 / agents.wander_rate).is_finite(),
            "agents.wander_rate is too small to draw a wander interval",
        )?;
        ensure(agents.merge_duration > 0.0, "agents.merge_duration must be positive")?;
        ensure(agents.min_scale > 0.0, "agents.min_scale must be positive")?;
        ensure(agents.attack_windup >= 0.0, "agents.attack_windup must not be negative")?;

        let session = &self.session;
        ensure(
            session.tick_dt.is_finite() && session.tick_dt > 0.0,
            "session.tick_dt must be positive",
        )?;
        ensure(session.max_ticks > 0, "session.max_ticks must be positive")?;
        ensure(session.player_health > 0.0, "session.player_health must be positive")?;
        Ok(())
    }

    /// Reject infinities and NaN anywhere, including spans that overflow.
    fn ensure_finite(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        let population = &self.population;
        let agents = &self.agents;
        let session = &self.session;
        let scalars = [
            ("arena.x_min", arena.x_min),
            ("arena.x_max", arena.x_max),
            ("arena.z_min", arena.z_min),
            ("arena.z_max", arena.z_max),
            ("arena.spawn_height_min", arena.spawn_height_min),
            ("arena.spawn_height_max", arena.spawn_height_max),
            ("arena.floor_y", arena.floor_y),
            ("arena.footprint_margin", arena.footprint_margin),
            ("arena.kill_height", arena.kill_height),
            ("arena.cleanup_height", arena.cleanup_height),
            ("arena.body_radius_factor", arena.body_radius_factor),
            ("arena.player_radius", arena.player_radius),
            ("arena.player_height", arena.player_height),
            ("arena x span", arena.x_max - arena.x_min),
            ("arena z span", arena.z_max - arena.z_min),
            (
                "arena spawn height span",
                arena.spawn_height_max - arena.spawn_height_min,
            ),
            ("population.base_spawn_rate", population.base_spawn_rate),
            ("agents.gravity", agents.gravity),
            ("agents.wander_rate", agents.wander_rate),
            ("agents.merge_duration", agents.merge_duration),
            ("agents.min_scale", agents.min_scale),
            ("agents.attack_windup", agents.attack_windup),
            ("agents.damage_per_volume", agents.damage_per_volume),
            ("session.tick_dt", session.tick_dt),
            ("session.player_health", session.player_health),
            ("session.player_orbit_radius", session.player_orbit_radius),
            ("session.player_orbit_speed", session.player_orbit_speed),
        ];
        for (name, value) in scalars {
            ensure(value.is_finite(), &format!("{name} must be a finite number"))?;
        }

        let vectors = [
            ("population.spawn_scale", population.spawn_scale),
            ("session.player_start", session.player_start),
        ];
        for (name, value) in vectors {
            ensure(value.is_finite(), &format!("{name} must be finite"))?;
        }
        Ok(())
    }
}

fn ensure(condition: bool, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: reason.to_owned(),
        })
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable map name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Arena extents and vertical boundaries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArenaConfig {
    /// Lower x bound of the spawn area.
    #[serde(default = "default_arena_min")]
    pub x_min: f32,

    /// Upper x bound of the spawn area.
    #[serde(default = "default_arena_max")]
    pub x_max: f32,

    /// Lower z bound of the spawn area.
    #[serde(default = "default_arena_min")]
    pub z_min: f32,

    /// Upper z bound of the spawn area.
    #[serde(default = "default_arena_max")]
    pub z_max: f32,

    /// Lower bound of the spawn height band.
    #[serde(default = "default_spawn_height_min")]
    pub spawn_height_min: f32,

    /// Upper bound of the spawn height band.
    #[serde(default = "default_spawn_height_max")]
    pub spawn_height_max: f32,

    /// Height of the walkable floor surface.
    #[serde(default)]
    pub floor_y: f32,

    /// How far the floor extends past the spawn bounds (half a floor cell).
    #[serde(default = "default_footprint_margin")]
    pub footprint_margin: f32,

    /// Bodies below this height touch the lethal boundary.
    #[serde(default = "default_kill_height")]
    pub kill_height: f32,

    /// Dead bodies below this height are removed from the swarm.
    #[serde(default = "default_cleanup_height")]
    pub cleanup_height: f32,

    /// Agent collision radius as a fraction of `max(sx, sz)`.
    #[serde(default = "default_body_radius_factor")]
    pub body_radius_factor: f32,

    /// Radius of the player's collision cylinder.
    #[serde(default = "default_player_radius")]
    pub player_radius: f32,

    /// Height of the player's collision cylinder.
    #[serde(default = "default_player_height")]
    pub player_height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            x_min: default_arena_min(),
            x_max: default_arena_max(),
            z_min: default_arena_min(),
            z_max: default_arena_max(),
            spawn_height_min: default_spawn_height_min(),
            spawn_height_max: default_spawn_height_max(),
            floor_y: 0.0,
            footprint_margin: default_footprint_margin(),
            kill_height: default_kill_height(),
            cleanup_height: default_cleanup_height(),
            body_radius_factor: default_body_radius_factor(),
            player_radius: default_player_radius(),
            player_height: default_player_height(),
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Spawns per second at threat level zero.
    #[serde(default = "default_base_spawn_rate")]
    pub base_spawn_rate: f32,

    /// Scale given to every spawned agent.
    #[serde(default = "default_spawn_scale")]
    pub spawn_scale: Vec3,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            base_spawn_rate: default_base_spawn_rate(),
            spawn_scale: default_spawn_scale(),
        }
    }
}

/// Agent controller tuning.
///
/// Only the commonly tuned values are exposed; the rest of
/// [`AgentConfig`] keeps its defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentsConfig {
    /// Vertical acceleration in units/s².
    #[serde(default = "default_gravity")]
    pub gravity: f32,

    /// Average wander heading changes per second.
    #[serde(default = "default_wander_rate")]
    pub wander_rate: f32,

    /// Merge animation length in seconds.
    #[serde(default = "default_merge_duration")]
    pub merge_duration: f32,

    /// Smallest accepted scale component.
    #[serde(default = "default_min_scale")]
    pub min_scale: f32,

    /// Seconds between touching the player and the damage roll.
    #[serde(default = "default_attack_windup")]
    pub attack_windup: f32,

    /// Damage per unit of volume before the random multiplier.
    #[serde(default = "default_damage_per_volume")]
    pub damage_per_volume: f32,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            wander_rate: default_wander_rate(),
            merge_duration: default_merge_duration(),
            min_scale: default_min_scale(),
            attack_windup: default_attack_windup(),
            damage_per_volume: default_damage_per_volume(),
        }
    }
}

impl AgentsConfig {
    /// Build the controller configuration.
    pub fn to_agent_config(&self) -> AgentConfig {
        AgentConfig {
            gravity: self.gravity,
            wander_rate: self.wander_rate,
            merge_duration: self.merge_duration,
            min_scale: self.min_scale,
            attack_windup: self.attack_windup,
            damage_per_volume: self.damage_per_volume,
            ..AgentConfig::default()
        }
    }
}

/// Headless session parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    /// Fixed timestep in seconds.
    #[serde(default = "default_tick_dt")]
    pub tick_dt: f32,

    /// Ticks to run before stopping.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Stop as soon as the player dies.
    #[serde(default = "default_true")]
    pub stop_on_player_death: bool,

    /// Player starting health.
    #[serde(default = "default_player_health")]
    pub player_health: f32,

    /// Player starting (and patrol center) position.
    #[serde(default = "default_player_start")]
    pub player_start: Vec3,

    /// Radius of the player's circular patrol; zero stands still.
    #[serde(default)]
    pub player_orbit_radius: f32,

    /// Patrol angular speed in radians per second.
    #[serde(default)]
    pub player_orbit_speed: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_dt: default_tick_dt(),
            max_ticks: default_max_ticks(),
            stop_on_player_death: true,
            player_health: default_player_health(),
            player_start: default_player_start(),
            player_orbit_radius: 0.0,
            player_orbit_speed: 0.0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log a swarm snapshot every this many ticks; zero disables.
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde's `default = "..."` attribute)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Fungible".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_arena_min() -> f32 {
    -5.0
}

const fn default_arena_max() -> f32 {
    5.0
}

const fn default_spawn_height_min() -> f32 {
    1.0
}

const fn default_spawn_height_max() -> f32 {
    3.0
}

const fn default_footprint_margin() -> f32 {
    0.5
}

const fn default_kill_height() -> f32 {
    -10.0
}

const fn default_cleanup_height() -> f32 {
    -30.0
}

const fn default_body_radius_factor() -> f32 {
    0.3
}

const fn default_player_radius() -> f32 {
    0.3
}

const fn default_player_height() -> f32 {
    1.0
}

const fn default_base_spawn_rate() -> f32 {
    1.0
}

const fn default_spawn_scale() -> Vec3 {
    Vec3::ONE
}

const fn default_gravity() -> f32 {
    -9.81
}

const fn default_wander_rate() -> f32 {
    0.3
}

const fn default_merge_duration() -> f32 {
    1.0
}

const fn default_min_scale() -> f32 {
    0.01
}

const fn default_attack_windup() -> f32 {
    0.3
}

const fn default_damage_per_volume() -> f32 {
    10.0
}

const fn default_tick_dt() -> f32 {
    0.02
}

const fn default_max_ticks() -> u64 {
    30_000
}

const fn default_true() -> bool {
    true
}

const fn default_player_health() -> f32 {
    100.0
}

const fn default_player_start() -> Vec3 {
    Vec3::new(0.0, 0.5, 0.0)
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_snapshot_interval_ticks() -> u64 {
    250
}
