//! Population scheduling, merge resolution, and the swarm tick for the
//! Fungible simulation.
//!
//! This crate composes the per-agent controller from `fungible-agents`
//! into a whole swarm and drives it forward one tick at a time.
//!
//! # Modules
//!
//! - [`arena`] -- [`FlatArena`], the floor/kill-plane/player motion collaborator
//! - [`config`] -- YAML configuration loading and validation
//! - [`player`] -- The player collaborator traits and a scripted avatar
//! - [`resolver`] -- Spatial merge resolution with a total tie-break order
//! - [`runner`] -- Headless session loop with termination conditions
//! - [`scheduler`] -- Survival clock, threat level, and spawn decisions
//! - [`swarm`] -- [`SwarmSimulation`] and its fixed-order tick

pub mod arena;
pub mod config;
pub mod player;
pub mod resolver;
pub mod runner;
pub mod scheduler;
pub mod swarm;

pub use arena::FlatArena;
pub use config::{ConfigError, SimulationConfig};
pub use player::{DamageSink, PlayerAvatar, ScriptedPlayer};
pub use runner::{NoOpCallback, RunnerError, SessionEndReason, SessionResult, TickCallback};
pub use scheduler::{PopulationScheduler, SpawnDecision, threat_level_for};
pub use swarm::{SwarmSimulation, SwarmState, TickError};
