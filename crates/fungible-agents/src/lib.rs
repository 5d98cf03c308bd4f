//! Agent state, controller state machine, and merge lifecycle for the
//! Fungible swarm simulation.
//!
//! This crate is the logic layer for a single zombie. It owns nothing
//! global: the swarm (in `fungible-core`) hands each agent its tick
//! context, the shared motion collaborator, and the random source.
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] record, spawn validation, derived stats
//! - [`config`] -- Tunables for movement, attacks, and merges ([`AgentConfig`])
//! - [`controller`] -- Per-tick state handlers ([`tick_agent`])
//! - [`death`] -- Environmental death ([`DeathCause`])
//! - [`error`] -- Error types for all agent operations ([`AgentError`])
//! - [`merge`] -- Merge state, initiation, and per-tick progress
//! - [`motion`] -- The [`KinematicMotion`] collaborator trait
//! - [`transition`] -- The explicit state transition table

pub mod agent;
pub mod config;
pub mod controller;
pub mod death;
pub mod error;
pub mod merge;
pub mod motion;
pub mod transition;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, jump_height_for_scale, max_speed_for_scale};
pub use config::AgentConfig;
pub use controller::{AgentTickReport, ControllerContext, TickOutcome, tick_agent};
pub use death::DeathCause;
pub use error::AgentError;
pub use merge::{MergeAnchor, MergeProgress, MergeState};
pub use motion::{Body, Contact, KinematicMotion, MotionOutcome};
pub use transition::{StateEvent, next_state};
