//! Shared type definitions for the Fungible swarm simulation.
//!
//! This crate holds the value types that cross crate boundaries: agent
//! and run identifiers, the behavioural state enum, threat tiers, the
//! player snapshot consumed each tick, and the read-only swarm snapshot
//! produced for presentation.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier newtypes ([`AgentId`], [`RunId`])
//! - [`enums`] -- Enumerations ([`AgentState`], [`ThreatTier`])
//! - [`structs`] -- Player input, spawn requests, merge pairs, snapshots

pub mod enums;
pub mod ids;
pub mod structs;

pub use glam::Vec3;

// Re-export all public types at crate root for convenience.
pub use enums::{AgentState, MAX_THREAT_LEVEL, ThreatTier};
pub use ids::{AgentId, RunId};
pub use structs::{AgentSnapshot, MergePair, PlayerSnapshot, SpawnRequest, SwarmSnapshot};
