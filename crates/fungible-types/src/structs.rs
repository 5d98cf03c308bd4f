//! Value structs exchanged between the simulation and its collaborators.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::AgentState;
use crate::ids::{AgentId, RunId};

/// Read-only view of the player supplied to the swarm once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// World position of the player.
    pub position: Vec3,
    /// Whether the player has been confirmed dead.
    pub is_dead: bool,
}

impl PlayerSnapshot {
    /// A living player at `position`.
    pub const fn alive_at(position: Vec3) -> Self {
        Self {
            position,
            is_dead: false,
        }
    }
}

/// Request to place a new agent in the arena, emitted by the population
/// scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Spawn position inside the arena bounds and height band.
    pub position: Vec3,
}

/// One merge initiated by the merge resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergePair {
    /// The surviving agent (becomes the merge target and grows).
    pub winner: AgentId,
    /// The absorbed agent (becomes the merge source and is removed).
    pub loser: AgentId,
    /// Combined volume divided by the winner's volume.
    pub size_multiplier: f32,
}

/// Presentation view of a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent identifier.
    pub id: AgentId,
    /// World position.
    pub position: Vec3,
    /// Unit heading.
    pub forward: Vec3,
    /// Non-uniform scale.
    pub scale: Vec3,
    /// Behavioural state.
    pub state: AgentState,
    /// Product of the scale components.
    pub volume: f32,
}

/// Read-only snapshot of the swarm returned by every tick.
///
/// This is the only artifact that leaves the simulation; no agent
/// reference escapes a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmSnapshot {
    /// Current run.
    pub run_id: RunId,
    /// Number of ticks executed in this run.
    pub tick: u64,
    /// Survival time in seconds.
    pub elapsed_time: f32,
    /// Accumulated score (zombie-seconds survived).
    pub score: f32,
    /// Threat level in `[0, 14]`.
    pub threat_level: u8,
    /// Name of the threat tier for `threat_level`.
    pub threat_name: String,
    /// Total agents spawned this run.
    pub zombie_count: u64,
    /// Agents currently present in the swarm (including dead bodies).
    pub present_agents: usize,
    /// Whether the swarm has observed the player's death.
    pub player_dead: bool,
    /// Agent spawned this tick, if any.
    pub spawned: Option<AgentId>,
    /// Agents removed this tick (absorbed sources and cleaned-up bodies).
    pub removed: Vec<AgentId>,
    /// Merges initiated this tick.
    pub merges_started: Vec<MergePair>,
    /// Total damage forwarded to the player this tick.
    pub damage_dealt: f32,
    /// Per-agent views, in ascending id order.
    pub agents: Vec<AgentSnapshot>,
}
