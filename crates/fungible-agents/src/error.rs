//! Error types for the fungible-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Most variants describe contract violations the swarm is expected to
//! prevent (merging an agent twice, illegal state transitions); they exist
//! so a violation surfaces as an error instead of corrupting state.

use fungible_types::{AgentId, AgentState, Vec3};

use crate::transition::StateEvent;

/// Errors that can occur during agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A scale component is non-finite or below the configured minimum.
    #[error("degenerate scale {scale}: every component must be finite and at least {min_scale}")]
    DegenerateScale {
        /// The rejected scale.
        scale: Vec3,
        /// The configured minimum component.
        min_scale: f32,
    },

    /// A spawn position contains NaN or infinity.
    #[error("non-finite spawn position {position}")]
    NonFinitePosition {
        /// The rejected position.
        position: Vec3,
    },

    /// The agent is already part of a merge.
    #[error("agent {0} is already merging")]
    AlreadyMerging(AgentId),

    /// A merge operation was requested for an agent that is not merging.
    #[error("agent {0} is not merging")]
    NotMerging(AgentId),

    /// The agent is neither the winner nor the loser of the merge it was
    /// asked to join.
    #[error("agent {agent_id} is not part of merge {winner} <- {loser}")]
    NotInMergePair {
        /// The agent that received the request.
        agent_id: AgentId,
        /// Winner named in the request.
        winner: AgentId,
        /// Loser named in the request.
        loser: AgentId,
    },

    /// The merge size multiplier is non-finite or below one.
    #[error("invalid size multiplier {size_multiplier} for agent {agent_id}")]
    InvalidMergeMultiplier {
        /// The agent that received the request.
        agent_id: AgentId,
        /// The rejected multiplier.
        size_multiplier: f32,
    },

    /// The transition table has no entry for this state and event.
    #[error("illegal transition for agent {agent_id}: {event} in state {from}")]
    IllegalTransition {
        /// The agent whose transition was rejected.
        agent_id: AgentId,
        /// The state the agent was in.
        from: AgentState,
        /// The event that has no transition from `from`.
        event: StateEvent,
    },

    /// Agent with the given ID was not found in the swarm.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),
}
