//! Environmental death.
//!
//! The only way an agent dies is by touching the lethal boundary. A dead
//! agent keeps its body in the swarm (collisions disabled, so it falls
//! through the floor) until the swarm cleans it up.

use tracing::info;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::transition::StateEvent;

/// Why an agent died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Touched the lethal boundary.
    KillZone,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::KillZone => write!(f, "kill_zone"),
        }
    }
}

/// Mark `agent` dead from `cause`.
///
/// Collisions are disabled and forward speed drops to zero; gravity keeps
/// acting on the body.
///
/// # Errors
///
/// Returns [`AgentError::IllegalTransition`] when the agent is merging or
/// already dead.
pub fn kill(agent: &mut Agent, cause: DeathCause, player_dead: bool) -> Result<(), AgentError> {
    let event = match cause {
        DeathCause::KillZone => StateEvent::KillZoneContact,
    };
    agent.apply_event(event, player_dead)?;
    agent.collisions_enabled = false;
    agent.speed = 0.0;
    info!(
        agent_id = %agent.id,
        %cause,
        volume = agent.volume(),
        "agent died"
    );
    Ok(())
}
