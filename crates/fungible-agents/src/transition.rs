//! Explicit state transition table for the agent controller.
//!
//! Every state change an agent goes through is an `(AgentState, StateEvent)`
//! lookup in [`next_state`]. Pairs with no entry are illegal and surface
//! as [`AgentError::IllegalTransition`](crate::AgentError::IllegalTransition).
//!
//! ```text
//!             PlayerContact              AttackResolved
//!   Pursue ----------------> Attack ----------------------> Pursue | Wander
//!     |  PlayerDied                                           (rest state)
//!     v
//!   Wander
//!
//!   Wander | Pursue | Attack --MergeAsSource--> MergeSource  (removed on completion)
//!   Wander | Pursue | Attack --MergeAsTarget--> MergeTarget --MergeCompleted--> rest
//!   Wander | Pursue | Attack --KillZoneContact--> Dead        (terminal)
//! ```
//!
//! The "rest state" is `Wander` once the player-death signal has been
//! observed and `Pursue` otherwise.

use fungible_types::AgentState;

/// Something that happened to an agent this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateEvent {
    /// Moved into the living player.
    PlayerContact,
    /// The attack wind-up elapsed (damage rolled or target out of reach).
    AttackResolved,
    /// The player-death broadcast was observed.
    PlayerDied,
    /// Chosen as the losing side of a merge.
    MergeAsSource,
    /// Chosen as the winning side of a merge.
    MergeAsTarget,
    /// The merge animation finished and the target grew.
    MergeCompleted,
    /// Touched the lethal boundary.
    KillZoneContact,
}

impl core::fmt::Display for StateEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PlayerContact => write!(f, "player_contact"),
            Self::AttackResolved => write!(f, "attack_resolved"),
            Self::PlayerDied => write!(f, "player_died"),
            Self::MergeAsSource => write!(f, "merge_as_source"),
            Self::MergeAsTarget => write!(f, "merge_as_target"),
            Self::MergeCompleted => write!(f, "merge_completed"),
            Self::KillZoneContact => write!(f, "kill_zone_contact"),
        }
    }
}

/// The state an agent settles into when nothing else is going on.
pub const fn rest_state(player_dead: bool) -> AgentState {
    if player_dead {
        AgentState::Wander
    } else {
        AgentState::Pursue
    }
}

/// Look up the state reached from `current` on `event`.
///
/// Returns `None` when the table has no entry (an illegal transition).
/// Events that are legal but change nothing map back to `current`.
pub const fn next_state(
    current: AgentState,
    event: StateEvent,
    player_dead: bool,
) -> Option<AgentState> {
    use AgentState::{Attack, Dead, MergeSource, MergeTarget, Pursue, Wander};

    match (current, event) {
        (Wander | Pursue | Attack, StateEvent::MergeAsSource) => Some(MergeSource),
        (Wander | Pursue | Attack, StateEvent::MergeAsTarget) => Some(MergeTarget),
        (Wander | Pursue | Attack, StateEvent::KillZoneContact) => Some(Dead),
        (MergeTarget, StateEvent::MergeCompleted) | (Attack, StateEvent::AttackResolved) => {
            Some(rest_state(player_dead))
        }
        (Pursue | Attack, StateEvent::PlayerContact) => Some(Attack),
        // Contact after the player's death is not an attack.
        (Wander, StateEvent::PlayerContact) => Some(Wander),
        (Pursue, StateEvent::PlayerDied) => Some(Wander),
        // An attack already wound up still lands; merges and death are unaffected.
        (Wander | Attack | MergeSource | MergeTarget | Dead, StateEvent::PlayerDied) => {
            Some(current)
        }
        _ => None,
    }
}
