//! The kinematic motion collaborator.
//!
//! Agents never integrate positions themselves. Every displacement goes
//! through a [`KinematicMotion`] implementation, which resolves it against
//! the world (floor, player body, lethal boundary) and reports what was
//! touched. The swarm owns one collaborator and lends it to each agent in
//! turn; per-agent physical flags live on the [`Body`] passed in.

use fungible_types::{AgentId, PlayerSnapshot, Vec3};

/// The physical view of an agent handed to the motion collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Agent being moved.
    pub id: AgentId,
    /// Position before the move.
    pub position: Vec3,
    /// Current scale (the body is an upright box of this size).
    pub scale: Vec3,
    /// Whether the body collides with the world at all. Merge sources
    /// and dead bodies pass through everything.
    pub collisions_enabled: bool,
}

/// A collision reported by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contact {
    /// Touched the lethal boundary.
    KillZone,
    /// Touched the player's body.
    Player,
}

/// The result of resolving one displacement.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionOutcome {
    /// Resolved position after the move.
    pub position: Vec3,
    /// Whether the body rests on the ground after the move.
    pub grounded: bool,
    /// Everything touched during the move, in the order encountered.
    pub contacts: Vec<Contact>,
}

impl MotionOutcome {
    /// An outcome with no collisions.
    pub const fn free(position: Vec3, grounded: bool) -> Self {
        Self {
            position,
            grounded,
            contacts: Vec::new(),
        }
    }
}

/// Resolves agent displacements against the world.
///
/// Implementations must be deterministic for a given sequence of calls;
/// the swarm's reproducibility depends on it.
pub trait KinematicMotion {
    /// Move `body` by `displacement` and report the resolved position,
    /// grounded flag, and contacts.
    fn move_body(
        &mut self,
        body: &Body,
        displacement: Vec3,
        player: &PlayerSnapshot,
    ) -> MotionOutcome;
}
