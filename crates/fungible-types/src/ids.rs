//! Identifier newtypes.
//!
//! Agents are addressed by a [`AgentId`] allocated from a monotonically
//! increasing counter owned by the swarm, so ascending id order is also
//! spawn order and gives every per-tick pass a deterministic iteration
//! order. A [`RunId`] tags one play-through (from start or reset until the
//! next reset) and is time-ordered UUID v7.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an agent within a swarm.
///
/// Ids are never reused within a run. Removing an agent invalidates only
/// its own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Wrap a raw counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Return the raw counter value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Return the id that follows this one, or `None` on counter overflow.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "zombie-{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Unique identifier for one run of the swarm (start or reset to reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new run identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
