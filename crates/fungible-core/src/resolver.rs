//! Spatial merge resolution.
//!
//! Each tick, agents that are neither merging nor dead are scanned in
//! ascending id order. For each unpaired agent `A`, the first unpaired
//! agent `B` whose center lies within `A`'s merge radius (`max(sx, sz)/2`)
//! forms a pair with it. The winner is chosen by a total order:
//!
//! 1. larger volume
//! 2. closer to the player
//! 3. closer to the world origin
//! 4. lower [`AgentId`]
//!
//! so the outcome never depends on which agent found the other.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use fungible_agents::Agent;
use fungible_types::{AgentId, MergePair};
use glam::Vec3;

/// The values the tie-break compares for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCandidate {
    /// Agent identifier.
    pub id: AgentId,
    /// Product of the scale components.
    pub volume: f32,
    /// Distance to the player.
    pub player_distance: f32,
    /// Distance to the world origin.
    pub origin_distance: f32,
}

impl MergeCandidate {
    /// Candidate view of `agent` relative to the player.
    pub fn of(agent: &Agent, player_position: Vec3) -> Self {
        Self {
            id: agent.id,
            volume: agent.volume(),
            player_distance: agent.position.distance(player_position),
            origin_distance: agent.position.length(),
        }
    }
}

/// Order candidates so that the merge winner sorts first.
pub fn rank(a: &MergeCandidate, b: &MergeCandidate) -> Ordering {
    b.volume
        .total_cmp(&a.volume)
        .then_with(|| a.player_distance.total_cmp(&b.player_distance))
        .then_with(|| a.origin_distance.total_cmp(&b.origin_distance))
        .then_with(|| a.id.cmp(&b.id))
}

/// Build the pair for two overlapping candidates.
pub fn pair(a: &MergeCandidate, b: &MergeCandidate) -> MergePair {
    let (winner, loser) = if rank(a, b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    };
    MergePair {
        winner: winner.id,
        loser: loser.id,
        size_multiplier: (winner.volume + loser.volume) / winner.volume,
    }
}

/// Find this tick's merges.
///
/// No agent appears in more than one returned pair.
pub fn resolve(agents: &BTreeMap<AgentId, Agent>, player_position: Vec3) -> Vec<MergePair> {
    let eligible: Vec<&Agent> = agents
        .values()
        .filter(|agent| agent.state.is_mergeable())
        .collect();

    let mut paired = BTreeSet::new();
    let mut pairs = Vec::new();

    for a in &eligible {
        if paired.contains(&a.id) {
            continue;
        }
        let radius = a.merge_radius();
        let partner = eligible.iter().find(|b| {
            b.id != a.id && !paired.contains(&b.id) && a.position.distance(b.position) <= radius
        });
        let Some(b) = partner else {
            continue;
        };

        let merge = pair(
            &MergeCandidate::of(a, player_position),
            &MergeCandidate::of(b, player_position),
        );
        paired.insert(a.id);
        paired.insert(b.id);
        pairs.push(merge);
    }

    pairs
}
