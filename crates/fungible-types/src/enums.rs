//! Enumeration types for the Fungible swarm simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Agent behaviour
// ---------------------------------------------------------------------------

/// Behavioural state of a single agent.
///
/// Exactly one state is active per agent. Transitions between states are
/// governed by the controller's transition table; `Dead` is terminal and
/// `MergeSource` ends with the agent being removed from the swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Random walk, used once the player is dead.
    Wander,
    /// Chasing the player.
    Pursue,
    /// Winding up an attack after touching the player; movement is blocked.
    Attack,
    /// Losing side of a merge: shrinking into the partner, then removed.
    MergeSource,
    /// Winning side of a merge: holding still, then growing.
    MergeTarget,
    /// Killed by the lethal boundary. Terminal.
    Dead,
}

impl AgentState {
    /// Whether the agent is currently part of a merge (either role).
    pub const fn is_merging(self) -> bool {
        matches!(self, Self::MergeSource | Self::MergeTarget)
    }

    /// Whether the agent is dead.
    pub const fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Whether the agent may be considered by the merge resolver.
    pub const fn is_mergeable(self) -> bool {
        !self.is_merging() && !self.is_dead()
    }
}

impl core::fmt::Display for AgentState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Wander => write!(f, "wander"),
            Self::Pursue => write!(f, "pursue"),
            Self::Attack => write!(f, "attack"),
            Self::MergeSource => write!(f, "merge_source"),
            Self::MergeTarget => write!(f, "merge_target"),
            Self::Dead => write!(f, "dead"),
        }
    }
}

// ---------------------------------------------------------------------------
// Threat tiers
// ---------------------------------------------------------------------------

/// Highest threat level the population scheduler can reach.
pub const MAX_THREAT_LEVEL: u8 = 14;

/// Named difficulty tier for each threat level (0 through 14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatTier {
    /// Level 0.
    Paradise,
    /// Level 1.
    Relaxing,
    /// Level 2.
    Boring,
    /// Level 3.
    VeryLow,
    /// Level 4.
    Low,
    /// Level 5.
    SomewhatLow,
    /// Level 6.
    AlmostMedium,
    /// Level 7.
    Medium,
    /// Level 8.
    SomewhatHigh,
    /// Level 9.
    High,
    /// Level 10.
    VeryHigh,
    /// Level 11.
    Angustiating,
    /// Level 12.
    Nightname,
    /// Level 13.
    Apocalyptical,
    /// Level 14 and anything above.
    Infernal,
}

impl ThreatTier {
    /// Map a threat level to its tier. Levels above
    /// [`MAX_THREAT_LEVEL`] saturate to [`ThreatTier::Infernal`].
    pub const fn from_level(level: u8) -> Self {
        match level {
            0 => Self::Paradise,
            1 => Self::Relaxing,
            2 => Self::Boring,
            3 => Self::VeryLow,
            4 => Self::Low,
            5 => Self::SomewhatLow,
            6 => Self::AlmostMedium,
            7 => Self::Medium,
            8 => Self::SomewhatHigh,
            9 => Self::High,
            10 => Self::VeryHigh,
            11 => Self::Angustiating,
            12 => Self::Nightname,
            13 => Self::Apocalyptical,
            _ => Self::Infernal,
        }
    }

    /// Human-readable tier name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Paradise => "Paradise",
            Self::Relaxing => "Relaxing",
            Self::Boring => "Boring",
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::SomewhatLow => "Somewhat Low",
            Self::AlmostMedium => "Almost Medium",
            Self::Medium => "Medium",
            Self::SomewhatHigh => "Somewhat High",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Angustiating => "Angustiating",
            Self::Nightname => "Nightname",
            Self::Apocalyptical => "Apocalyptical",
            Self::Infernal => "Infernal",
        }
    }
}

impl core::fmt::Display for ThreatTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merging_states() {
        assert!(AgentState::MergeSource.is_merging());
        assert!(AgentState::MergeTarget.is_merging());
        assert!(!AgentState::Pursue.is_merging());
        assert!(!AgentState::Dead.is_mergeable());
        assert!(AgentState::Attack.is_mergeable());
    }

    #[test]
    fn threat_tiers_cover_every_level() {
        assert_eq!(ThreatTier::from_level(0), ThreatTier::Paradise);
        assert_eq!(ThreatTier::from_level(7), ThreatTier::Medium);
        assert_eq!(ThreatTier::from_level(MAX_THREAT_LEVEL), ThreatTier::Infernal);
        assert_eq!(ThreatTier::from_level(200), ThreatTier::Infernal);
    }

    #[test]
    fn threat_tier_names() {
        assert_eq!(ThreatTier::from_level(3).name(), "Very Low");
        assert_eq!(ThreatTier::Nightname.to_string(), "Nightname");
    }

    #[test]
    fn upper_tiers_keep_their_in_game_names() {
        let names: Vec<&str> = (11..=13).map(|level| ThreatTier::from_level(level).name()).collect();
        assert_eq!(names, ["Angustiating", "Nightname", "Apocalyptical"]);
    }

    #[test]
    fn agent_state_display() {
        assert_eq!(AgentState::MergeSource.to_string(), "merge_source");
        assert_eq!(AgentState::Wander.to_string(), "wander");
    }
}
