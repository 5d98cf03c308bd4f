//! Merge initiation and per-tick merge progress.
//!
//! A merge pairs a winner (the target) with a loser (the source). For
//! `duration` seconds the source slides from where it started toward the
//! top of the target while its scale shrinks linearly to zero; the target
//! holds still. On completion the source is removed by the swarm and the
//! target's scale is multiplied by `size_multiplier^(1/3)`, so total volume
//! is conserved.

use fungible_types::{AgentId, AgentState};
use glam::Vec3;

use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::transition::StateEvent;

/// Bookkeeping for an agent in a merge state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeState {
    /// The other agent in the merge.
    pub partner: AgentId,
    /// Length of the merge in seconds.
    pub total_duration: f32,
    /// Seconds left until completion.
    pub remaining: f32,
    /// Position when the merge started.
    pub initial_position: Vec3,
    /// Scale when the merge started.
    pub initial_scale: Vec3,
    /// Combined volume divided by the winner's volume.
    pub size_multiplier: f32,
}

impl MergeState {
    /// Fraction of the merge still to run, in `[0, 1]`.
    pub const fn remaining_ratio(&self) -> f32 {
        if self.total_duration > 0.0 {
            (self.remaining / self.total_duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Whether the countdown has run out, allowing `tolerance` (a fraction
    /// of the duration) of accumulated rounding.
    pub const fn is_finished(&self, tolerance: f32) -> bool {
        self.remaining <= self.total_duration * tolerance
    }
}

/// Where a merge source converges: its partner's current position and
/// scale, read by the swarm before the source's merge step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeAnchor {
    /// Partner position.
    pub position: Vec3,
    /// Partner scale.
    pub scale: Vec3,
}

impl MergeAnchor {
    /// The anchor for `partner`.
    pub const fn of(partner: &Agent) -> Self {
        Self {
            position: partner.position,
            scale: partner.scale,
        }
    }

    fn top_surface(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.scale.y / 2.0, 0.0)
    }
}

/// What a merge step did to the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeProgress {
    /// Still animating; the rest of the tick is skipped.
    InProgress,
    /// The source finished and must be removed, crediting `into`.
    Absorbed {
        /// The target that absorbed this agent.
        into: AgentId,
    },
    /// The target finished growing and resumes normal behaviour this tick.
    Grown {
        /// Volume after growth.
        new_volume: f32,
    },
}

/// Put `agent` into its role for the merge `winner <- loser`.
///
/// The loser becomes the merge source with collisions disabled; the
/// winner becomes the merge target. Both record their current position
/// and scale as the merge's starting point.
///
/// # Errors
///
/// - [`AgentError::AlreadyMerging`] when the agent is already in a merge.
/// - [`AgentError::NotInMergePair`] when the agent is neither `winner`
///   nor `loser`.
/// - [`AgentError::InvalidMergeMultiplier`] when `size_multiplier` is not
///   a finite value of at least one.
/// - [`AgentError::IllegalTransition`] for dead agents.
pub fn initiate_merge(
    agent: &mut Agent,
    winner: AgentId,
    loser: AgentId,
    size_multiplier: f32,
    config: &AgentConfig,
    player_dead: bool,
) -> Result<(), AgentError> {
    if agent.merge.is_some() || agent.is_merging() {
        return Err(AgentError::AlreadyMerging(agent.id));
    }
    if !size_multiplier.is_finite() || size_multiplier < 1.0 {
        return Err(AgentError::InvalidMergeMultiplier {
            agent_id: agent.id,
            size_multiplier,
        });
    }
    let (event, partner) = if agent.id == loser {
        (StateEvent::MergeAsSource, winner)
    } else if agent.id == winner {
        (StateEvent::MergeAsTarget, loser)
    } else {
        return Err(AgentError::NotInMergePair {
            agent_id: agent.id,
            winner,
            loser,
        });
    };

    agent.apply_event(event, player_dead)?;
    if event == StateEvent::MergeAsSource {
        agent.collisions_enabled = false;
    }
    agent.merge = Some(MergeState {
        partner,
        total_duration: config.merge_duration,
        remaining: config.merge_duration,
        initial_position: agent.position,
        initial_scale: agent.scale,
        size_multiplier,
    });
    Ok(())
}

/// Advance an agent's merge by `dt`.
///
/// `anchor` is the partner's current body; a source without one converges
/// on its own position. Completion happens on the first step where the
/// remaining time reaches zero, within `merge_completion_tolerance`.
///
/// # Errors
///
/// Returns [`AgentError::NotMerging`] when the agent has no merge in
/// progress.
pub fn advance_merge(
    agent: &mut Agent,
    anchor: Option<MergeAnchor>,
    dt: f32,
    config: &AgentConfig,
    player_dead: bool,
) -> Result<MergeProgress, AgentError> {
    let Some(merge) = agent.merge.as_mut() else {
        return Err(AgentError::NotMerging(agent.id));
    };
    merge.remaining -= dt;
    let merge = *merge;
    let finished = merge.is_finished(config.merge_completion_tolerance);

    match agent.state {
        AgentState::MergeSource if !finished => {
            let ratio = merge.remaining_ratio();
            let destination = anchor.map_or(agent.position, |a| a.top_surface());
            agent.position = destination - ratio * (destination - merge.initial_position);
            agent.scale = merge.initial_scale * ratio;
            Ok(MergeProgress::InProgress)
        }
        AgentState::MergeTarget if !finished => Ok(MergeProgress::InProgress),
        AgentState::MergeSource => {
            agent.scale = Vec3::ZERO;
            Ok(MergeProgress::Absorbed {
                into: merge.partner,
            })
        }
        AgentState::MergeTarget => {
            agent.scale *= merge.size_multiplier.cbrt();
            agent.refresh_derived_stats(config);
            agent.merge = None;
            agent.apply_event(StateEvent::MergeCompleted, player_dead)?;
            Ok(MergeProgress::Grown {
                new_volume: agent.volume(),
            })
        }
        _ => Err(AgentError::NotMerging(agent.id)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn agent(id: u64, position: Vec3, scale: Vec3) -> Agent {
        Agent::spawn(AgentId::new(id), position, scale, false, &AgentConfig::default()).unwrap()
    }

    #[test]
    fn initiation_assigns_roles() {
        let config = AgentConfig::default();
        let mut winner = agent(1, Vec3::ZERO, Vec3::ONE);
        let mut loser = agent(2, Vec3::X, Vec3::ONE);

        let (winner_id, loser_id) = (winner.id, loser.id);
        initiate_merge(&mut winner, winner_id, loser_id, 2.0, &config, false).unwrap();
        initiate_merge(&mut loser, winner_id, loser_id, 2.0, &config, false).unwrap();

        assert_eq!(winner.state, AgentState::MergeTarget);
        assert!(winner.collisions_enabled);
        assert_eq!(loser.state, AgentState::MergeSource);
        assert!(!loser.collisions_enabled);
        assert_eq!(loser.merge.unwrap().partner, winner.id);
    }

    #[test]
    fn second_initiation_rejected() {
        let config = AgentConfig::default();
        let mut a = agent(1, Vec3::ZERO, Vec3::ONE);
        let a_id = a.id;
        initiate_merge(&mut a, a_id, AgentId::new(2), 2.0, &config, false).unwrap();
        let err = initiate_merge(&mut a, a_id, AgentId::new(3), 2.0, &config, false).unwrap_err();
        assert!(matches!(err, AgentError::AlreadyMerging(_)));
    }

    #[test]
    fn stranger_cannot_join() {
        let config = AgentConfig::default();
        let mut a = agent(9, Vec3::ZERO, Vec3::ONE);
        let err =
            initiate_merge(&mut a, AgentId::new(1), AgentId::new(2), 2.0, &config, false)
                .unwrap_err();
        assert!(matches!(err, AgentError::NotInMergePair { .. }));
        assert_eq!(a.state, AgentState::Pursue);
    }

    #[test]
    fn source_converges_on_partner_top() {
        let config = AgentConfig::default();
        let target = agent(1, Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let mut source = agent(2, Vec3::new(4.0, 1.0, 0.0), Vec3::ONE);
        let source_id = source.id;
        initiate_merge(&mut source, target.id, source_id, 1.5, &config, false).unwrap();

        let anchor = Some(MergeAnchor::of(&target));
        let progress = advance_merge(&mut source, anchor, 0.5, &config, false).unwrap();
        assert_eq!(progress, MergeProgress::InProgress);
        // Halfway from (4, 1, 0) to the target's top at (0, 2, 0).
        assert!((source.position - Vec3::new(2.0, 1.5, 0.0)).length() < 1e-5);
        assert!((source.scale - Vec3::splat(0.5)).length() < 1e-5);

        let progress = advance_merge(&mut source, anchor, 0.5, &config, false).unwrap();
        assert_eq!(
            progress,
            MergeProgress::Absorbed {
                into: AgentId::new(1)
            }
        );
    }

    #[test]
    fn target_grows_by_cube_root() {
        let config = AgentConfig::default();
        let mut target = agent(1, Vec3::ZERO, Vec3::ONE);
        let target_id = target.id;
        initiate_merge(&mut target, target_id, AgentId::new(2), 2.0, &config, false).unwrap();

        let progress = advance_merge(&mut target, None, 0.75, &config, false).unwrap();
        assert_eq!(progress, MergeProgress::InProgress);
        assert_eq!(target.scale, Vec3::ONE);

        let progress = advance_merge(&mut target, None, 0.25, &config, false).unwrap();
        assert!(matches!(progress, MergeProgress::Grown { new_volume } if (new_volume - 2.0).abs() < 1e-5));
        assert_eq!(target.state, AgentState::Pursue);
        assert!(target.merge.is_none());
        let expected_speed = 2.0_f32.cbrt() / 0.5;
        assert!((target.max_speed - expected_speed).abs() < 1e-5);
    }

    #[test]
    fn merge_finishes_on_the_tick_its_duration_elapses() {
        let config = AgentConfig::default();
        for (dt, expected_ticks) in [(0.02, 50), (0.1, 10), (0.2, 5), (0.25, 4)] {
            let target = agent(1, Vec3::ZERO, Vec3::ONE);
            let mut source = agent(2, Vec3::X, Vec3::ONE);
            let source_id = source.id;
            initiate_merge(&mut source, target.id, source_id, 2.0, &config, false).unwrap();
            let anchor = Some(MergeAnchor::of(&target));

            let mut ticks = 0;
            loop {
                ticks += 1;
                let progress = advance_merge(&mut source, anchor, dt, &config, false).unwrap();
                if progress != MergeProgress::InProgress {
                    break;
                }
                assert!(ticks < expected_ticks, "dt {dt}: still merging after {ticks} ticks");
            }
            assert_eq!(ticks, expected_ticks, "dt {dt}");
        }
    }

    #[test]
    fn advance_without_merge_fails() {
        let config = AgentConfig::default();
        let mut a = agent(1, Vec3::ZERO, Vec3::ONE);
        let err = advance_merge(&mut a, None, 0.1, &config, false).unwrap_err();
        assert!(matches!(err, AgentError::NotMerging(_)));
    }
}
