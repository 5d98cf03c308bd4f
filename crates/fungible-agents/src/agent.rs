//! The agent record and its derived statistics.
//!
//! An [`Agent`] is one zombie: a non-uniformly scaled box with a
//! behavioural state, a forward speed that ramps toward `max_speed`, and a
//! vertical velocity integrated under gravity. Volume is the product of the
//! scale components and is what merges conserve.

use fungible_types::{AgentId, AgentSnapshot, AgentState};
use glam::Vec3;
use tracing::trace;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::merge::MergeState;
use crate::motion::Body;
use crate::transition::{StateEvent, next_state};

/// A single swarm member.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Unique, monotonically assigned identifier.
    pub id: AgentId,
    /// Body center in world space.
    pub position: Vec3,
    /// Unit heading on the horizontal plane.
    pub forward: Vec3,
    /// Per-axis scale; every component is positive.
    pub scale: Vec3,
    /// Vertical velocity in units/s.
    pub velocity_y: f32,
    /// Current behavioural state.
    pub state: AgentState,
    /// Current forward speed in `[0, max_speed]`.
    pub speed: f32,
    /// Speed ceiling, derived from scale after each merge.
    pub max_speed: f32,
    /// Jump height, derived from scale after each merge.
    pub jump_height: f32,
    /// Seconds left before a pending attack resolves.
    pub attack_cooldown: f32,
    /// Seconds left before the next wander heading change.
    pub wander_timer: f32,
    /// Merge bookkeeping while in a merge state.
    pub merge: Option<MergeState>,
    /// Whether the last move left the agent on the ground.
    pub grounded: bool,
    /// Whether the body collides with the world.
    pub collisions_enabled: bool,
    /// Whether the agent has touched the player and may damage it.
    pub attack_target_bound: bool,
}

impl Agent {
    /// Create a freshly spawned agent.
    ///
    /// The agent starts in `Pursue`, or in `Wander` when the player is
    /// already dead.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NonFinitePosition`] for NaN or infinite
    /// coordinates and [`AgentError::DegenerateScale`] when any scale
    /// component is non-finite or below `config.min_scale`.
    pub fn spawn(
        id: AgentId,
        position: Vec3,
        scale: Vec3,
        player_dead: bool,
        config: &AgentConfig,
    ) -> Result<Self, AgentError> {
        if !position.is_finite() {
            return Err(AgentError::NonFinitePosition { position });
        }
        if !scale.is_finite() || scale.min_element() < config.min_scale {
            return Err(AgentError::DegenerateScale {
                scale,
                min_scale: config.min_scale,
            });
        }

        Ok(Self {
            id,
            position,
            forward: Vec3::Z,
            scale,
            velocity_y: 0.0,
            state: crate::transition::rest_state(player_dead),
            speed: 0.0,
            max_speed: config.initial_max_speed,
            jump_height: config.initial_jump_height,
            attack_cooldown: 0.0,
            wander_timer: 0.0,
            merge: None,
            grounded: false,
            collisions_enabled: true,
            attack_target_bound: false,
        })
    }

    /// Product of the scale components.
    pub const fn volume(&self) -> f32 {
        self.scale.x * self.scale.y * self.scale.z
    }

    /// Horizontal reach used for merge overlap tests.
    pub const fn merge_radius(&self) -> f32 {
        self.scale.x.max(self.scale.z) / 2.0
    }

    /// Distance within which a resolved attack damages the player.
    pub fn attack_radius(&self, config: &AgentConfig) -> f32 {
        self.scale.x.max(self.scale.z).sqrt() * config.attack_radius_factor
    }

    /// Point on top of the body where a merging partner converges.
    pub fn top_surface(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.scale.y / 2.0, 0.0)
    }

    /// Whether this agent is part of a merge in either role.
    pub const fn is_merging(&self) -> bool {
        self.state.is_merging()
    }

    /// The physical view handed to the motion collaborator.
    pub const fn body(&self) -> Body {
        Body {
            id: self.id,
            position: self.position,
            scale: self.scale,
            collisions_enabled: self.collisions_enabled,
        }
    }

    /// Recompute `max_speed` and `jump_height` from the current scale.
    pub fn refresh_derived_stats(&mut self, config: &AgentConfig) {
        self.max_speed = max_speed_for_scale(self.scale, config);
        self.jump_height = jump_height_for_scale(self.scale, config);
        self.speed = self.speed.min(self.max_speed);
    }

    /// Apply `event` through the transition table.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::IllegalTransition`] when the table has no
    /// entry for the current state and `event`; the state is unchanged.
    pub fn apply_event(&mut self, event: StateEvent, player_dead: bool) -> Result<(), AgentError> {
        let next =
            next_state(self.state, event, player_dead).ok_or(AgentError::IllegalTransition {
                agent_id: self.id,
                from: self.state,
                event,
            })?;
        if next != self.state {
            trace!(agent_id = %self.id, from = %self.state, to = %next, %event, "state transition");
        }
        self.state = next;
        Ok(())
    }

    /// Presentation view of this agent.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            forward: self.forward,
            scale: self.scale,
            state: self.state,
            volume: self.volume(),
        }
    }
}

/// `max(min_max_speed, max(sx, sz) / speed_width_divisor)`.
pub const fn max_speed_for_scale(scale: Vec3, config: &AgentConfig) -> f32 {
    (scale.x.max(scale.z) / config.speed_width_divisor).max(config.min_max_speed)
}

/// `max(min_jump_height, sqrt(sy))`.
pub fn jump_height_for_scale(scale: Vec3, config: &AgentConfig) -> f32 {
    scale.y.sqrt().max(config.min_jump_height)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn spawn_at(position: Vec3, scale: Vec3) -> Result<Agent, AgentError> {
        Agent::spawn(AgentId::new(1), position, scale, false, &AgentConfig::default())
    }

    #[test]
    fn spawn_starts_pursuing_with_initial_stats() {
        let agent = spawn_at(Vec3::new(0.0, 2.0, 0.0), Vec3::ONE).unwrap();
        assert_eq!(agent.state, AgentState::Pursue);
        assert!((agent.max_speed - 1.0).abs() < f32::EPSILON);
        assert!((agent.jump_height - 0.5).abs() < f32::EPSILON);
        assert!(agent.collisions_enabled);
        assert!(agent.merge.is_none());
    }

    #[test]
    fn spawn_after_player_death_wanders() {
        let config = AgentConfig::default();
        let agent = Agent::spawn(AgentId::new(4), Vec3::ZERO, Vec3::ONE, true, &config).unwrap();
        assert_eq!(agent.state, AgentState::Wander);
    }

    #[test]
    fn degenerate_scale_rejected() {
        for scale in [
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, f32::NAN),
            Vec3::new(1.0, 0.001, 1.0),
        ] {
            let result = spawn_at(Vec3::ZERO, scale);
            assert!(
                matches!(result, Err(AgentError::DegenerateScale { .. })),
                "scale {scale} accepted"
            );
        }
    }

    #[test]
    fn non_finite_position_rejected() {
        let result = spawn_at(Vec3::new(f32::INFINITY, 0.0, 0.0), Vec3::ONE);
        assert!(matches!(result, Err(AgentError::NonFinitePosition { .. })));
    }

    #[test]
    fn derived_geometry() {
        let agent = spawn_at(Vec3::ZERO, Vec3::new(4.0, 2.0, 1.0)).unwrap();
        assert!((agent.volume() - 8.0).abs() < f32::EPSILON);
        assert!((agent.merge_radius() - 2.0).abs() < f32::EPSILON);
        assert!((agent.attack_radius(&AgentConfig::default()) - 1.6).abs() < 1e-6);
        assert_eq!(agent.top_surface(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn derived_stats_have_floors() {
        let config = AgentConfig::default();
        let small = Vec3::new(0.2, 0.1, 0.2);
        assert!((max_speed_for_scale(small, &config) - 1.0).abs() < f32::EPSILON);
        assert!((jump_height_for_scale(small, &config) - 0.5).abs() < f32::EPSILON);

        let large = Vec3::new(3.0, 4.0, 1.0);
        assert!((max_speed_for_scale(large, &config) - 6.0).abs() < 1e-6);
        assert!((jump_height_for_scale(large, &config) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn illegal_event_leaves_state_unchanged() {
        let mut agent = spawn_at(Vec3::ZERO, Vec3::ONE).unwrap();
        let err = agent.apply_event(StateEvent::MergeCompleted, false).unwrap_err();
        assert!(matches!(err, AgentError::IllegalTransition { .. }));
        assert_eq!(agent.state, AgentState::Pursue);
    }
}
