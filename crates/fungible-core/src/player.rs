//! The player collaborator.
//!
//! The swarm only ever sees the player through a [`PlayerSnapshot`] handed
//! in each tick and a [`DamageSink`] it forwards attack damage to.
//! [`PlayerAvatar`] bundles both for the session runner, and
//! [`ScriptedPlayer`] is the headless avatar the engine binary drives.

use fungible_types::{AgentId, PlayerSnapshot};
use glam::Vec3;
use tracing::{debug, info};

use crate::config::SessionConfig;

/// Receives damage produced by agent attacks.
pub trait DamageSink {
    /// Apply `amount` damage dealt by `attacker`.
    fn apply_damage(&mut self, attacker: AgentId, amount: f32);
}

/// A player the session runner can drive.
pub trait PlayerAvatar: DamageSink {
    /// The player as the swarm should see it this tick.
    fn snapshot(&self) -> PlayerSnapshot;

    /// Advance the player's own behaviour by `dt` seconds.
    fn advance(&mut self, dt: f32);
}

/// A headless player that stands still or patrols a circle until its
/// health runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedPlayer {
    center: Vec3,
    position: Vec3,
    health: f32,
    damage_taken: f32,
    orbit_radius: f32,
    orbit_speed: f32,
    angle: f32,
    dead: bool,
}

impl ScriptedPlayer {
    /// A stationary player at `position` with `health` hit points.
    pub const fn new(position: Vec3, health: f32) -> Self {
        Self {
            center: position,
            position,
            health,
            damage_taken: 0.0,
            orbit_radius: 0.0,
            orbit_speed: 0.0,
            angle: 0.0,
            dead: false,
        }
    }

    /// Patrol a circle of `radius` around the start position at
    /// `angular_speed` radians per second.
    #[must_use]
    pub fn with_orbit(mut self, radius: f32, angular_speed: f32) -> Self {
        self.orbit_radius = radius;
        self.orbit_speed = angular_speed;
        self.position = self.center + Vec3::new(radius, 0.0, 0.0);
        self
    }

    /// Build the player described by the session configuration.
    pub fn from_config(session: &SessionConfig) -> Self {
        Self::new(session.player_start, session.player_health)
            .with_orbit(session.player_orbit_radius, session.player_orbit_speed)
    }

    /// Remaining health (never below zero).
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Total damage received.
    pub const fn damage_taken(&self) -> f32 {
        self.damage_taken
    }

    /// Whether health has run out.
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Current position.
    pub const fn position(&self) -> Vec3 {
        self.position
    }
}

impl DamageSink for ScriptedPlayer {
    fn apply_damage(&mut self, attacker: AgentId, amount: f32) {
        if self.dead {
            return;
        }
        self.damage_taken += amount;
        self.health = (self.health - amount).max(0.0);
        debug!(%attacker, amount, health = self.health, "player hit");
        if self.health <= 0.0 {
            self.dead = true;
            info!(%attacker, damage_taken = self.damage_taken, "player died");
        }
    }
}

impl PlayerAvatar for ScriptedPlayer {
    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            is_dead: self.dead,
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.dead || self.orbit_radius <= 0.0 {
            return;
        }
        self.angle = (self.angle + self.orbit_speed * dt) % std::f32::consts::TAU;
        let offset = Vec3::new(self.angle.cos(), 0.0, self.angle.sin()) * self.orbit_radius;
        self.position = self.center + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_depletes_health_then_kills() {
        let mut player = ScriptedPlayer::new(Vec3::new(0.0, 0.5, 0.0), 100.0);
        player.apply_damage(AgentId::new(1), 60.0);
        assert!(!player.is_dead());
        assert!((player.health() - 40.0).abs() < f32::EPSILON);

        player.apply_damage(AgentId::new(2), 45.0);
        assert!(player.is_dead());
        assert!(player.health().abs() < f32::EPSILON);
        assert!(player.snapshot().is_dead);

        player.apply_damage(AgentId::new(3), 10.0);
        assert!((player.damage_taken() - 105.0).abs() < 1e-4);
    }

    #[test]
    fn orbit_stays_on_circle() {
        let mut player = ScriptedPlayer::new(Vec3::new(1.0, 0.5, 1.0), 100.0).with_orbit(3.0, 0.5);
        for _ in 0..100 {
            player.advance(0.1);
            let offset = player.position() - Vec3::new(1.0, 0.5, 1.0);
            assert!((offset.length() - 3.0).abs() < 1e-4);
            assert!(offset.y.abs() < f32::EPSILON);
        }
    }

    #[test]
    fn dead_player_stops_moving() {
        let mut player = ScriptedPlayer::new(Vec3::ZERO, 1.0).with_orbit(2.0, 1.0);
        player.apply_damage(AgentId::new(1), 5.0);
        let before = player.position();
        player.advance(1.0);
        assert_eq!(player.position(), before);
    }

    #[test]
    fn stationary_by_default() {
        let mut player = ScriptedPlayer::from_config(&SessionConfig::default());
        player.advance(1.0);
        assert_eq!(player.position(), Vec3::new(0.0, 0.5, 0.0));
    }
}
