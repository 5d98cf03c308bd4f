//! Flat arena motion: a floor, a lethal plane beneath it, and the player.
//!
//! The floor covers the spawn bounds plus `footprint_margin` on every side.
//! Anything that walks off the edge falls until it crosses `kill_height`,
//! which reports [`Contact::KillZone`]. Horizontal moves into the player's
//! cylinder are clamped to its surface and report [`Contact::Player`].

use fungible_agents::{Body, Contact, KinematicMotion, MotionOutcome};
use fungible_types::PlayerSnapshot;
use glam::Vec3;

use crate::config::ArenaConfig;

/// A flat rectangular floor with a kill plane underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatArena {
    floor_y: f32,
    x_range: (f32, f32),
    z_range: (f32, f32),
    kill_height: f32,
    body_radius_factor: f32,
    player_radius: f32,
    player_height: f32,
}

impl FlatArena {
    /// Build the arena from configuration.
    pub fn new(arena: &ArenaConfig) -> Self {
        let margin = arena.footprint_margin;
        Self {
            floor_y: arena.floor_y,
            x_range: (arena.x_min - margin, arena.x_max + margin),
            z_range: (arena.z_min - margin, arena.z_max + margin),
            kill_height: arena.kill_height,
            body_radius_factor: arena.body_radius_factor,
            player_radius: arena.player_radius,
            player_height: arena.player_height,
        }
    }

    /// Whether `position` lies above the floor footprint.
    pub fn over_floor(&self, position: Vec3) -> bool {
        (self.x_range.0..=self.x_range.1).contains(&position.x)
            && (self.z_range.0..=self.z_range.1).contains(&position.z)
    }

    fn contact_reach(&self, scale: Vec3) -> f32 {
        self.player_radius + scale.x.max(scale.z) * self.body_radius_factor
    }
}

impl KinematicMotion for FlatArena {
    fn move_body(
        &mut self,
        body: &Body,
        displacement: Vec3,
        player: &PlayerSnapshot,
    ) -> MotionOutcome {
        let mut position = body.position + displacement;
        if !body.collisions_enabled {
            return MotionOutcome::free(position, false);
        }

        let mut outcome = MotionOutcome::free(position, false);
        let half_height = body.scale.y / 2.0;

        // Only bodies whose center started above the floor land on it.
        if self.over_floor(position)
            && body.position.y >= self.floor_y
            && position.y - half_height <= self.floor_y
        {
            position.y = self.floor_y + half_height;
            outcome.grounded = true;
        }

        let horizontal = Vec3::new(displacement.x, 0.0, displacement.z);
        if horizontal.length_squared() > 0.0 {
            let gap = Vec3::new(position.x - player.position.x, 0.0, position.z - player.position.z);
            let reach = self.contact_reach(body.scale);
            let vertical_reach = half_height + self.player_height / 2.0;
            if gap.length() < reach && (position.y - player.position.y).abs() < vertical_reach {
                let push = gap.normalize_or_zero();
                if push.length_squared() > 0.0 {
                    position.x = player.position.x + push.x * reach;
                    position.z = player.position.z + push.z * reach;
                } else {
                    position.x = body.position.x;
                    position.z = body.position.z;
                }
                outcome.contacts.push(Contact::Player);
            }
        }

        if position.y < self.kill_height {
            outcome.contacts.push(Contact::KillZone);
        }

        outcome.position = position;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use fungible_types::AgentId;

    use super::*;

    fn body(position: Vec3) -> Body {
        Body {
            id: AgentId::new(1),
            position,
            scale: Vec3::ONE,
            collisions_enabled: true,
        }
    }

    fn far_player() -> PlayerSnapshot {
        PlayerSnapshot::alive_at(Vec3::new(100.0, 0.5, 100.0))
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let mut arena = FlatArena::new(&ArenaConfig::default());
        let outcome = arena.move_body(&body(Vec3::new(0.0, 0.6, 0.0)), Vec3::new(0.0, -0.5, 0.0), &far_player());
        assert!(outcome.grounded);
        assert!((outcome.position.y - 0.5).abs() < f32::EPSILON);
        assert!(outcome.contacts.is_empty());
    }

    #[test]
    fn body_off_the_edge_falls_into_kill_zone() {
        let mut arena = FlatArena::new(&ArenaConfig::default());
        let start = Vec3::new(8.0, -9.9, 0.0);
        let outcome = arena.move_body(&body(start), Vec3::new(0.0, -0.5, 0.0), &far_player());
        assert!(!outcome.grounded);
        assert_eq!(outcome.contacts, vec![Contact::KillZone]);
    }

    #[test]
    fn grown_body_is_lifted_out_of_the_floor() {
        let mut arena = FlatArena::new(&ArenaConfig::default());
        let grown = Body {
            scale: Vec3::splat(2.0),
            ..body(Vec3::new(0.0, 0.5, 0.0))
        };
        let outcome = arena.move_body(&grown, Vec3::new(0.0, -0.01, 0.0), &far_player());
        assert!(outcome.grounded);
        assert!((outcome.position.y - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn walking_into_player_clamps_and_reports_contact() {
        let mut arena = FlatArena::new(&ArenaConfig::default());
        let player = PlayerSnapshot::alive_at(Vec3::new(1.0, 0.5, 0.0));
        let outcome = arena.move_body(&body(Vec3::new(0.5, 0.5, 0.0)), Vec3::new(0.2, 0.0, 0.0), &player);
        assert_eq!(outcome.contacts, vec![Contact::Player]);
        // Clamped to the contact ring at 0.3 + 0.3 from the player.
        assert!((outcome.position.x - 0.4).abs() < 1e-6);
    }

    #[test]
    fn vertical_move_never_touches_player() {
        let mut arena = FlatArena::new(&ArenaConfig::default());
        let player = PlayerSnapshot::alive_at(Vec3::new(0.1, 0.5, 0.0));
        let outcome = arena.move_body(&body(Vec3::new(0.0, 0.5, 0.0)), Vec3::new(0.0, -0.1, 0.0), &player);
        assert!(outcome.contacts.is_empty());
    }

    #[test]
    fn disabled_collisions_pass_through() {
        let mut arena = FlatArena::new(&ArenaConfig::default());
        let ghost = Body {
            collisions_enabled: false,
            ..body(Vec3::new(0.0, 0.5, 0.0))
        };
        let outcome = arena.move_body(&ghost, Vec3::new(0.0, -20.0, 0.0), &far_player());
        assert!(!outcome.grounded);
        assert!(outcome.contacts.is_empty());
        assert!((outcome.position.y + 19.5).abs() < 1e-5);
    }
}
