//! Tunables for agent movement, attacks, and merges.
//!
//! The [`AgentConfig`] struct bundles every constant the controller uses so
//! that the swarm and tests can override defaults. The engine builds it
//! from the `agents` section of `fungible-config.yaml`.

/// Configuration for the per-agent controller.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Vertical acceleration in units/s² (default: -9.81).
    pub gravity: f32,

    /// Average wander heading changes per second (default: 0.3).
    pub wander_rate: f32,

    /// Fraction of `max_speed` used while wandering (default: 0.25).
    pub wander_speed_factor: f32,

    /// Length of the merge animation in seconds (default: 1.0).
    pub merge_duration: f32,

    /// A merge finishes once its remaining time is within this fraction of
    /// its duration, so rounding in the countdown never adds a tick
    /// (default: 1e-4).
    pub merge_completion_tolerance: f32,

    /// Smallest accepted scale component at spawn (default: 0.01).
    pub min_scale: f32,

    /// `max_speed` given to freshly spawned agents (default: 1.0).
    pub initial_max_speed: f32,

    /// `jump_height` given to freshly spawned agents (default: 0.5).
    pub initial_jump_height: f32,

    /// Lower bound of the scale-derived `max_speed` (default: 1.0).
    pub min_max_speed: f32,

    /// Width divisor in `max(sx, sz) / divisor` for `max_speed` (default: 0.5).
    pub speed_width_divisor: f32,

    /// Lower bound of the scale-derived `jump_height` (default: 0.5).
    pub min_jump_height: f32,

    /// Speed gained per second, as a fraction of `max_speed` (default: 0.5).
    pub acceleration_factor: f32,

    /// Speed lost per second when not moving, as a fraction of `max_speed`
    /// (default: 2.0).
    pub deceleration_factor: f32,

    /// Wind-up between touching the player and the damage roll, in seconds
    /// (default: 0.3).
    pub attack_windup: f32,

    /// Multiplier in `sqrt(max(sx, sz)) * factor` for the attack reach
    /// (default: 0.8).
    pub attack_radius_factor: f32,

    /// Damage per unit of volume before the random multiplier (default: 10.0).
    pub damage_per_volume: f32,

    /// Height difference toward the player that triggers a jump (default: 0.3).
    pub jump_trigger: f32,

    /// Multiplier in `sqrt(jump_height * factor * |gravity|)` (default: 3.0).
    pub jump_gravity_factor: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            wander_rate: 0.3,
            wander_speed_factor: 0.25,
            merge_duration: 1.0,
            merge_completion_tolerance: 1e-4,
            min_scale: 0.01,
            initial_max_speed: 1.0,
            initial_jump_height: 0.5,
            min_max_speed: 1.0,
            speed_width_divisor: 0.5,
            min_jump_height: 0.5,
            acceleration_factor: 0.5,
            deceleration_factor: 2.0,
            attack_windup: 0.3,
            attack_radius_factor: 0.8,
            damage_per_volume: 10.0,
            jump_trigger: 0.3,
            jump_gravity_factor: 3.0,
        }
    }
}

impl AgentConfig {
    /// Bounds of the uniform wander interval draw, `[0.5 / rate, 1.5 / rate)`.
    pub const fn wander_interval(&self) -> (f32, f32) {
        (0.5 / self.wander_rate, 1.5 / self.wander_rate)
    }

    /// Upward velocity added by a jump of `jump_height`.
    pub fn jump_impulse(&self, jump_height: f32) -> f32 {
        (jump_height * self.jump_gravity_factor * self.gravity.abs()).sqrt()
    }
}
