//! Population scheduler: survival clock, threat level, and spawn decisions.
//!
//! Threat grows logarithmically with the number of agents ever spawned:
//!
//! ```text
//! threat_level = clamp(floor(ln(max(zombie_count, 1))), 0, 14)
//! spawn_rate   = base_spawn_rate * (1 + threat_level)
//! P(spawn)     = spawn_rate * dt          (one Bernoulli draw per tick)
//! ```
//!
//! At most one agent spawns per tick. The caller owns `zombie_count` and
//! increments it when it inserts a spawned agent.

use fungible_types::{MAX_THREAT_LEVEL, SpawnRequest};
use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::config::{ArenaConfig, PopulationConfig};

/// The axis-aligned region new agents appear in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnBounds {
    /// `[x_min, x_max)`.
    pub x: (f32, f32),
    /// `[spawn_height_min, spawn_height_max)`.
    pub height: (f32, f32),
    /// `[z_min, z_max)`.
    pub z: (f32, f32),
}

impl SpawnBounds {
    /// Spawn bounds from the arena configuration.
    pub const fn from_arena(arena: &ArenaConfig) -> Self {
        Self {
            x: (arena.x_min, arena.x_max),
            height: (arena.spawn_height_min, arena.spawn_height_max),
            z: (arena.z_min, arena.z_max),
        }
    }

    /// Draw a uniform position, in the order x, height, z.
    fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        let x = rng.random_range(self.x.0..self.x.1);
        let y = rng.random_range(self.height.0..self.height.1);
        let z = rng.random_range(self.z.0..self.z.1);
        Vec3::new(x, y, z)
    }
}

/// The scheduler's verdict for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnDecision {
    /// Threat level computed from the count before this tick's spawn.
    pub threat_level: u8,
    /// Spawns per second at that threat level.
    pub spawn_rate: f32,
    /// Probability of a spawn this tick (may exceed one).
    pub probability: f32,
    /// The spawn to perform, if the draw succeeded.
    pub request: Option<SpawnRequest>,
}

/// Tracks survival time and decides when new agents appear.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationScheduler {
    base_spawn_rate: f32,
    bounds: SpawnBounds,
    elapsed_time: f32,
}

impl PopulationScheduler {
    /// Create a scheduler with no elapsed time.
    pub const fn new(base_spawn_rate: f32, bounds: SpawnBounds) -> Self {
        Self {
            base_spawn_rate,
            bounds,
            elapsed_time: 0.0,
        }
    }

    /// Create a scheduler from the population and arena configuration.
    pub const fn from_config(population: &PopulationConfig, arena: &ArenaConfig) -> Self {
        Self::new(population.base_spawn_rate, SpawnBounds::from_arena(arena))
    }

    /// Survival time in seconds.
    pub const fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    /// The region spawns are drawn from.
    pub const fn bounds(&self) -> &SpawnBounds {
        &self.bounds
    }

    /// Zero the survival clock.
    pub const fn reset(&mut self) {
        self.elapsed_time = 0.0;
    }

    /// Advance the clock by `dt` and decide whether to spawn.
    ///
    /// Draws one uniform value for the spawn roll and, on success, three
    /// more for the position.
    pub fn tick(&mut self, dt: f32, zombie_count: u64, rng: &mut impl Rng) -> SpawnDecision {
        self.elapsed_time += dt;

        let threat_level = threat_level_for(zombie_count);
        let spawn_rate = self.base_spawn_rate * (1.0 + f32::from(threat_level));
        let probability = spawn_rate * dt;
        let roll: f32 = rng.random();

        let request = (roll < probability).then(|| SpawnRequest {
            position: self.bounds.sample(rng),
        });
        if let Some(spawn) = &request {
            debug!(
                threat_level,
                spawn_rate,
                position = %spawn.position,
                "spawn scheduled"
            );
        }

        SpawnDecision {
            threat_level,
            spawn_rate,
            probability,
            request,
        }
    }
}

/// `clamp(floor(ln(max(count, 1))), 0, 14)`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn threat_level_for(zombie_count: u64) -> u8 {
    let level = (zombie_count.max(1) as f64).ln().floor();
    level.clamp(0.0, f64::from(MAX_THREAT_LEVEL)) as u8
}
