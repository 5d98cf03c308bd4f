//! The swarm simulation and its fixed-order tick.
//!
//! Each call to [`SwarmSimulation::tick`] runs these phases in order:
//!
//! 1. **Latch** -- observe the player-death signal; while the player is
//!    alive, run the population scheduler and insert any spawn.
//! 2. **Control** -- tick every agent in ascending id order. Attack damage
//!    goes straight to the [`DamageSink`]; absorbed merge sources are removed.
//! 3. **Merge** -- resolve overlapping pairs and start their merges.
//! 4. **Score** -- while the player is alive, accumulate zombie-seconds and
//!    recompute the threat level.
//! 5. **Cleanup** -- remove dead bodies that fell below the cleanup height.
//!
//! All randomness comes from one seeded [`StdRng`] drawn in that same order,
//! so a given seed and input sequence always produces the same snapshots.

use std::collections::BTreeMap;

use fungible_agents::merge::{self, MergeAnchor};
use fungible_agents::{
    Agent, AgentConfig, AgentError, ControllerContext, KinematicMotion, TickOutcome, tick_agent,
};
use fungible_types::{
    AgentId, AgentState, MergePair, PlayerSnapshot, RunId, SwarmSnapshot, ThreatTier,
};
use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{ConfigError, SimulationConfig};
use crate::player::DamageSink;
use crate::resolver;
use crate::scheduler::{PopulationScheduler, threat_level_for};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The timestep is zero, negative, or not finite.
    #[error("invalid tick delta {dt}: must be finite and positive")]
    InvalidDelta {
        /// The rejected timestep.
        dt: f32,
    },

    /// An agent operation failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// Every agent id has been handed out.
    #[error("agent id space exhausted")]
    IdsExhausted,
}

/// Everything the swarm owns between ticks.
#[derive(Debug, Clone)]
pub struct SwarmState {
    /// Current run.
    pub run_id: RunId,
    /// All agents, keyed and iterated in ascending id order.
    pub agents: BTreeMap<AgentId, Agent>,
    /// Survival clock and spawn decisions.
    pub scheduler: PopulationScheduler,
    /// Threat level in `[0, 14]`.
    pub threat_level: u8,
    /// Agents ever spawned this run. Never decremented.
    pub zombie_count: u64,
    /// Accumulated zombie-seconds survived.
    pub score: f32,
    /// Ticks executed this run.
    pub tick: u64,
    /// Latched once the player is observed dead.
    pub player_dead: bool,
    /// Id handed to the next spawned agent.
    pub next_id: AgentId,
}

impl SwarmState {
    fn new(scheduler: PopulationScheduler) -> Self {
        Self {
            run_id: RunId::new(),
            agents: BTreeMap::new(),
            scheduler,
            threat_level: 0,
            zombie_count: 0,
            score: 0.0,
            tick: 0,
            player_dead: false,
            next_id: AgentId::new(1),
        }
    }

    /// Survival time in seconds.
    pub const fn elapsed_time(&self) -> f32 {
        self.scheduler.elapsed_time()
    }
}

/// Per-tick bookkeeping reported in the snapshot.
#[derive(Debug, Default)]
struct TickActivity {
    spawned: Option<AgentId>,
    removed: Vec<AgentId>,
    merges_started: Vec<MergePair>,
    damage_dealt: f32,
}

/// The swarm simulation engine.
#[derive(Debug)]
pub struct SwarmSimulation {
    state: SwarmState,
    agent_config: AgentConfig,
    spawn_scale: Vec3,
    cleanup_height: f32,
    rng: StdRng,
}

impl SwarmSimulation {
    /// Create a simulation from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// [`SimulationConfig::validate`].
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = PopulationScheduler::from_config(&config.population, &config.arena);
        let state = SwarmState::new(scheduler);
        info!(
            run_id = %state.run_id,
            world = config.world.name,
            seed = config.world.seed,
            "swarm simulation created"
        );
        Ok(Self {
            state,
            agent_config: config.agents.to_agent_config(),
            spawn_scale: config.population.spawn_scale,
            cleanup_height: config.arena.cleanup_height,
            rng: StdRng::seed_from_u64(config.world.seed),
        })
    }

    /// Current swarm state.
    pub const fn state(&self) -> &SwarmState {
        &self.state
    }

    /// The agent with `id`, if present.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.state.agents.get(&id)
    }

    /// All agents in ascending id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.state.agents.values()
    }

    /// Controller tunables in use.
    pub const fn agent_config(&self) -> &AgentConfig {
        &self.agent_config
    }

    /// Insert a new agent and count it toward the threat.
    ///
    /// The agent pursues, or wanders when the player-death latch is set.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Agent`] when the position or scale is rejected
    /// and [`TickError::IdsExhausted`] when no ids remain.
    pub fn spawn_agent(&mut self, position: Vec3, scale: Vec3) -> Result<AgentId, TickError> {
        let id = self.state.next_id;
        let next_id = id.next().ok_or(TickError::IdsExhausted)?;
        let agent = Agent::spawn(id, position, scale, self.state.player_dead, &self.agent_config)
            .map_err(|source| TickError::Agent {
                agent_id: id,
                source,
            })?;

        self.state.next_id = next_id;
        self.state.agents.insert(id, agent);
        self.state.zombie_count = self.state.zombie_count.saturating_add(1);
        debug!(
            agent_id = %id,
            %position,
            zombie_count = self.state.zombie_count,
            "agent spawned"
        );
        Ok(id)
    }

    /// Start a new run on the same arena: clear agents, counters, and the
    /// player-death latch, and issue a new run id.
    pub fn reset(&mut self) {
        let mut scheduler = self.state.scheduler.clone();
        scheduler.reset();
        let previous = self.state.run_id;
        self.state = SwarmState::new(scheduler);
        info!(previous_run = %previous, run_id = %self.state.run_id, "swarm reset");
    }

    /// Advance the swarm by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::InvalidDelta`] for a non-positive or non-finite
    /// `dt` (nothing changes), or [`TickError::Agent`] when an agent
    /// operation violates its contract.
    pub fn tick<M, D>(
        &mut self,
        dt: f32,
        player: &PlayerSnapshot,
        motion: &mut M,
        damage: &mut D,
    ) -> Result<SwarmSnapshot, TickError>
    where
        M: KinematicMotion + ?Sized,
        D: DamageSink + ?Sized,
    {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TickError::InvalidDelta { dt });
        }
        self.state.tick = self.state.tick.saturating_add(1);
        let mut activity = TickActivity::default();

        // Phase 1: latch player death, then spawn while the player lives.
        if player.is_dead && !self.state.player_dead {
            self.state.player_dead = true;
            info!(
                tick = self.state.tick,
                survived = self.state.elapsed_time(),
                score = self.state.score,
                "player death observed"
            );
        }
        if !self.state.player_dead {
            let decision = self
                .state
                .scheduler
                .tick(dt, self.state.zombie_count, &mut self.rng);
            self.state.threat_level = decision.threat_level;
            if let Some(request) = decision.request {
                activity.spawned = Some(self.spawn_agent(request.position, self.spawn_scale)?);
            }
        }

        // Phase 2: controller pass.
        self.control_pass(dt, player, motion, damage, &mut activity)?;

        // Phase 3: merge resolution.
        self.start_merges(player.position, &mut activity)?;

        // Phase 4: score and threat.
        if !self.state.player_dead {
            #[allow(clippy::cast_precision_loss)]
            let zombies = self.state.zombie_count as f32;
            self.state.score += dt * zombies;
            self.state.threat_level = threat_level_for(self.state.zombie_count);
        }

        // Phase 5: corpse cleanup.
        self.cleanup_bodies(&mut activity);

        Ok(self.build_snapshot(activity))
    }

    /// Snapshot of the current state with no per-tick activity.
    pub fn snapshot(&self) -> SwarmSnapshot {
        self.build_snapshot(TickActivity::default())
    }

    fn control_pass<M, D>(
        &mut self,
        dt: f32,
        player: &PlayerSnapshot,
        motion: &mut M,
        damage: &mut D,
        activity: &mut TickActivity,
    ) -> Result<(), TickError>
    where
        M: KinematicMotion + ?Sized,
        D: DamageSink + ?Sized,
    {
        let ids: Vec<AgentId> = self.state.agents.keys().copied().collect();
        for id in ids {
            let partner_anchor = self.partner_anchor(id);
            let Some(agent) = self.state.agents.get_mut(&id) else {
                continue;
            };
            let ctx = ControllerContext {
                dt,
                player,
                player_dead: self.state.player_dead,
                partner_anchor,
                config: &self.agent_config,
            };
            let report = tick_agent(agent, &ctx, motion, &mut self.rng)
                .map_err(|source| TickError::Agent {
                    agent_id: id,
                    source,
                })?;

            if let Some(amount) = report.damage {
                damage.apply_damage(id, amount);
                activity.damage_dealt += amount;
            }
            match report.outcome {
                TickOutcome::Absorbed { into } => {
                    self.state.agents.remove(&id);
                    activity.removed.push(id);
                    debug!(agent_id = %id, %into, "merge source absorbed");
                }
                TickOutcome::Grown { new_volume } => {
                    info!(agent_id = %id, new_volume, "merge completed");
                }
                TickOutcome::Died(_) | TickOutcome::Active => {}
            }
        }
        Ok(())
    }

    /// The partner body a merge source converges on.
    fn partner_anchor(&self, id: AgentId) -> Option<MergeAnchor> {
        let agent = self.state.agents.get(&id)?;
        if agent.state != AgentState::MergeSource {
            return None;
        }
        let partner = agent.merge.as_ref()?.partner;
        self.state.agents.get(&partner).map(MergeAnchor::of)
    }

    fn start_merges(
        &mut self,
        player_position: Vec3,
        activity: &mut TickActivity,
    ) -> Result<(), TickError> {
        let pairs = resolver::resolve(&self.state.agents, player_position);
        for pair in pairs {
            for id in [pair.winner, pair.loser] {
                let agent = self.state.agents.get_mut(&id).ok_or(TickError::Agent {
                    agent_id: id,
                    source: AgentError::AgentNotFound(id),
                })?;
                merge::initiate_merge(
                    agent,
                    pair.winner,
                    pair.loser,
                    pair.size_multiplier,
                    &self.agent_config,
                    self.state.player_dead,
                )
                .map_err(|source| TickError::Agent {
                    agent_id: id,
                    source,
                })?;
            }
            debug!(
                winner = %pair.winner,
                loser = %pair.loser,
                size_multiplier = pair.size_multiplier,
                "merge started"
            );
            activity.merges_started.push(pair);
        }
        Ok(())
    }

    fn cleanup_bodies(&mut self, activity: &mut TickActivity) {
        let cleanup_height = self.cleanup_height;
        let fallen: Vec<AgentId> = self
            .state
            .agents
            .values()
            .filter(|agent| agent.state.is_dead() && agent.position.y < cleanup_height)
            .map(|agent| agent.id)
            .collect();
        for id in fallen {
            self.state.agents.remove(&id);
            activity.removed.push(id);
            debug!(agent_id = %id, "dead body removed");
        }
    }

    fn build_snapshot(&self, activity: TickActivity) -> SwarmSnapshot {
        let state = &self.state;
        SwarmSnapshot {
            run_id: state.run_id,
            tick: state.tick,
            elapsed_time: state.elapsed_time(),
            score: state.score,
            threat_level: state.threat_level,
            threat_name: ThreatTier::from_level(state.threat_level).name().to_owned(),
            zombie_count: state.zombie_count,
            present_agents: state.agents.len(),
            player_dead: state.player_dead,
            spawned: activity.spawned,
            removed: activity.removed,
            merges_started: activity.merges_started,
            damage_dealt: activity.damage_dealt,
            agents: state.agents.values().map(Agent::snapshot).collect(),
        }
    }
}
