//! Per-tick agent controller.
//!
//! [`tick_agent`] runs one agent through a fixed pipeline each tick:
//!
//! 1. **Player death** -- observe the latched broadcast (`Pursue -> Wander`)
//! 2. **Merge** -- advance an in-progress merge; skip the rest of the tick
//!    unless the agent is a target that just finished growing
//! 3. **Gravity** -- integrate vertical velocity and move vertically
//! 4. **Dead** -- dead agents only fall
//! 5. **Attack** -- count down the wind-up and roll damage when it elapses
//! 6. **Wander** -- random walk at a fraction of `max_speed`
//! 7. **Pursue** -- ramp speed, move toward the player, jump when it is above
//!
//! Each state has its own handler. Every displacement goes through the
//! [`KinematicMotion`] collaborator, and contacts it reports feed back into
//! the transition table.

use fungible_types::{AgentId, AgentState, PlayerSnapshot};
use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::death::{self, DeathCause};
use crate::error::AgentError;
use crate::merge::{self, MergeAnchor, MergeProgress};
use crate::motion::{Contact, KinematicMotion};
use crate::transition::StateEvent;

/// Everything an agent reads during its tick besides itself.
#[derive(Debug, Clone, Copy)]
pub struct ControllerContext<'a> {
    /// Seconds elapsed since the previous tick.
    pub dt: f32,
    /// The player as supplied to the swarm this tick.
    pub player: &'a PlayerSnapshot,
    /// The swarm's latched player-death signal.
    pub player_dead: bool,
    /// The merge partner's body, when the agent is a merge source.
    pub partner_anchor: Option<MergeAnchor>,
    /// Controller tunables.
    pub config: &'a AgentConfig,
}

/// How the tick ended for the agent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TickOutcome {
    /// Nothing structural happened.
    #[default]
    Active,
    /// The agent was a merge source that completed and must be removed.
    Absorbed {
        /// The target that absorbed the agent.
        into: AgentId,
    },
    /// The agent was a merge target that completed and grew.
    Grown {
        /// Volume after growth.
        new_volume: f32,
    },
    /// The agent died this tick.
    Died(DeathCause),
}

/// What the swarm needs to know after an agent's tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentTickReport {
    /// Structural outcome of the tick.
    pub outcome: TickOutcome,
    /// Damage to forward to the player, when an attack landed.
    pub damage: Option<f32>,
}

/// Run one controller tick for `agent`.
///
/// # Errors
///
/// Returns an [`AgentError`] when a transition or merge step violates the
/// agent's contract. The agent may have been partially updated.
pub fn tick_agent<M>(
    agent: &mut Agent,
    ctx: &ControllerContext<'_>,
    motion: &mut M,
    rng: &mut impl Rng,
) -> Result<AgentTickReport, AgentError>
where
    M: KinematicMotion + ?Sized,
{
    let mut report = AgentTickReport::default();

    if ctx.player_dead {
        agent.apply_event(StateEvent::PlayerDied, true)?;
    }

    if agent.is_merging() {
        match merge::advance_merge(agent, ctx.partner_anchor, ctx.dt, ctx.config, ctx.player_dead)? {
            MergeProgress::InProgress => return Ok(report),
            MergeProgress::Absorbed { into } => {
                report.outcome = TickOutcome::Absorbed { into };
                return Ok(report);
            }
            MergeProgress::Grown { new_volume } => {
                report.outcome = TickOutcome::Grown { new_volume };
            }
        }
    }

    let was_grounded = apply_gravity(agent, ctx, motion, &mut report)?;

    match agent.state {
        AgentState::Attack => resolve_attack(agent, ctx, rng, &mut report)?,
        AgentState::Wander => wander(agent, ctx, motion, rng, &mut report)?,
        AgentState::Pursue => pursue(agent, ctx, motion, was_grounded, &mut report)?,
        AgentState::Dead | AgentState::MergeSource | AgentState::MergeTarget => {}
    }

    Ok(report)
}

/// Integrate gravity and move vertically. Returns the grounded flag from
/// before the move, which gates this tick's jump.
fn apply_gravity<M>(
    agent: &mut Agent,
    ctx: &ControllerContext<'_>,
    motion: &mut M,
    report: &mut AgentTickReport,
) -> Result<bool, AgentError>
where
    M: KinematicMotion + ?Sized,
{
    let was_grounded = agent.grounded;
    if was_grounded && agent.velocity_y < 0.0 {
        agent.velocity_y = 0.0;
    }
    agent.velocity_y += ctx.config.gravity * ctx.dt;
    let displacement = Vec3::new(0.0, agent.velocity_y * ctx.dt, 0.0);
    move_agent(agent, displacement, ctx, motion, report)?;
    Ok(was_grounded)
}

fn resolve_attack(
    agent: &mut Agent,
    ctx: &ControllerContext<'_>,
    rng: &mut impl Rng,
    report: &mut AgentTickReport,
) -> Result<(), AgentError> {
    agent.attack_cooldown -= ctx.dt;
    if agent.attack_cooldown > 0.0 {
        return Ok(());
    }
    agent.attack_cooldown = 0.0;

    let reach = agent.attack_radius(ctx.config);
    let distance = agent.position.distance(ctx.player.position);
    if agent.attack_target_bound && distance <= reach {
        let roll: f32 = rng.random();
        let damage = agent.volume() * ctx.config.damage_per_volume * (1.0 + roll);
        debug!(agent_id = %agent.id, damage, distance, "attack landed");
        report.damage = Some(damage);
    }
    agent.apply_event(StateEvent::AttackResolved, ctx.player_dead)
}

fn wander<M>(
    agent: &mut Agent,
    ctx: &ControllerContext<'_>,
    motion: &mut M,
    rng: &mut impl Rng,
    report: &mut AgentTickReport,
) -> Result<(), AgentError>
where
    M: KinematicMotion + ?Sized,
{
    agent.wander_timer -= ctx.dt;
    if agent.wander_timer <= 0.0 {
        let x = rng.random::<f32>() - 0.5;
        let z = rng.random::<f32>() - 0.5;
        let heading = Vec3::new(x, 0.0, z).normalize_or_zero();
        if heading.length_squared() > 0.0 {
            agent.forward = heading;
        }
        let (low, high) = ctx.config.wander_interval();
        agent.wander_timer = rng.random_range(low..high);
    }

    let step = ctx.dt * agent.max_speed * ctx.config.wander_speed_factor;
    move_agent(agent, agent.forward * step, ctx, motion, report)
}

fn pursue<M>(
    agent: &mut Agent,
    ctx: &ControllerContext<'_>,
    motion: &mut M,
    was_grounded: bool,
    report: &mut AgentTickReport,
) -> Result<(), AgentError>
where
    M: KinematicMotion + ?Sized,
{
    let delta = ctx.player.position - agent.position;
    let direction = Vec3::new(delta.x, 0.0, delta.z).normalize_or_zero();
    let moving = direction.length_squared() > 0.0;

    if moving {
        let gain = ctx.dt * agent.max_speed * ctx.config.acceleration_factor;
        agent.speed = (agent.speed + gain).min(agent.max_speed);
    } else {
        let loss = ctx.dt * agent.max_speed * ctx.config.deceleration_factor;
        agent.speed = (agent.speed - loss).max(0.0);
    }

    move_agent(agent, direction * (agent.speed * ctx.dt), ctx, motion, report)?;
    if agent.state.is_dead() {
        return Ok(());
    }

    if moving {
        agent.forward = direction;
    }
    // `direction` is unit length, so the climb ratio is the raw height gap.
    if moving && was_grounded && delta.y >= ctx.config.jump_trigger {
        agent.velocity_y += ctx.config.jump_impulse(agent.jump_height);
        debug!(agent_id = %agent.id, velocity_y = agent.velocity_y, "jump");
    }
    Ok(())
}

/// Resolve a displacement through the motion collaborator and react to
/// whatever it touched.
fn move_agent<M>(
    agent: &mut Agent,
    displacement: Vec3,
    ctx: &ControllerContext<'_>,
    motion: &mut M,
    report: &mut AgentTickReport,
) -> Result<(), AgentError>
where
    M: KinematicMotion + ?Sized,
{
    let outcome = motion.move_body(&agent.body(), displacement, ctx.player);
    agent.position = outcome.position;
    agent.grounded = outcome.grounded;

    for contact in outcome.contacts {
        if agent.state.is_dead() {
            break;
        }
        match contact {
            Contact::KillZone => {
                death::kill(agent, DeathCause::KillZone, ctx.player_dead)?;
                report.outcome = TickOutcome::Died(DeathCause::KillZone);
            }
            Contact::Player if !ctx.player_dead => {
                agent.apply_event(StateEvent::PlayerContact, false)?;
                if agent.state == AgentState::Attack {
                    agent.attack_cooldown = ctx.config.attack_windup;
                    agent.attack_target_bound = true;
                }
            }
            Contact::Player => {}
        }
    }
    Ok(())
}
