//! Headless session loop.
//!
//! [`run_session`] drives [`SwarmSimulation::tick`] with a fixed timestep,
//! advancing a [`PlayerAvatar`] before each tick and forwarding attack
//! damage to it. The session ends when:
//!
//! - **Tick limit**: `max_ticks` ticks have run
//! - **Player death**: the player died and `stop_on_player_death` is set
//!
//! A [`TickCallback`] sees every snapshot, which is how the engine binary
//! logs progress.

use fungible_agents::KinematicMotion;
use fungible_types::SwarmSnapshot;
use tracing::info;

use crate::config::SessionConfig;
use crate::player::PlayerAvatar;
use crate::swarm::{SwarmSimulation, TickError};

/// Errors that can occur during a session.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// The player died.
    PlayerDied,
}

impl core::fmt::Display for SessionEndReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MaxTicksReached => write!(f, "max_ticks_reached"),
            Self::PlayerDied => write!(f, "player_died"),
        }
    }
}

/// Result of a session.
#[derive(Debug, Clone)]
pub struct SessionResult {
    /// Why the session ended.
    pub end_reason: SessionEndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// The last snapshot, if any tick ran.
    pub final_snapshot: Option<SwarmSnapshot>,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called with every snapshot the swarm produces.
    fn on_tick(&mut self, snapshot: &SwarmSnapshot);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _snapshot: &SwarmSnapshot) {}
}

/// Run ticks until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError::Tick`] if a tick fails.
pub fn run_session<P, M>(
    sim: &mut SwarmSimulation,
    player: &mut P,
    motion: &mut M,
    session: &SessionConfig,
    callback: &mut dyn TickCallback,
) -> Result<SessionResult, RunnerError>
where
    P: PlayerAvatar + ?Sized,
    M: KinematicMotion + ?Sized,
{
    info!(
        run_id = %sim.state().run_id,
        dt = session.tick_dt,
        max_ticks = session.max_ticks,
        stop_on_player_death = session.stop_on_player_death,
        "session starting"
    );

    let mut total_ticks = 0_u64;
    let mut final_snapshot = None;
    let mut end_reason = SessionEndReason::MaxTicksReached;

    while total_ticks < session.max_ticks {
        player.advance(session.tick_dt);
        let seen = player.snapshot();
        let snapshot = sim.tick(session.tick_dt, &seen, &mut *motion, &mut *player)?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&snapshot);
        final_snapshot = Some(snapshot);

        if session.stop_on_player_death && player.snapshot().is_dead {
            end_reason = SessionEndReason::PlayerDied;
            break;
        }
    }

    info!(%end_reason, total_ticks, "session ended");
    Ok(SessionResult {
        end_reason,
        total_ticks,
        final_snapshot,
    })
}
