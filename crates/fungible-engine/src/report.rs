//! Progress and end-of-run reporting.
//!
//! [`ProgressLogger`] is the engine's [`TickCallback`]: it logs a status
//! line every `snapshot_interval_ticks` ticks plus every merge and
//! removal at debug level. [`log_summary`] prints the final survival
//! time, score, and threat tier.

use fungible_core::{SessionResult, TickCallback};
use fungible_types::SwarmSnapshot;
use tracing::{debug, info};

/// Format a survival time in seconds as `MM:SS`.
///
/// Minutes are not capped at 59; a run of two hours reads `120:00`.
/// Negative and non-finite inputs read `00:00`.
pub fn format_survival_time(seconds: f32) -> String {
    let whole = if seconds.is_finite() {
        seconds.max(0.0).floor()
    } else {
        0.0
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = whole as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// The score as shown to the player: floored to a whole number.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn display_score(score: f32) -> u64 {
    score.max(0.0).floor() as u64
}

/// Tick callback that logs swarm progress.
pub struct ProgressLogger {
    interval: u64,
}

impl ProgressLogger {
    /// Log a status line every `interval` ticks; zero logs only events.
    pub const fn new(interval: u64) -> Self {
        Self { interval }
    }

    const fn is_status_tick(&self, tick: u64) -> bool {
        self.interval > 0 && tick % self.interval == 0
    }
}

impl TickCallback for ProgressLogger {
    fn on_tick(&mut self, snapshot: &SwarmSnapshot) {
        for pair in &snapshot.merges_started {
            debug!(
                tick = snapshot.tick,
                winner = %pair.winner,
                loser = %pair.loser,
                size_multiplier = pair.size_multiplier,
                "merge started"
            );
        }
        if !snapshot.removed.is_empty() {
            debug!(tick = snapshot.tick, removed = ?snapshot.removed, "bodies removed");
        }

        if self.is_status_tick(snapshot.tick) {
            info!(
                tick = snapshot.tick,
                survival = %format_survival_time(snapshot.elapsed_time),
                score = display_score(snapshot.score),
                threat_level = snapshot.threat_level,
                threat = %snapshot.threat_name,
                zombie_count = snapshot.zombie_count,
                present_agents = snapshot.present_agents,
                "swarm status"
            );
        }
    }
}

/// Log the end-of-run summary.
pub fn log_summary(result: &SessionResult) {
    let Some(last) = &result.final_snapshot else {
        info!(end_reason = %result.end_reason, "run ended before the first tick");
        return;
    };
    info!(
        end_reason = %result.end_reason,
        total_ticks = result.total_ticks,
        survival = %format_survival_time(last.elapsed_time),
        score = display_score(last.score),
        threat = %last.threat_name,
        zombie_count = last.zombie_count,
        present_agents = last.present_agents,
        "run summary"
    );
}
