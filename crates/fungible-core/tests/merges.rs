//! Integration tests for merge resolution and the merge lifecycle,
//! driven through the full swarm tick.
//!
//! Agents are held in place by a motion double so that only the merge
//! logic moves them.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeSet;

use fungible_agents::{Body, KinematicMotion, MotionOutcome};
use fungible_core::{DamageSink, SimulationConfig, SwarmSimulation};
use fungible_types::{AgentId, AgentState, PlayerSnapshot, Vec3};

/// Keeps every body exactly where it is and reports it grounded.
struct Anchored;

impl KinematicMotion for Anchored {
    fn move_body(
        &mut self,
        body: &Body,
        _displacement: Vec3,
        _player: &PlayerSnapshot,
    ) -> MotionOutcome {
        MotionOutcome::free(body.position, true)
    }
}

struct NoDamage;

impl DamageSink for NoDamage {
    fn apply_damage(&mut self, _attacker: AgentId, _amount: f32) {}
}

fn quiet_simulation() -> SwarmSimulation {
    let mut config = SimulationConfig::default();
    config.population.base_spawn_rate = 0.0;
    SwarmSimulation::new(&config).unwrap()
}

fn total_volume(sim: &SwarmSimulation) -> f32 {
    sim.agents().map(fungible_agents::Agent::volume).sum()
}

#[test]
fn merge_completes_after_duration_and_conserves_volume() {
    let mut sim = quiet_simulation();
    let a = sim.spawn_agent(Vec3::new(0.0, 0.5, 0.0), Vec3::ONE).unwrap();
    let b = sim.spawn_agent(Vec3::new(0.3, 0.5, 0.0), Vec3::ONE).unwrap();
    let player = PlayerSnapshot::alive_at(Vec3::new(10.0, 0.5, 0.0));
    let before = total_volume(&sim);

    let first = sim.tick(0.25, &player, &mut Anchored, &mut NoDamage).unwrap();
    assert_eq!(first.merges_started.len(), 1);
    let pair = first.merges_started[0];
    // Equal volume; b is closer to the player.
    assert_eq!(pair.winner, b);
    assert_eq!(pair.loser, a);
    assert_eq!(sim.agent(a).unwrap().state, AgentState::MergeSource);
    assert_eq!(sim.agent(b).unwrap().state, AgentState::MergeTarget);

    for _ in 0..3 {
        let snapshot = sim.tick(0.25, &player, &mut Anchored, &mut NoDamage).unwrap();
        assert!(snapshot.removed.is_empty());
        assert_eq!(snapshot.present_agents, 2);
        assert_eq!(sim.agent(b).unwrap().scale, Vec3::ONE);
    }

    let done = sim.tick(0.25, &player, &mut Anchored, &mut NoDamage).unwrap();
    assert_eq!(done.removed, vec![a]);
    assert_eq!(done.present_agents, 1);
    let survivor = sim.agent(b).unwrap();
    assert_eq!(survivor.state, AgentState::Pursue);
    assert!((survivor.scale.x.powi(3) - 2.0).abs() < 1e-5);
    assert!((total_volume(&sim) - before).abs() < 1e-5);

    // Growth happens exactly once.
    let grown = survivor.scale;
    sim.tick(0.25, &player, &mut Anchored, &mut NoDamage).unwrap();
    assert_eq!(sim.agent(b).unwrap().scale, grown);
    assert_eq!(sim.state().zombie_count, 2);
}

#[test]
fn source_removed_exactly_when_duration_elapses() {
    for (dt, ticks) in [(0.02, 50), (0.2, 5)] {
        let mut sim = quiet_simulation();
        let a = sim.spawn_agent(Vec3::new(0.0, 0.5, 0.0), Vec3::ONE).unwrap();
        sim.spawn_agent(Vec3::new(0.3, 0.5, 0.0), Vec3::ONE).unwrap();
        let player = PlayerSnapshot::alive_at(Vec3::new(10.0, 0.5, 0.0));

        let started = sim.tick(dt, &player, &mut Anchored, &mut NoDamage).unwrap();
        assert_eq!(started.merges_started.len(), 1);

        for tick in 1..ticks {
            let snapshot = sim.tick(dt, &player, &mut Anchored, &mut NoDamage).unwrap();
            assert_eq!(snapshot.present_agents, 2, "dt {dt}: removed early at tick {tick}");
        }
        let done = sim.tick(dt, &player, &mut Anchored, &mut NoDamage).unwrap();
        assert_eq!(done.removed, vec![a], "dt {dt}: not removed after {ticks} ticks");
        assert_eq!(done.present_agents, 1);
    }
}

#[test]
fn origin_breaks_equal_player_distance_in_either_order() {
    let player = PlayerSnapshot::alive_at(Vec3::new(3.0, 0.0, 4.0));
    let wide = Vec3::new(20.0, 1.0, 1.0);

    let mut forward = quiet_simulation();
    let far = forward.spawn_agent(Vec3::new(6.0, 0.0, 8.0), wide).unwrap();
    let near = forward.spawn_agent(Vec3::ZERO, wide).unwrap();
    let snapshot = forward.tick(0.1, &player, &mut Anchored, &mut NoDamage).unwrap();
    assert_eq!(snapshot.merges_started.len(), 1);
    assert_eq!(snapshot.merges_started[0].winner, near);
    assert_eq!(snapshot.merges_started[0].loser, far);

    let mut reverse = quiet_simulation();
    let near = reverse.spawn_agent(Vec3::ZERO, wide).unwrap();
    let far = reverse.spawn_agent(Vec3::new(6.0, 0.0, 8.0), wide).unwrap();
    let snapshot = reverse.tick(0.1, &player, &mut Anchored, &mut NoDamage).unwrap();
    assert_eq!(snapshot.merges_started[0].winner, near);
    assert_eq!(snapshot.merges_started[0].loser, far);
    assert!((snapshot.merges_started[0].size_multiplier - 2.0).abs() < f32::EPSILON);
}

#[test]
fn crowd_never_double_merges() {
    let mut sim = quiet_simulation();
    for i in 0..9_u8 {
        let offset = f32::from(i) * 0.05;
        sim.spawn_agent(Vec3::new(offset, 0.5, offset), Vec3::ONE).unwrap();
    }
    let player = PlayerSnapshot::alive_at(Vec3::new(-8.0, 0.5, -8.0));
    let dt = 0.25;

    for _ in 0..20 {
        // Agents whose merge cannot finish during this tick.
        let locked: BTreeSet<AgentId> = sim
            .agents()
            .filter(|agent| match agent.state {
                AgentState::MergeSource => true,
                AgentState::MergeTarget => agent.merge.is_some_and(|m| m.remaining > dt),
                _ => false,
            })
            .map(|agent| agent.id)
            .collect();

        let snapshot = sim.tick(dt, &player, &mut Anchored, &mut NoDamage).unwrap();
        let mut this_tick = BTreeSet::new();
        for pair in &snapshot.merges_started {
            for id in [pair.winner, pair.loser] {
                assert!(this_tick.insert(id), "{id} paired twice in one pass");
                assert!(!locked.contains(&id), "{id} paired while mid-merge");
            }
        }
    }

    let survivors: Vec<_> = sim.agents().collect();
    assert_eq!(survivors.len(), 1);
    assert!((survivors[0].volume() - 9.0).abs() < 1e-3);
}

#[test]
fn degenerate_spawn_scale_rejected_by_config() {
    let mut config = SimulationConfig::default();
    config.population.spawn_scale = Vec3::new(1.0, 0.0, 1.0);
    assert!(SwarmSimulation::new(&config).is_err());
}
