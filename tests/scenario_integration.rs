//! End-to-end scenarios on hand-built maps

use std::path::Path;

use wumpus_agent::agent::AgentSession;
use wumpus_agent::core::types::{Action, Coord, Outcome};
use wumpus_agent::knowledge::{Threat, ThreatStatus};
use wumpus_agent::policy::Goal;
use wumpus_agent::trial::run_episode;
use wumpus_agent::world::{load_world_map, Environment, WorldMap};

fn map(name: &str) -> WorldMap {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data/maps")
        .join(name);
    load_world_map(&path).unwrap()
}

fn visited_positions(record: &wumpus_agent::trial::EpisodeRecord) -> Vec<Coord> {
    record.trace.iter().map(|s| s.pose.position).collect()
}

#[test]
fn test_scenario_a_avoids_pit_and_wins() {
    let map = map("scenario_a.toml");
    let record = run_episode(&map, &map.agent_config(false), 500).unwrap();

    assert_eq!(record.outcome, Outcome::Won);
    assert!(!visited_positions(&record).contains(&Coord::new(2, 1)));
    assert!(record.score > 900);
}

#[test]
fn test_scenario_b_locates_pit_by_elimination() {
    let map = map("scenario_b.toml");
    let config = map.agent_config(false);
    let mut env = Environment::new(map.clone(), 0).unwrap();
    let mut session = AgentSession::new(config).unwrap();
    let pit = Coord::new(2, 0);

    while !env.is_finished() {
        let percept = env.percept();
        let snapshot = session.step(&percept).unwrap();
        assert_ne!(snapshot.pose.position, pit);
        env.apply(snapshot.action).unwrap();
    }

    assert_eq!(session.outcome(), Some(Outcome::Won));
    assert_eq!(
        session.store().status(pit, Threat::Pit).unwrap(),
        ThreatStatus::ConfirmedPresent
    );
    assert!(!session.store().get(pit).unwrap().visited);
}

#[test]
fn test_hunt_corridor_shoots_then_wins() {
    let map = map("hunt_corridor.toml");
    let record = run_episode(&map, &map.agent_config(false), 500).unwrap();

    let shots: Vec<_> = record
        .trace
        .iter()
        .filter(|s| s.action == Action::Shoot)
        .collect();
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].goal, Goal::Hunt);
    assert_eq!(shots[0].target, Some(Coord::new(2, 0)));

    let kill_turn = record
        .trace
        .iter()
        .find(|s| s.percept.scream)
        .expect("scream after the shot");
    assert_eq!(kill_turn.inference.kill, Some(Coord::new(2, 0)));
    assert_eq!(kill_turn.beliefs.remaining_wumpuses, 0);

    assert_eq!(record.outcome, Outcome::Won);
    assert!(!visited_positions(&record).contains(&Coord::new(1, 1)));
}

#[test]
fn test_scenario_c_risk_step_is_deterministic() {
    // One disclosed pit at (0,1); the entry is breezy with two equal suspects
    let map = WorldMap::new(3, vec![], vec![Coord::new(0, 1)], Coord::new(2, 2));
    let config = map.agent_config(true);

    for _ in 0..3 {
        let record = run_episode(&map, &config, 100).unwrap();
        let first = &record.trace[0];
        assert_eq!(first.goal, Goal::Risk);
        assert_eq!(first.target, Some(Coord::new(1, 0)));
        assert_eq!(first.action, Action::MoveForward);
        assert!((first.risk - 0.5).abs() < 1e-6);
        assert_eq!(record.outcome, Outcome::Won);
    }
}

#[test]
fn test_agent_and_simulator_agree_on_score() {
    for name in ["scenario_a.toml", "scenario_b.toml", "hunt_corridor.toml"] {
        let map = map(name);
        let mut env = Environment::new(map.clone(), 0).unwrap();
        let mut session = AgentSession::new(map.agent_config(false)).unwrap();

        while !env.is_finished() {
            let percept = env.percept();
            let snapshot = session.step(&percept).unwrap();
            let result = env.apply(snapshot.action).unwrap();
            if result.outcome == Some(Outcome::Died) {
                session.record_death();
            }
        }
        assert_eq!(session.score(), env.score(), "{}", name);
        assert_eq!(session.outcome(), env.outcome(), "{}", name);
    }
}

#[test]
fn test_no_safe_progress_means_climbing_out() {
    // Breeze at the entry, both neighbors at 0.5, a cautious agent stays out
    let map = WorldMap::new(
        4,
        vec![],
        vec![Coord::new(1, 0), Coord::new(0, 1)],
        Coord::new(3, 3),
    );
    let mut config = map.agent_config(false);
    config.max_acceptable_risk = 0.3;
    let record = run_episode(&map, &config, 100).unwrap();

    assert_eq!(record.outcome, Outcome::GaveUp);
    assert_eq!(record.turns, 1);
    assert_eq!(record.trace[0].goal, Goal::Escape);
    assert_eq!(record.trace[0].action, Action::Climb);
    assert_eq!(record.score, 0);
}
