//! Episode loop and parallel batches
//!
//! Each episode owns its own environment, session and store, so a batch is
//! a plain fork-join over independent episodes. A comparison run plays the
//! random baseline on the same specs.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::agent::{AgentSession, Player, RandomPlayer, TurnSnapshot};
use crate::core::config::AgentConfig;
use crate::core::error::Result;
use crate::core::types::Outcome;
use crate::trial::output::{BatchReport, EpisodeRecord, EpisodeSummary};
use crate::world::{generate_map, Environment, WorldMap};

/// Everything needed to play one episode
#[derive(Clone, Debug)]
pub struct EpisodeSpec {
    pub map: WorldMap,
    pub config: AgentConfig,
    pub max_turns: u32,
    /// Drives wumpus wandering
    pub seed: u64,
}

/// Play `map` to the end with a fresh agent
pub fn run_episode(map: &WorldMap, config: &AgentConfig, max_turns: u32) -> Result<EpisodeRecord> {
    run_seeded_episode(map, config, max_turns, 0)
}

/// Like [`run_episode`], with an explicit seed for the simulator
pub fn run_seeded_episode(
    map: &WorldMap,
    config: &AgentConfig,
    max_turns: u32,
    seed: u64,
) -> Result<EpisodeRecord> {
    let mut session = AgentSession::new(config.clone())?;
    let record = play(&mut session, map, max_turns, seed)?;
    let (hits, misses) = session.planner_stats();
    debug!(seed, hits, misses, "route cache");
    Ok(record)
}

/// Play `map` with the random baseline. The record carries no trace.
pub fn run_baseline_episode(map: &WorldMap, max_turns: u32, seed: u64) -> Result<EpisodeRecord> {
    let mut player = RandomPlayer::new(map.size, seed)?;
    play(&mut player, map, max_turns, seed)
}

fn play<P: Player>(player: &mut P, map: &WorldMap, max_turns: u32, seed: u64) -> Result<EpisodeRecord> {
    let mut env = Environment::new(map.clone(), seed)?;
    let mut trace: Vec<TurnSnapshot> = Vec::new();
    let mut timed_out = false;

    while !env.is_finished() {
        if player.turn() >= max_turns {
            warn!(max_turns, "turn cap reached");
            player.give_up();
            timed_out = true;
            break;
        }

        let percept = env.percept();
        let turn = player.take_turn(&percept)?;
        trace.extend(turn.snapshot);

        let result = env.apply(turn.action)?;
        if result.outcome == Some(Outcome::Died) {
            player.record_death();
        }
    }

    let outcome = player.outcome().unwrap_or(Outcome::GaveUp);
    Ok(EpisodeRecord {
        seed,
        map: map.clone(),
        outcome,
        score: player.score(),
        turns: player.turn(),
        timed_out,
        trace,
    })
}

/// A family of random maps sharing one generator setup
#[derive(Clone, Debug)]
pub struct RandomBatch {
    pub count: u32,
    pub size: u32,
    pub wumpus_count: u32,
    pub pit_probability: f32,
    /// Episode `i` uses seed `base_seed + i`
    pub base_seed: u64,
    /// Tell the agent how many pits each map holds
    pub disclose_pits: bool,
    pub moving: bool,
    pub max_turns: u32,
}

impl RandomBatch {
    /// Generate one spec per episode
    pub fn specs(&self) -> Result<Vec<EpisodeSpec>> {
        (0..self.count as u64)
            .map(|i| {
                let seed = self.base_seed.wrapping_add(i);
                let map = generate_map(self.size, self.wumpus_count, self.pit_probability, seed)?
                    .with_moving(self.moving);
                let config = map.agent_config(self.disclose_pits);
                Ok(EpisodeSpec {
                    map,
                    config,
                    max_turns: self.max_turns,
                    seed,
                })
            })
            .collect()
    }
}

/// Run every spec in parallel and aggregate the results in input order
pub fn run_batch(specs: &[EpisodeSpec]) -> BatchReport {
    let report = run_specs(specs, |spec| {
        run_seeded_episode(&spec.map, &spec.config, spec.max_turns, spec.seed)
    });
    info!(
        episodes = report.episodes,
        wins = report.wins,
        deaths = report.deaths,
        errors = report.errors,
        "batch finished"
    );
    report
}

/// Play the random baseline on every spec
pub fn run_baseline_batch(specs: &[EpisodeSpec]) -> BatchReport {
    let report = run_specs(specs, |spec| {
        run_baseline_episode(&spec.map, spec.max_turns, spec.seed)
    });
    info!(
        episodes = report.episodes,
        wins = report.wins,
        deaths = report.deaths,
        "baseline batch finished"
    );
    report
}

/// Agent batch with the baseline batch and a head-to-head tally attached
pub fn run_comparison(specs: &[EpisodeSpec]) -> BatchReport {
    let report = run_batch(specs).with_baseline(run_baseline_batch(specs));
    if let Some(h2h) = &report.head_to_head {
        info!(
            only_agent_won = h2h.only_agent_won,
            only_baseline_won = h2h.only_baseline_won,
            mean_score_difference = h2h.mean_score_difference,
            "comparison finished"
        );
    }
    report
}

fn run_specs<F>(specs: &[EpisodeSpec], run: F) -> BatchReport
where
    F: Fn(&EpisodeSpec) -> Result<EpisodeRecord> + Sync,
{
    let start = Instant::now();

    let results: Vec<EpisodeSummary> = specs
        .par_iter()
        .map(|spec| {
            match run(spec) {
                Ok(record) => record.summary(),
                Err(e) => {
                    warn!(seed = spec.seed, error = %e, "episode aborted");
                    EpisodeSummary {
                        seed: spec.seed,
                        outcome: None,
                        score: 0,
                        turns: 0,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    BatchReport::from_summaries(results, start.elapsed().as_millis() as u64)
}
