//! Episode and batch output

use serde::Serialize;

use crate::agent::TurnSnapshot;
use crate::core::types::Outcome;
use crate::world::WorldMap;

/// Full record of one episode, trace included
#[derive(Clone, Debug, Serialize)]
pub struct EpisodeRecord {
    pub seed: u64,
    pub map: WorldMap,
    pub outcome: Outcome,
    pub score: i64,
    pub turns: u32,
    /// Hit the turn cap before the game ended
    pub timed_out: bool,
    pub trace: Vec<TurnSnapshot>,
}

impl EpisodeRecord {
    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            seed: self.seed,
            outcome: Some(self.outcome),
            score: self.score,
            turns: self.turns,
            error: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// One line of a batch report
#[derive(Clone, Debug, Serialize)]
pub struct EpisodeSummary {
    pub seed: u64,
    /// `None` when the episode aborted with an error
    pub outcome: Option<Outcome>,
    pub score: i64,
    pub turns: u32,
    pub error: Option<String>,
}

/// Aggregate of many independent episodes
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchReport {
    pub episodes: u32,
    pub wins: u32,
    pub deaths: u32,
    pub give_ups: u32,
    pub errors: u32,
    pub win_rate: f64,
    pub mean_score: f64,
    pub elapsed_ms: u64,
    pub results: Vec<EpisodeSummary>,
    /// Random baseline on the same specs, in comparison runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<Box<BatchReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_to_head: Option<HeadToHead>,
}

impl BatchReport {
    /// Tally summaries in the order given
    pub fn from_summaries(results: Vec<EpisodeSummary>, elapsed_ms: u64) -> Self {
        let mut report = BatchReport {
            episodes: results.len() as u32,
            elapsed_ms,
            ..Default::default()
        };

        let mut total_score = 0i64;
        let mut scored = 0u32;
        for summary in &results {
            match summary.outcome {
                Some(Outcome::Won) => report.wins += 1,
                Some(Outcome::Died) => report.deaths += 1,
                Some(Outcome::GaveUp) => report.give_ups += 1,
                None => report.errors += 1,
            }
            if summary.outcome.is_some() {
                total_score += summary.score;
                scored += 1;
            }
        }

        if report.episodes > 0 {
            report.win_rate = report.wins as f64 / report.episodes as f64;
        }
        if scored > 0 {
            report.mean_score = total_score as f64 / scored as f64;
        }
        report.results = results;
        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Attach a baseline run over the same specs
    pub fn with_baseline(mut self, baseline: BatchReport) -> Self {
        self.head_to_head = Some(HeadToHead::tally(&self.results, &baseline.results));
        self.baseline = Some(Box::new(baseline));
        self
    }
}

/// Episode-by-episode comparison of the agent against the baseline.
///
/// Pairs where either side aborted are skipped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HeadToHead {
    pub compared: u32,
    pub both_won: u32,
    pub only_agent_won: u32,
    pub only_baseline_won: u32,
    pub neither_won: u32,
    pub agent_higher_score: u32,
    pub baseline_higher_score: u32,
    pub same_score: u32,
    /// Mean of agent score minus baseline score
    pub mean_score_difference: f64,
}

impl HeadToHead {
    pub fn tally(agent: &[EpisodeSummary], baseline: &[EpisodeSummary]) -> Self {
        let mut h2h = HeadToHead::default();
        let mut total_difference = 0i64;

        for (a, b) in agent.iter().zip(baseline) {
            let (Some(agent_outcome), Some(baseline_outcome)) = (a.outcome, b.outcome) else {
                continue;
            };
            h2h.compared += 1;
            match (agent_outcome == Outcome::Won, baseline_outcome == Outcome::Won) {
                (true, true) => h2h.both_won += 1,
                (true, false) => h2h.only_agent_won += 1,
                (false, true) => h2h.only_baseline_won += 1,
                (false, false) => h2h.neither_won += 1,
            }
            match a.score.cmp(&b.score) {
                std::cmp::Ordering::Greater => h2h.agent_higher_score += 1,
                std::cmp::Ordering::Less => h2h.baseline_higher_score += 1,
                std::cmp::Ordering::Equal => h2h.same_score += 1,
            }
            total_difference += a.score - b.score;
        }

        if h2h.compared > 0 {
            h2h.mean_score_difference = total_difference as f64 / h2h.compared as f64;
        }
        h2h
    }
}
