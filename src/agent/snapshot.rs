//! Per-turn trace record

use serde::Serialize;

use crate::core::types::{Action, Coord, Outcome, Percept, Pose};
use crate::inference::InferenceReport;
use crate::knowledge::BeliefSummary;
use crate::policy::Goal;

/// What happened in one turn, in the order it happened
#[derive(Debug, Clone, Serialize)]
pub struct TurnSnapshot {
    /// 1-based turn number
    pub turn: u32,
    /// Pose the decision was taken from
    pub pose: Pose,
    pub percept: Percept,
    pub goal: Goal,
    pub action: Action,
    pub target: Option<Coord>,
    pub risk: f32,
    pub score_delta: i64,
    pub score: i64,
    pub inference: InferenceReport,
    pub beliefs: BeliefSummary,
    /// Set when this turn's action ended the episode
    pub outcome: Option<Outcome>,
}

impl TurnSnapshot {
    /// One-line human summary
    pub fn describe(&self) -> String {
        let target = self
            .target
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "#{:<3} {} {:?} {:<7} {:<11} -> {:<7} risk {:.2} score {:>5}",
            self.turn,
            self.pose.position,
            self.pose.facing,
            self.goal.to_string(),
            format!("{:?}", self.action),
            target,
            self.risk,
            self.score
        )
    }
}
