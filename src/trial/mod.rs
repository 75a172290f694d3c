//! Trial orchestration - episodes, parallel batches and baseline comparisons

pub mod output;
pub mod runner;

pub use output::{BatchReport, EpisodeRecord, EpisodeSummary, HeadToHead};
pub use runner::{
    run_baseline_batch, run_baseline_episode, run_batch, run_comparison, run_episode,
    run_seeded_episode, EpisodeSpec, RandomBatch,
};
