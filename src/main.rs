//! Wumpus Agent - play one map and print the trace
//!
//! Usage: `wumpus-agent <map.toml> [--config agent.toml] [--json out.json]`

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use wumpus_agent::core::constants::DEFAULT_MAX_TURNS;
use wumpus_agent::core::error::Result;
use wumpus_agent::core::load_agent_config;
use wumpus_agent::trial::run_seeded_episode;
use wumpus_agent::world::load_world_map;

#[derive(Parser, Debug)]
#[command(name = "wumpus-agent")]
#[command(about = "Run the agent on a single map")]
struct Args {
    /// Map file (TOML)
    map: PathBuf,

    /// Agent config (TOML); derived from the map when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tell the agent how many pits the map holds
    #[arg(long)]
    disclose_pits: bool,

    /// Maximum turns before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
    max_turns: u32,

    /// Seed for wumpus wandering
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write the full episode record as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wumpus_agent=info")),
        )
        .init();

    let args = Args::parse();

    let map = load_world_map(&args.map)?;
    let config = match &args.config {
        Some(path) => load_agent_config(path)?,
        None => map.agent_config(args.disclose_pits),
    };

    println!("{}", map.render());
    let record = run_seeded_episode(&map, &config, args.max_turns, args.seed)?;

    for snapshot in &record.trace {
        println!("{}", snapshot.describe());
    }
    println!();
    println!(
        "Outcome: {:?}  score {}  turns {}",
        record.outcome, record.score, record.turns
    );

    if let Some(path) = &args.json {
        fs::write(path, record.to_json())?;
        tracing::info!(path = %path.display(), "episode written");
    }

    Ok(())
}
