//! Headless Trial Runner
//!
//! Plays many random maps in parallel and prints a JSON report.

use clap::Parser;

use wumpus_agent::core::constants::{
    DEFAULT_GRID_SIZE, DEFAULT_MAX_TURNS, DEFAULT_PIT_PROBABILITY, DEFAULT_WUMPUS_COUNT,
};
use wumpus_agent::trial::{run_batch, run_comparison, BatchReport, RandomBatch};

/// Headless Trial Runner - batch statistics over random maps
#[derive(Parser, Debug)]
#[command(name = "trial_runner")]
#[command(about = "Run the agent on many random maps and report statistics")]
struct Args {
    /// Number of maps
    #[arg(long, short = 'n', default_value_t = 100)]
    episodes: u32,

    /// Grid side length
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: u32,

    /// Wumpuses per map
    #[arg(long, default_value_t = DEFAULT_WUMPUS_COUNT)]
    wumpuses: u32,

    /// Per-cell pit probability
    #[arg(long, default_value_t = DEFAULT_PIT_PROBABILITY)]
    pit_probability: f32,

    /// First seed; episode i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Tell the agent how many pits each map holds
    #[arg(long)]
    disclose_pits: bool,

    /// Wumpuses wander every few actions
    #[arg(long)]
    moving: bool,

    /// Also play a random baseline on the same maps and compare
    #[arg(long)]
    compare: bool,

    /// Maximum turns per episode
    #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
    max_turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wumpus_agent=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let batch = RandomBatch {
        count: args.episodes,
        size: args.size,
        wumpus_count: args.wumpuses,
        pit_probability: args.pit_probability,
        base_seed: seed,
        disclose_pits: args.disclose_pits,
        moving: args.moving,
        max_turns: args.max_turns,
    };

    let specs = match batch.specs() {
        Ok(specs) => specs,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report = if args.compare {
        run_comparison(&specs)
    } else {
        run_batch(&specs)
    };

    match args.format.as_str() {
        "json" => println!("{}", report.to_json()),
        _ => {
            println!("Trial Report");
            println!("============");
            println!("Seed:       {}", seed);
            print_tally("Agent", &report);
            if let Some(baseline) = &report.baseline {
                print_tally("Random baseline", baseline);
            }
            if let Some(h2h) = &report.head_to_head {
                println!();
                println!("Head to head ({} maps)", h2h.compared);
                println!("  Both won:           {}", h2h.both_won);
                println!("  Only agent won:     {}", h2h.only_agent_won);
                println!("  Only baseline won:  {}", h2h.only_baseline_won);
                println!("  Neither won:        {}", h2h.neither_won);
                println!(
                    "  Higher score:       agent {} / baseline {} / same {}",
                    h2h.agent_higher_score, h2h.baseline_higher_score, h2h.same_score
                );
                println!("  Mean difference:    {:+.1}", h2h.mean_score_difference);
            }
        }
    }
}

fn print_tally(label: &str, report: &BatchReport) {
    println!();
    println!("{}", label);
    println!("  Episodes:   {}", report.episodes);
    println!("  Wins:       {}", report.wins);
    println!("  Deaths:     {}", report.deaths);
    println!("  Give-ups:   {}", report.give_ups);
    println!("  Errors:     {}", report.errors);
    println!("  Win rate:   {:.1}%", report.win_rate * 100.0);
    println!("  Mean score: {:.1}", report.mean_score);
    println!("  Elapsed:    {} ms", report.elapsed_ms);
}
