#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays headless Snake Arcade rounds.

mod autopilot;
mod config;
mod script;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use snake_arcade_core::{RoundConfig, RoundStatus, WELCOME_BANNER};
use snake_arcade_ranking::{render_text, FileRankingStore, RankingEntry, RankingStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::ConfigFile,
    script::Script,
    session::{Pilot, SessionOptions, SessionReport},
};

/// Command-line arguments accepted by the Snake Arcade binary.
#[derive(Debug, Parser)]
#[command(name = "snake-arcade", version, about = "Headless Snake Arcade rounds")]
struct Cli {
    /// TOML file overriding the default round configuration.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enables debug logging regardless of `RUST_LOG`.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Plays a single round and records the score.
    Play(PlayArgs),
    /// Prints the stored ranking.
    Ranking {
        /// Directory holding `ranking.json` and `ranking.txt`.
        #[arg(long, default_value = ".", value_name = "DIR")]
        ranking_dir: PathBuf,
    },
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Input script to replay; the built-in autopilot plays when absent.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Player name stored in the ranking.
    #[arg(long, default_value = "Player")]
    name: String,
    /// Optional player code stored alongside the name.
    #[arg(long)]
    code: Option<String>,
    /// Seed for every random draw of the round.
    #[arg(long)]
    seed: Option<u64>,
    /// Disables the countdown and hazards.
    #[arg(long)]
    classic: bool,
    /// Simulated frames per second fed to the pacing system.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Tick budget when the script does not set one.
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,
    /// Sleeps between frames so the round runs at wall-clock speed.
    #[arg(long)]
    realtime: bool,
    /// Directory holding `ranking.json` and `ranking.txt`.
    #[arg(long, default_value = ".", value_name = "DIR")]
    ranking_dir: PathBuf,
    /// Skips recording the score.
    #[arg(long)]
    no_record: bool,
}

/// Entry point for the Snake Arcade command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let base = match &cli.config {
        Some(path) => ConfigFile::load(path)?.apply(RoundConfig::default())?,
        None => RoundConfig::default(),
    };

    match cli.command {
        CliCommand::Play(args) => play(base, args),
        CliCommand::Ranking { ranking_dir } => {
            print_ranking(&FileRankingStore::in_dir(ranking_dir));
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn play(base: RoundConfig, args: PlayArgs) -> Result<()> {
    ensure!(args.fps > 0, "--fps must be positive");

    let mut config = base;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.classic {
        config.duration_limit = None;
        config.hazard_pool_size = 0;
    }

    let pilot = match &args.script {
        Some(path) => Pilot::Script(Script::load(path)?),
        None => Pilot::Autopilot,
    };
    let options = SessionOptions {
        frame: Duration::from_secs(1) / args.fps,
        max_ticks: args.max_ticks,
        realtime: args.realtime,
    };

    println!("{WELCOME_BANNER}");
    info!(seed = config.seed, "starting round");
    let report = session::run(config, pilot, &options).context("round failed")?;
    print_report(&report);

    let status = report.snapshot.status;
    if args.no_record || !matches!(status, RoundStatus::Lost | RoundStatus::Won) {
        info!(?status, "score not recorded");
        return Ok(());
    }

    let entry = RankingEntry::new(&args.name, args.code.as_deref(), report.snapshot.score);
    let name = entry.name().to_owned();
    let score = entry.score();
    let mut store = FileRankingStore::in_dir(&args.ranking_dir);
    let ranking = store.record(entry);
    match ranking.position_of(&name, score) {
        Some(position) => println!("Ranking position: {position}"),
        None => println!("Score did not reach the top {}", ranking.len()),
    }
    Ok(())
}

fn print_report(report: &SessionReport) {
    let snapshot = &report.snapshot;
    println!("Status: {:?}", snapshot.status);
    println!("Score: {}", snapshot.score);
    println!("Lives: {}", snapshot.lives);
    println!("Length: {}", snapshot.body.len());
    println!("Speed: +{}%", snapshot.speed_bonus_percent());
    println!(
        "Time: {:.1}s over {} ticks",
        snapshot.elapsed.as_secs_f64(),
        report.ticks
    );
    if let Some(remaining) = snapshot.remaining {
        println!("Remaining: {:.1}s", remaining.as_secs_f64());
    }
    for (cue, count) in &report.cues {
        println!("Cue {cue}: {count}");
    }
}

fn print_ranking(store: &FileRankingStore) {
    let ranking = store.load();
    if ranking.is_empty() {
        println!("No scores recorded yet.");
    } else {
        print!("{}", render_text(&ranking));
    }
}
