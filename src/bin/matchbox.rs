//! Matchbox CLI - train and inspect the tic-tac-toe learning agent
//!
//! Commands:
//! - `train`: bulk self-play against a scripted opponent
//! - `stats`: statistics and learning history of a saved agent
//! - `inspect`: bead distribution for one board position

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use matchbox::{
    adapters::JsonRepository,
    app::{AgentConfig, App, AppBuilder},
    learner::{LearnerConfig, LearningAgent},
    selfplay::{OpponentKind, SelfPlayConfig, run_self_play},
};

#[derive(Parser)]
#[command(name = "matchbox")]
#[command(version, about = "Matchbox reinforcement learning for tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent through bulk self-play
    Train(TrainArgs),

    /// Print statistics and learning history of a saved agent
    Stats(StatsArgs),

    /// Print the matchbox for a board position in a saved agent
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct TrainArgs {
    /// Number of training games
    #[arg(long, short = 'g', default_value_t = 1000)]
    games: usize,

    /// Opponent to train against ('random' or 'optimal')
    #[arg(long, short = 'o', default_value = "random")]
    opponent: String,

    /// Random seed for reproducibility (seeds both agent and opponent)
    #[arg(long)]
    seed: Option<u64>,

    /// Existing agent file to continue training from
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file for the trained agent (.json for JSON, anything else
    /// for MessagePack)
    #[arg(long, short = 'O')]
    output: Option<PathBuf>,

    /// Beads seeded on each legal move of a new matchbox
    #[arg(long, default_value_t = 3)]
    initial_beads: u32,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Saved agent file
    file: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Saved agent file
    file: PathBuf,

    /// Board position as a 9-character encoding over '_', 'X', 'O'
    board: String,
}

/// Pick the repository by file extension: `.json` is human-readable JSON,
/// everything else is MessagePack.
fn app_for(path: Option<&PathBuf>) -> App {
    let json = path
        .and_then(|p| p.extension())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if json {
        AppBuilder::new().with_repository(JsonRepository::new()).build()
    } else {
        App::new()
    }
}

fn load_agent(path: &PathBuf, config: AgentConfig) -> Result<LearningAgent> {
    app_for(Some(path))
        .load_agent(config, path)
        .with_context(|| format!("failed to load agent from {path:?}"))
}

fn train(args: TrainArgs) -> Result<()> {
    let learner = LearnerConfig::default().with_initial_beads(args.initial_beads);
    let mut agent_config = AgentConfig::new().with_learner(learner);
    if let Some(seed) = args.seed {
        agent_config = agent_config.with_seed(seed);
    }

    let agent = match &args.input {
        Some(path) => load_agent(path, agent_config)?,
        None => App::new().create_agent(agent_config)?,
    };

    let manager = matchbox::SessionManager::new(Arc::new(agent));
    let config = SelfPlayConfig {
        num_games: args.games,
        opponent: args.opponent.parse::<OpponentKind>()?,
        seed: args.seed,
        progress: !args.quiet,
    };

    let report = run_self_play(&manager, &config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = &args.output {
        app_for(Some(path))
            .save_agent(manager.agent(), path)
            .with_context(|| format!("failed to save agent to {path:?}"))?;
        println!("Saved agent to {}", path.display());
    }
    Ok(())
}

fn stats(args: StatsArgs) -> Result<()> {
    let agent = load_agent(&args.file, AgentConfig::new())?;
    println!("{}", serde_json::to_string_pretty(&agent.statistics())?);

    let history = agent.history();
    if !history.is_empty() {
        println!("{}", serde_json::to_string_pretty(&history)?);
    }
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let agent = load_agent(&args.file, AgentConfig::new())?;
    match agent.matchbox_for(&args.board)? {
        Some(view) => println!("{}", serde_json::to_string_pretty(&view)?),
        None => println!("No matchbox recorded for '{}'", args.board),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => train(args),
        Commands::Stats(args) => stats(args),
        Commands::Inspect(args) => inspect(args),
    }
}
