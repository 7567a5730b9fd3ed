//! Bulk self-play training loop
//!
//! The runner drives whole games through the public [`SessionManager`] API,
//! so training exercises exactly the same turn arbitration and exactly-once
//! reinforcement as live opponents do. Sessions are removed as soon as they
//! finish.

use std::str::FromStr;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::opponent::{OpponentPolicy, OptimalOpponent, RandomOpponent};
use crate::session::{SessionManager, SessionPhase};
use crate::tictactoe::{Board, Outcome};
use crate::{Error, Result};

/// Which scripted opponent to train against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    Random,
    Optimal,
}

impl OpponentKind {
    /// Instantiate the policy this kind names
    pub fn policy(self) -> Box<dyn OpponentPolicy> {
        match self {
            OpponentKind::Random => Box::new(RandomOpponent::new()),
            OpponentKind::Optimal => Box::new(OptimalOpponent::new()),
        }
    }
}

impl FromStr for OpponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(OpponentKind::Random),
            "optimal" => Ok(OpponentKind::Optimal),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown opponent '{other}', expected 'random' or 'optimal'"),
            }),
        }
    }
}

/// Parameters for one self-play run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    pub opponent: OpponentKind,
    /// Seed for the runner's RNG (first-mover coin flips and the opponent's
    /// own randomness). Seed the agent separately for fully deterministic
    /// runs.
    pub seed: Option<u64>,
    /// Render a progress bar to stderr
    pub progress: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 100,
            opponent: OpponentKind::Random,
            seed: None,
            progress: false,
        }
    }
}

/// Summary of a finished self-play run, from the agent's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayReport {
    pub games_played: usize,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub elapsed_seconds: f64,
    pub games_per_second: f64,
    /// Matchboxes created during this run
    pub new_matchboxes: usize,
    /// Matchboxes in the table after the run
    pub total_matchboxes: usize,
}

/// Play `config.num_games` games against the configured opponent.
///
/// The first mover alternates by coin flip. Finished sessions are removed
/// from the manager before the next game starts.
///
/// # Errors
///
/// Propagates session and decision errors; a malformed progress-bar template
/// is reported as [`Error::ProgressBarTemplate`].
pub fn run_self_play(manager: &SessionManager, config: &SelfPlayConfig) -> Result<SelfPlayReport> {
    let policy = config.opponent.policy();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let start = Instant::now();
    let matchboxes_before = manager.agent().matchbox_count();
    let mut wins = 0u64;
    let mut losses = 0u64;
    let mut draws = 0u64;

    let bar = if config.progress {
        let bar = ProgressBar::new(config.num_games as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games {msg}",
            )
            .map_err(|e| Error::ProgressBarTemplate {
                message: e.to_string(),
            })?,
        );
        Some(bar)
    } else {
        None
    };

    log::info!(
        "starting self-play: {} games against the {} opponent",
        config.num_games,
        policy.name()
    );

    for _ in 0..config.num_games {
        let agent_first = rng.random_bool(0.5);
        let mut view = manager.create_session(agent_first)?;

        while view.phase != SessionPhase::Finished {
            view = match view.phase {
                SessionPhase::AwaitingAgentMove => manager.agent_move(&view.id)?,
                SessionPhase::AwaitingOpponentMove => {
                    let board = Board::from_encoding(&view.board)?;
                    let position =
                        policy.select_move(&board, view.agent_mark.opponent(), &mut rng)?;
                    manager.apply_opponent_move(&view.id, position)?
                }
                SessionPhase::Finished => break,
            };
        }

        match view.outcome {
            Some(Outcome::Win) => wins += 1,
            Some(Outcome::Loss) => losses += 1,
            Some(Outcome::Draw) => draws += 1,
            // A finished session always carries an outcome; an empty one
            // here means the session state machine broke.
            None => log::error!("session {} finished without an outcome", view.id),
        }
        manager.remove_session(&view.id);

        if let Some(bar) = &bar {
            bar.set_message(format!("W:{wins} L:{losses} D:{draws}"));
            bar.inc(1);
        }
    }

    if let Some(bar) = &bar {
        bar.finish_with_message(format!("W:{wins} L:{losses} D:{draws}"));
    }

    let elapsed_seconds = start.elapsed().as_secs_f64();
    let total_matchboxes = manager.agent().matchbox_count();
    let report = SelfPlayReport {
        games_played: config.num_games,
        wins,
        losses,
        draws,
        elapsed_seconds,
        games_per_second: if elapsed_seconds > 0.0 {
            config.num_games as f64 / elapsed_seconds
        } else {
            0.0
        },
        new_matchboxes: total_matchboxes.saturating_sub(matchboxes_before),
        total_matchboxes,
    };

    log::info!(
        "self-play finished: {} games in {:.2}s ({:.0} games/s), {} new matchboxes",
        report.games_played,
        report.elapsed_seconds,
        report.games_per_second,
        report.new_matchboxes
    );
    Ok(report)
}
