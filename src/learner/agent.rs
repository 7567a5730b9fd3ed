//! The learning agent: decision making and reinforcement
//!
//! `LearningAgent` owns the matchbox table, the outcome counters and the
//! RNG. It is shared behind `Arc` and safe to call from many sessions at
//! once.
//!
//! Locking order is fixed: the outer `RwLock` is taken first (read for
//! normal operation, write only for wholesale replacement on reset or
//! restore), then either the ledger mutex or a matchbox entry, then the RNG
//! mutex. No method takes locks in any other order.

use std::sync::{Mutex, RwLock};

use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use super::config::LearnerConfig;
use super::snapshot::{HistorySnapshot, LearnerSnapshot};
use super::store::{MatchboxStore, MatchboxView};
use crate::tictactoe::{Board, Outcome};
use crate::{Error, Result};

/// One decision taken during an episode, in canonical coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Canonical state the decision was made in
    pub state: String,
    /// The sampled move, in canonical coordinates
    pub canonical_move: usize,
}

/// The agent's decisions for one episode, applied as a unit at the end.
///
/// Each episode owns its trace; the caller threads it through
/// [`LearningAgent::choose_move`] and hands it back to
/// [`LearningAgent::finish_episode`], which consumes it. Concurrent episodes
/// therefore never see each other's records.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EpisodeTrace {
    records: Vec<MoveRecord>,
}

impl EpisodeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Aggregate agent statistics for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// Wins divided by games played, or 0.0 before the first game
    pub win_rate: f64,
    pub matchbox_count: usize,
    pub total_beads: u64,
}

#[derive(Debug, Default)]
struct Ledger {
    games_played: u64,
    wins: u64,
    losses: u64,
    draws: u64,
    history: Vec<HistorySnapshot>,
}

#[derive(Debug, Default)]
struct LearnerState {
    store: MatchboxStore,
    ledger: Mutex<Ledger>,
}

/// A matchbox-style reinforcement learner over canonical board states.
pub struct LearningAgent {
    config: LearnerConfig,
    state: RwLock<LearnerState>,
    rng: Mutex<StdRng>,
}

impl LearningAgent {
    /// Create a fresh agent with an OS-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the config fails
    /// validation.
    pub fn new(config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(LearningAgent {
            config,
            state: RwLock::new(LearnerState::default()),
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Create a fresh agent with a deterministic RNG seed.
    pub fn with_seed(config: LearnerConfig, seed: u64) -> Result<Self> {
        let agent = Self::new(config)?;
        agent.reseed(seed);
        Ok(agent)
    }

    /// Rebuild an agent from a previously saved snapshot.
    pub fn from_snapshot(config: LearnerConfig, snapshot: LearnerSnapshot) -> Result<Self> {
        let agent = Self::new(config)?;
        agent.restore(snapshot);
        Ok(agent)
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Replace the RNG with a seeded one for reproducible runs
    pub fn reseed(&self, seed: u64) {
        *self.rng.lock().unwrap() = StdRng::seed_from_u64(seed);
    }

    /// Begin a new episode, producing its empty trace
    pub fn start_episode(&self) -> EpisodeTrace {
        EpisodeTrace::new()
    }

    /// Choose a move for the given board and record it in the trace.
    ///
    /// The board is canonicalized, the matchbox for the canonical state is
    /// created on first visit, its usage counter is bumped and a move is
    /// drawn with probability proportional to bead count. The returned
    /// position is in the board's own coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalMoves`] on a terminal board and
    /// [`Error::DepletedMatchbox`] if every bead in the matchbox has been
    /// removed, which cannot happen with a bead floor of at least one.
    pub fn choose_move(&self, trace: &mut EpisodeTrace, board: &Board) -> Result<usize> {
        let legal_moves = board.legal_moves();
        if legal_moves.is_empty() {
            return Err(Error::NoLegalMoves);
        }

        let ctx = board.canonical_context();
        let canonical_moves: Vec<usize> =
            legal_moves.iter().map(|&m| ctx.to_canonical(m)).collect();

        let state = self.state.read().unwrap();
        let sampled = state.store.with_box(
            &ctx.encoding,
            &canonical_moves,
            self.config.initial_beads,
            |mb| {
                mb.record_use();
                let mut rng = self.rng.lock().unwrap();
                mb.sample(&mut *rng)
            },
        );

        let canonical_move = sampled.ok_or_else(|| Error::DepletedMatchbox {
            state: ctx.encoding.clone(),
        })?;

        let position = ctx.to_concrete(canonical_move);
        trace.records.push(MoveRecord {
            state: ctx.encoding,
            canonical_move,
        });
        Ok(position)
    }

    /// Apply reinforcement for a finished episode and consume its trace.
    ///
    /// Counters are updated first, then every traced decision is rewarded or
    /// penalized according to the outcome. A traced state whose matchbox has
    /// vanished (possible after a concurrent reset) is logged and skipped
    /// rather than recreated. Every `snapshot_interval` games a history
    /// point is recorded from the post-update totals.
    ///
    /// The ledger mutex is held for the whole update, so concurrent
    /// finishers serialize and history points always see consistent
    /// counters.
    pub fn finish_episode(&self, trace: EpisodeTrace, outcome: Outcome) {
        let state = self.state.read().unwrap();
        let mut ledger = state.ledger.lock().unwrap();

        ledger.games_played += 1;
        match outcome {
            Outcome::Win => ledger.wins += 1,
            Outcome::Loss => ledger.losses += 1,
            Outcome::Draw => ledger.draws += 1,
        }

        for record in &trace.records {
            let applied = state.store.update(&record.state, |mb| match outcome {
                Outcome::Win => mb.reward(record.canonical_move, self.config.win_reward),
                Outcome::Draw => mb.reward(record.canonical_move, self.config.draw_reward),
                Outcome::Loss => {
                    mb.penalize(record.canonical_move, self.config.loss_penalty, self.config.bead_floor)
                }
            });
            if applied.is_none() {
                log::warn!(
                    "skipping reinforcement for state '{}': matchbox missing",
                    record.state
                );
            }
        }

        if ledger.games_played % self.config.snapshot_interval == 0 {
            let point = HistorySnapshot {
                games: ledger.games_played,
                total_beads: state.store.total_beads(),
                matchbox_count: state.store.len() as u64,
                wins: ledger.wins,
                losses: ledger.losses,
                draws: ledger.draws,
                win_rate: ledger.wins as f64 / ledger.games_played as f64,
            };
            ledger.history.push(point);
        }
    }

    /// Aggregate statistics over all games played so far
    pub fn statistics(&self) -> Statistics {
        let state = self.state.read().unwrap();
        let ledger = state.ledger.lock().unwrap();
        let win_rate = if ledger.games_played > 0 {
            ledger.wins as f64 / ledger.games_played as f64
        } else {
            0.0
        };
        Statistics {
            games_played: ledger.games_played,
            wins: ledger.wins,
            losses: ledger.losses,
            draws: ledger.draws,
            win_rate,
            matchbox_count: state.store.len(),
            total_beads: state.store.total_beads(),
        }
    }

    /// The recorded learning-curve points, oldest first
    pub fn history(&self) -> Vec<HistorySnapshot> {
        let state = self.state.read().unwrap();
        let ledger = state.ledger.lock().unwrap();
        ledger.history.clone()
    }

    /// Number of matchboxes created so far
    pub fn matchbox_count(&self) -> usize {
        self.state.read().unwrap().store.len()
    }

    /// Inspect the matchbox for an arbitrary board encoding.
    ///
    /// The encoding is validated and canonicalized; `Ok(None)` means the
    /// canonical state has never been visited.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed encodings.
    pub fn matchbox_for(&self, encoding: &str) -> Result<Option<MatchboxView>> {
        let board = Board::from_encoding(encoding)?;
        let ctx = board.canonical_context();
        Ok(self.state.read().unwrap().store.view(&ctx.encoding))
    }

    /// Discard all learned state, counters and history.
    ///
    /// Takes the write lock, so reset waits for in-flight decisions and
    /// reinforcement to drain and no operation ever sees a half-cleared
    /// table.
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap();
        *state = LearnerState::default();
    }

    /// Copy the full learner state into a serializable snapshot
    pub fn snapshot(&self) -> LearnerSnapshot {
        let state = self.state.read().unwrap();
        let ledger = state.ledger.lock().unwrap();
        LearnerSnapshot {
            matchboxes: state.store.snapshot(),
            games_played: ledger.games_played,
            wins: ledger.wins,
            losses: ledger.losses,
            draws: ledger.draws,
            history: ledger.history.clone(),
        }
    }

    /// Replace the learner state with the contents of a snapshot
    pub fn restore(&self, snapshot: LearnerSnapshot) {
        let mut state = self.state.write().unwrap();
        *state = LearnerState {
            store: MatchboxStore::from_snapshot(snapshot.matchboxes),
            ledger: Mutex::new(Ledger {
                games_played: snapshot.games_played,
                wins: snapshot.wins,
                losses: snapshot.losses,
                draws: snapshot.draws,
                history: snapshot.history,
            }),
        };
    }
}

impl std::fmt::Debug for LearningAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearningAgent")
            .field("config", &self.config)
            .field("matchbox_count", &self.matchbox_count())
            .finish()
    }
}
