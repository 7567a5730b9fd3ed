//! A single game session between the agent and an external opponent

use serde::Serialize;
use uuid::Uuid;

use crate::learner::EpisodeTrace;
use crate::tictactoe::{Board, Outcome, Player};
use crate::{Error, Result};

/// Whose action the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingOpponentMove,
    AwaitingAgentMove,
    Finished,
}

/// One move in a session's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveLogEntry {
    pub player: Player,
    pub position: usize,
    /// Wire encoding of the board after this move
    pub board_after: String,
}

/// Serializable snapshot of a session for transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: String,
    /// Wire encoding of the current board
    pub board: String,
    pub agent_mark: Player,
    /// The player to move, or `None` once finished
    pub current_turn: Option<Player>,
    pub phase: SessionPhase,
    pub legal_moves: Vec<usize>,
    pub moves: Vec<MoveLogEntry>,
    /// Final outcome from the agent's perspective, once finished
    pub outcome: Option<Outcome>,
    pub winner: Option<Player>,
}

/// Mutable state of one game. X always moves first; the agent plays X when
/// it opens the game and O otherwise.
#[derive(Debug)]
pub struct Session {
    id: String,
    board: Board,
    agent_mark: Player,
    turn: Player,
    moves: Vec<MoveLogEntry>,
    outcome: Option<Outcome>,
    trace: EpisodeTrace,
}

impl Session {
    pub fn new(agent_moves_first: bool) -> Self {
        let agent_mark = if agent_moves_first { Player::X } else { Player::O };
        Session {
            id: Uuid::new_v4().to_string(),
            board: Board::new(),
            agent_mark,
            turn: Player::X,
            moves: Vec::new(),
            outcome: None,
            trace: EpisodeTrace::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent_mark(&self) -> Player {
        self.agent_mark
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_finished() {
            SessionPhase::Finished
        } else if self.turn == self.agent_mark {
            SessionPhase::AwaitingAgentMove
        } else {
            SessionPhase::AwaitingOpponentMove
        }
    }

    /// The episode trace, threaded into the agent's decisions
    pub fn trace_mut(&mut self) -> &mut EpisodeTrace {
        &mut self.trace
    }

    /// Take the trace out for reinforcement, leaving an empty one behind
    pub fn take_trace(&mut self) -> EpisodeTrace {
        std::mem::take(&mut self.trace)
    }

    /// Apply a move for `player`, advancing the turn and detecting the end
    /// of the game.
    ///
    /// Returns the final outcome from the agent's perspective when this move
    /// ends the game, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionFinished`] on a finished session,
    /// [`Error::NotYourTurn`] when `player` is not the player to move, and
    /// the board's own errors for out-of-range or occupied positions.
    pub fn apply_move(&mut self, position: usize, player: Player) -> Result<Option<Outcome>> {
        if self.is_finished() {
            return Err(Error::SessionFinished {
                session_id: self.id.clone(),
            });
        }
        if self.turn != player {
            return Err(Error::NotYourTurn {
                session_id: self.id.clone(),
                side: player.symbol(),
            });
        }

        self.board = self.board.make_move(position, player)?;
        self.moves.push(MoveLogEntry {
            player,
            position,
            board_after: self.board.encode(),
        });
        self.turn = player.opponent();

        self.outcome = self.board.result_for(self.agent_mark);
        Ok(self.outcome)
    }

    pub fn view(&self) -> SessionView {
        let phase = self.phase();
        SessionView {
            id: self.id.clone(),
            board: self.board.encode(),
            agent_mark: self.agent_mark,
            current_turn: (phase != SessionPhase::Finished).then_some(self.turn),
            phase,
            legal_moves: if phase == SessionPhase::Finished {
                Vec::new()
            } else {
                self.board.legal_moves()
            },
            moves: self.moves.clone(),
            outcome: self.outcome,
            winner: self.board.winner(),
        }
    }
}
