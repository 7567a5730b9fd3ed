//! Session lifecycle and turn arbitration
//!
//! `SessionManager` owns the live sessions and mediates between external
//! opponents and the shared [`LearningAgent`]. Each session sits behind its
//! own mutex, so turn checks, the move itself and end-of-game reinforcement
//! happen atomically per session. Reinforcement fires exactly once: the move
//! that finishes the game takes the trace out of the session while the
//! session lock is held, and any later move sees the finished flag first.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use super::session::{Session, SessionPhase, SessionView};
use crate::learner::LearningAgent;
use crate::tictactoe::Outcome;
use crate::{Error, Result};

pub struct SessionManager {
    agent: Arc<LearningAgent>,
    sessions: DashMap<String, Mutex<Session>>,
}

impl SessionManager {
    pub fn new(agent: Arc<LearningAgent>) -> Self {
        SessionManager {
            agent,
            sessions: DashMap::new(),
        }
    }

    /// The shared learning agent behind this manager
    pub fn agent(&self) -> &Arc<LearningAgent> {
        &self.agent
    }

    /// Start a new game.
    ///
    /// When `agent_moves_first` is set the agent plays X and its opening
    /// move is made before the view is returned, so the session is already
    /// awaiting the opponent.
    ///
    /// # Errors
    ///
    /// Propagates the agent's decision errors for the opening move.
    pub fn create_session(&self, agent_moves_first: bool) -> Result<SessionView> {
        let mut session = Session::new(agent_moves_first);
        if agent_moves_first {
            self.drive_agent_move(&mut session)?;
        }

        let id = session.id().to_string();
        let view = session.view();
        self.sessions.insert(id, Mutex::new(session));
        Ok(view)
    }

    /// Apply the external opponent's move.
    ///
    /// If this move ends the game the agent learns from the episode before
    /// the call returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] for unknown ids,
    /// [`Error::SessionFinished`] once the game is over,
    /// [`Error::NotYourTurn`] when it is the agent's turn, and the board's
    /// validation errors for bad positions.
    pub fn apply_opponent_move(&self, session_id: &str, position: usize) -> Result<SessionView> {
        let entry = self.lookup(session_id)?;
        let mut session = entry.lock().unwrap();

        let opponent_mark = session.agent_mark().opponent();
        if let Some(outcome) = session.apply_move(position, opponent_mark)? {
            self.learn(&mut session, outcome);
        }
        Ok(session.view())
    }

    /// Make the agent take its turn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] for unknown ids,
    /// [`Error::SessionFinished`] once the game is over and
    /// [`Error::NotYourTurn`] when the session is awaiting the opponent.
    pub fn agent_move(&self, session_id: &str) -> Result<SessionView> {
        let entry = self.lookup(session_id)?;
        let mut session = entry.lock().unwrap();

        match session.phase() {
            SessionPhase::Finished => {
                return Err(Error::SessionFinished {
                    session_id: session_id.to_string(),
                });
            }
            SessionPhase::AwaitingOpponentMove => {
                return Err(Error::NotYourTurn {
                    session_id: session_id.to_string(),
                    side: session.agent_mark().symbol(),
                });
            }
            SessionPhase::AwaitingAgentMove => {}
        }

        self.drive_agent_move(&mut session)?;
        Ok(session.view())
    }

    /// A snapshot of one session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] for unknown ids.
    pub fn session(&self, session_id: &str) -> Result<SessionView> {
        let entry = self.lookup(session_id)?;
        let session = entry.lock().unwrap();
        Ok(session.view())
    }

    /// Drop a session, finished or not. Returns whether it existed.
    ///
    /// Removing an unfinished session discards its trace; no reinforcement
    /// happens for abandoned games.
    pub fn remove_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn lookup(
        &self,
        session_id: &str,
    ) -> Result<dashmap::mapref::one::Ref<'_, String, Mutex<Session>>> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| Error::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }

    /// Sample a move from the agent, apply it, and learn if it ends the game.
    ///
    /// Called with the session lock held (or before the session is visible).
    fn drive_agent_move(&self, session: &mut Session) -> Result<()> {
        let board = *session.board();
        let agent_mark = session.agent_mark();
        let position = self.agent.choose_move(session.trace_mut(), &board)?;
        if let Some(outcome) = session.apply_move(position, agent_mark)? {
            self.learn(session, outcome);
        }
        Ok(())
    }

    fn learn(&self, session: &mut Session, outcome: Outcome) {
        let trace = session.take_trace();
        self.agent.finish_episode(trace, outcome);
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_count", &self.session_count())
            .finish()
    }
}
