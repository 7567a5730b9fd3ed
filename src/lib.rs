//! Matchbox-style reinforcement learning for tic-tac-toe
//!
//! This crate provides:
//! - Complete tic-tac-toe game implementation with validation
//! - Board canonicalization under the 8 board symmetries
//! - A matchbox learning agent with bead-based reinforcement
//! - Concurrent game sessions against external opponents
//! - Bulk self-play training against scripted opponents
//! - Snapshot persistence through pluggable repositories

pub mod adapters;
pub mod app;
pub mod error;
pub mod learner;
pub mod ports;
pub mod selfplay;
pub mod session;
pub mod tictactoe;
pub mod utils;

pub use error::{Error, Result};
pub use learner::{
    EpisodeTrace, HistorySnapshot, LearnerConfig, LearnerSnapshot, LearningAgent, Statistics,
};
pub use selfplay::{OpponentKind, SelfPlayConfig, SelfPlayReport, run_self_play};
pub use session::{SessionManager, SessionPhase, SessionView};
pub use tictactoe::{Board, Cell, Outcome, Player};
