//! Matchbox reinforcement learning
//!
//! The learner keeps one [`Matchbox`] per canonical board state. Decisions
//! sample a move in proportion to bead counts; finished episodes feed back
//! into the bead counts of every traced decision.

pub mod agent;
pub mod config;
pub mod matchbox;
pub mod snapshot;
pub mod store;

pub use agent::{EpisodeTrace, LearningAgent, MoveRecord, Statistics};
pub use config::LearnerConfig;
pub use matchbox::Matchbox;
pub use snapshot::{HistorySnapshot, LearnerSnapshot};
pub use store::{MatchboxStore, MatchboxView};
