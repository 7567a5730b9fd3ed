//! Training against scripted opponents

pub mod opponent;
pub mod runner;

pub use opponent::{OpponentPolicy, OptimalOpponent, RandomOpponent};
pub use runner::{OpponentKind, SelfPlayConfig, SelfPlayReport, run_self_play};
