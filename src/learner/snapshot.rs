//! Serializable snapshots of learner state
//!
//! `LearnerSnapshot` is the persistence format: the full matchbox table plus
//! the outcome counters and the recorded learning-curve history. Snapshots
//! are plain data and carry no concurrency wrappers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::matchbox::Matchbox;

/// One point on the learning curve, recorded every snapshot interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Total games finished when this point was recorded
    pub games: u64,
    /// Total beads across all matchboxes
    pub total_beads: u64,
    /// Number of matchboxes in the table
    pub matchbox_count: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// Wins divided by games played
    pub win_rate: f64,
}

/// Complete serializable learner state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSnapshot {
    /// Matchbox table keyed by canonical state encoding
    pub matchboxes: BTreeMap<String, Matchbox>,
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// Learning-curve points in recording order
    pub history: Vec<HistorySnapshot>,
}

impl LearnerSnapshot {
    /// An empty snapshot: no matchboxes, no games, no history.
    pub fn empty() -> Self {
        LearnerSnapshot {
            matchboxes: BTreeMap::new(),
            games_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_state() {
        let snapshot = LearnerSnapshot::empty();
        assert!(snapshot.matchboxes.is_empty());
        assert_eq!(snapshot.games_played, 0);
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn snapshot_survives_json_round_trip() {
        let mut snapshot = LearnerSnapshot::empty();
        snapshot
            .matchboxes
            .insert("_________".to_string(), Matchbox::new("_________", &[0, 4], 3));
        snapshot.games_played = 10;
        snapshot.wins = 6;
        snapshot.losses = 3;
        snapshot.draws = 1;
        snapshot.history.push(HistorySnapshot {
            games: 10,
            total_beads: 6,
            matchbox_count: 1,
            wins: 6,
            losses: 3,
            draws: 1,
            win_rate: 0.6,
        });

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: LearnerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
