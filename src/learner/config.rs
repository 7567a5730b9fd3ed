//! Learner hyperparameters

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Reinforcement hyperparameters for a [`LearningAgent`](super::LearningAgent).
///
/// The defaults reproduce the classic matchbox setup: 3 beads per legal
/// move, +3 for a win, +1 for a draw, -1 for a loss with a floor of one
/// bead, and a learning-curve point every 10 games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Beads seeded on each legal move when a matchbox is first created
    pub initial_beads: u32,
    /// Beads added to each traced move after a win
    pub win_reward: u32,
    /// Beads added to each traced move after a draw
    pub draw_reward: u32,
    /// Beads removed from each traced move after a loss
    pub loss_penalty: u32,
    /// Lower bound bead counts are clamped to when penalized
    pub bead_floor: u32,
    /// Record a history point every this many finished games
    pub snapshot_interval: u64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig {
            initial_beads: 3,
            win_reward: 3,
            draw_reward: 1,
            loss_penalty: 1,
            bead_floor: 1,
            snapshot_interval: 10,
        }
    }
}

impl LearnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_beads(mut self, initial_beads: u32) -> Self {
        self.initial_beads = initial_beads;
        self
    }

    pub fn with_win_reward(mut self, win_reward: u32) -> Self {
        self.win_reward = win_reward;
        self
    }

    pub fn with_draw_reward(mut self, draw_reward: u32) -> Self {
        self.draw_reward = draw_reward;
        self
    }

    pub fn with_loss_penalty(mut self, loss_penalty: u32) -> Self {
        self.loss_penalty = loss_penalty;
        self
    }

    pub fn with_bead_floor(mut self, bead_floor: u32) -> Self {
        self.bead_floor = bead_floor;
        self
    }

    pub fn with_snapshot_interval(mut self, snapshot_interval: u64) -> Self {
        self.snapshot_interval = snapshot_interval;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when a value would make the
    /// learner degenerate: zero initial beads, a floor above the initial
    /// seeding, or a zero snapshot interval.
    pub fn validate(&self) -> Result<()> {
        if self.initial_beads == 0 {
            return Err(Error::InvalidConfiguration {
                message: "initial_beads must be at least 1".to_string(),
            });
        }
        if self.bead_floor > self.initial_beads {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "bead_floor ({}) must not exceed initial_beads ({})",
                    self.bead_floor, self.initial_beads
                ),
            });
        }
        if self.snapshot_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "snapshot_interval must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_setup() {
        let config = LearnerConfig::default();
        assert_eq!(config.initial_beads, 3);
        assert_eq!(config.win_reward, 3);
        assert_eq!(config.draw_reward, 1);
        assert_eq!(config.loss_penalty, 1);
        assert_eq!(config.bead_floor, 1);
        assert_eq!(config.snapshot_interval, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods_compose() {
        let config = LearnerConfig::new()
            .with_initial_beads(5)
            .with_win_reward(4)
            .with_snapshot_interval(25);
        assert_eq!(config.initial_beads, 5);
        assert_eq!(config.win_reward, 4);
        assert_eq!(config.snapshot_interval, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn degenerate_configurations_are_rejected() {
        assert!(LearnerConfig::new().with_initial_beads(0).validate().is_err());
        assert!(LearnerConfig::new().with_bead_floor(10).validate().is_err());
        assert!(
            LearnerConfig::new()
                .with_snapshot_interval(0)
                .validate()
                .is_err()
        );
    }
}
