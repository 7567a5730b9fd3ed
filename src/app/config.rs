//! Agent creation configuration

use serde::{Deserialize, Serialize};

use crate::learner::LearnerConfig;

/// Configuration for creating a [`LearningAgent`](crate::learner::LearningAgent)
/// through the [`App`](super::App) container.
///
/// Wraps the learner hyperparameters with an optional RNG seed. A `None`
/// seed means the agent draws from OS entropy, unless the container carries
/// a default seed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    pub learner: LearnerConfig,
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_learner(mut self, learner: LearnerConfig) -> Self {
        self.learner = learner;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
