//! Dependency injection container
//!
//! The container owns the infrastructure dependencies (the learner
//! repository, a default seed) and wires them into agents and session
//! managers. Production code uses [`App::new`]; tests swap in the in-memory
//! repository through [`App::for_testing`].

use std::{path::Path, sync::Arc};

use super::config::AgentConfig;
use crate::{
    Result, adapters::MsgPackRepository, learner::LearningAgent, ports::LearnerRepository,
};

/// Application container.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use matchbox::app::{AgentConfig, App};
///
/// let app = App::new();
/// let agent = app.create_agent(AgentConfig::new().with_seed(42))?;
/// # Ok::<(), matchbox::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use matchbox::adapters::InMemoryRepository;
/// use matchbox::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    repository: Arc<dyn LearnerRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create an app with production defaults: MessagePack persistence and
    /// no default seed.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Start building an app with custom dependencies
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// The configured learner repository
    pub fn repository(&self) -> Arc<dyn LearnerRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Create a fresh agent.
    ///
    /// The config's seed wins over the container default; with neither the
    /// agent is seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// for degenerate learner settings.
    pub fn create_agent(&self, config: AgentConfig) -> Result<LearningAgent> {
        match config.seed.or(self.default_seed) {
            Some(seed) => LearningAgent::with_seed(config.learner, seed),
            None => LearningAgent::new(config.learner),
        }
    }

    /// Load an agent's learned state from the configured repository.
    ///
    /// # Errors
    ///
    /// Propagates repository errors and configuration validation errors.
    pub fn load_agent(&self, config: AgentConfig, path: &Path) -> Result<LearningAgent> {
        let snapshot = self.repository.load(path)?;
        let agent = self.create_agent(config)?;
        agent.restore(snapshot);
        Ok(agent)
    }

    /// Save an agent's learned state through the configured repository.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub fn save_agent(&self, agent: &LearningAgent, path: &Path) -> Result<()> {
        self.repository.save(&agent.snapshot(), path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an [`App`] with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn LearnerRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Swap in a custom learner repository
    pub fn with_repository<R: LearnerRepository + Send + Sync + 'static>(
        mut self,
        repository: R,
    ) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Seed every agent this container creates, unless the agent's own
    /// config carries a seed.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app, defaulting to MessagePack persistence.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;
    use crate::tictactoe::{Board, Outcome};

    #[test]
    fn app_creates_agents() {
        let app = App::new();
        assert!(app.create_agent(AgentConfig::new()).is_ok());
    }

    #[test]
    fn config_seed_overrides_the_container_default() {
        let app = App::for_testing().with_default_seed(1).build();

        let a = app.create_agent(AgentConfig::new().with_seed(42)).unwrap();
        let b = app.create_agent(AgentConfig::new().with_seed(42)).unwrap();

        // Same seed, same first decision.
        let board = Board::new();
        let mut trace_a = a.start_episode();
        let mut trace_b = b.start_episode();
        assert_eq!(
            a.choose_move(&mut trace_a, &board).unwrap(),
            b.choose_move(&mut trace_b, &board).unwrap()
        );
    }

    #[test]
    fn save_and_load_round_trip_through_the_repository() {
        let repo = InMemoryRepository::new();
        let app = App::for_testing()
            .with_repository(repo.clone())
            .with_default_seed(42)
            .build();

        let agent = app.create_agent(AgentConfig::new()).unwrap();
        let board = Board::new();
        let mut trace = agent.start_episode();
        agent.choose_move(&mut trace, &board).unwrap();
        agent.finish_episode(trace, Outcome::Win);

        let path = Path::new("agent_state");
        app.save_agent(&agent, path).unwrap();
        assert_eq!(repo.count(), 1);

        let loaded = app.load_agent(AgentConfig::new(), path).unwrap();
        assert_eq!(loaded.snapshot(), agent.snapshot());
        assert_eq!(loaded.statistics().games_played, 1);
    }
}
