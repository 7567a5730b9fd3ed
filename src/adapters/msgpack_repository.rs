//! MessagePack implementation of the learner repository

use std::{fs::File, path::Path};

use crate::{Result, error::Error, learner::LearnerSnapshot, ports::LearnerRepository};

/// Stores learner snapshots as MessagePack files on disk.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use matchbox::adapters::MsgPackRepository;
/// use matchbox::learner::{LearnerConfig, LearningAgent};
/// use matchbox::ports::LearnerRepository;
///
/// let repo = MsgPackRepository::new();
/// let agent = LearningAgent::new(LearnerConfig::default())?;
///
/// repo.save(&agent.snapshot(), Path::new("trained.msgpack"))?;
/// let snapshot = repo.load(Path::new("trained.msgpack"))?;
/// # Ok::<(), matchbox::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl LearnerRepository for MsgPackRepository {
    fn save(&self, snapshot: &LearnerSnapshot, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        rmp_serde::encode::write(&mut file, snapshot).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize learner snapshot to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LearnerSnapshot> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let snapshot =
            rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
                operation: "deserialize learner snapshot from MessagePack".to_string(),
                message: e.to_string(),
            })?;

        Ok(snapshot)
    }
}
