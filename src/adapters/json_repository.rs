//! JSON implementation of the learner repository
//!
//! Larger on disk than MessagePack but human-readable, which is handy for
//! debugging a trained agent's bead counts directly.

use std::{fs::File, io::BufReader, path::Path};

use crate::{Result, error::Error, learner::LearnerSnapshot, ports::LearnerRepository};

/// Stores learner snapshots as pretty-printed JSON files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    pub fn new() -> Self {
        Self
    }
}

impl LearnerRepository for JsonRepository {
    fn save(&self, snapshot: &LearnerSnapshot, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        serde_json::to_writer_pretty(file, snapshot)?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LearnerSnapshot> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        Ok(snapshot)
    }
}
