//! In-memory learner repository for testing

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{Result, error::Error, learner::LearnerSnapshot, ports::LearnerRepository};

/// Keeps serialized snapshots in a shared map, avoiding file system I/O.
///
/// Clones share the same underlying storage, so a test can hand one clone
/// to the code under test and inspect the other.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently stored
    pub fn count(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    /// Drop everything stored
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        let key = path.to_string_lossy().to_string();
        self.storage.lock().unwrap().contains_key(&key)
    }
}

impl LearnerRepository for InMemoryRepository {
    fn save(&self, snapshot: &LearnerSnapshot, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec(snapshot).map_err(|e| Error::SerializationContext {
            operation: "serialize learner snapshot for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage.lock().unwrap().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<LearnerSnapshot> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage.lock().unwrap();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load learner snapshot from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize learner snapshot from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let repo = InMemoryRepository::new();
        let path = Path::new("test_learner");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        let mut snapshot = LearnerSnapshot::empty();
        snapshot.games_played = 3;
        repo.save(&snapshot, path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        let loaded = repo.load(path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn loading_a_missing_key_fails() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn clones_share_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1
            .save(&LearnerSnapshot::empty(), Path::new("shared"))
            .unwrap();

        assert!(repo2.load(Path::new("shared")).is_ok());
        assert_eq!(repo1.count(), 1);
        assert_eq!(repo2.count(), 1);

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
