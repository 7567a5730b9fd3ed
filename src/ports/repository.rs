//! Persistence boundary for learner state

use std::path::Path;

use crate::Result;
use crate::learner::LearnerSnapshot;

/// Storage abstraction for [`LearnerSnapshot`]s.
///
/// Adapters decide what `path` means: a file on disk, a key in memory, or
/// anything else. Callers only ever see snapshots going in and out.
pub trait LearnerRepository {
    /// Persist a snapshot at `path`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns I/O or serialization errors from the backing store.
    fn save(&self, snapshot: &LearnerSnapshot, path: &Path) -> Result<()>;

    /// Load the snapshot stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when nothing is stored at `path` and
    /// serialization errors for corrupt data.
    fn load(&self, path: &Path) -> Result<LearnerSnapshot>;
}
