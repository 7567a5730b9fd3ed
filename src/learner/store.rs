//! Concurrent matchbox table
//!
//! `MatchboxStore` keys matchboxes by canonical state encoding. All access
//! goes through closures run while the entry's shard lock is held, so
//! get-or-create, usage counting and sampling compose into one atomic step
//! per state.

use std::collections::BTreeMap;

use dashmap::DashMap;

use super::matchbox::Matchbox;

/// Read-only view of one matchbox for inspection endpoints.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MatchboxView {
    /// Canonical state encoding
    pub state: String,
    /// Bead counts per canonical move
    pub beads: BTreeMap<usize, u32>,
    /// Selection probability per canonical move
    pub probabilities: BTreeMap<usize, f64>,
    pub times_used: u64,
    pub total_beads: u64,
}

impl MatchboxView {
    fn of(matchbox: &Matchbox) -> Self {
        MatchboxView {
            state: matchbox.state().to_string(),
            beads: matchbox.beads().clone(),
            probabilities: matchbox.probabilities(),
            times_used: matchbox.times_used(),
            total_beads: matchbox.total_beads(),
        }
    }
}

/// Thread-safe map from canonical state to [`Matchbox`].
#[derive(Debug, Default)]
pub struct MatchboxStore {
    boxes: DashMap<String, Matchbox>,
}

impl MatchboxStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the matchbox for `state`, creating it first if absent.
    ///
    /// Creation seeds `initial_beads` beads on each of `legal_moves`. The
    /// closure runs under the entry lock, so concurrent callers for the same
    /// state serialize and never observe a half-initialized box.
    pub fn with_box<T>(
        &self,
        state: &str,
        legal_moves: &[usize],
        initial_beads: u32,
        f: impl FnOnce(&mut Matchbox) -> T,
    ) -> T {
        let mut entry = self
            .boxes
            .entry(state.to_string())
            .or_insert_with(|| Matchbox::new(state, legal_moves, initial_beads));
        f(entry.value_mut())
    }

    /// Run `f` against an existing matchbox.
    ///
    /// Returns `None` without creating anything when `state` is unknown.
    pub fn update<T>(&self, state: &str, f: impl FnOnce(&mut Matchbox) -> T) -> Option<T> {
        self.boxes.get_mut(state).map(|mut entry| f(entry.value_mut()))
    }

    /// Snapshot one matchbox for inspection
    pub fn view(&self, state: &str) -> Option<MatchboxView> {
        self.boxes.get(state).map(|entry| MatchboxView::of(entry.value()))
    }

    pub fn contains(&self, state: &str) -> bool {
        self.boxes.contains_key(state)
    }

    /// Number of matchboxes in the table
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Sum of bead counts across every matchbox.
    ///
    /// Iterates entry by entry; concurrent updates may or may not be
    /// reflected, which is acceptable for statistics reporting.
    pub fn total_beads(&self) -> u64 {
        self.boxes.iter().map(|entry| entry.value().total_beads()).sum()
    }

    /// Copy the full table into an ordered map for serialization
    pub fn snapshot(&self) -> BTreeMap<String, Matchbox> {
        self.boxes
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Rebuild a store from a serialized table
    pub fn from_snapshot(matchboxes: BTreeMap<String, Matchbox>) -> Self {
        MatchboxStore {
            boxes: matchboxes.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn with_box_creates_once_and_reuses() {
        let store = MatchboxStore::new();

        let first = store.with_box("_________", &[0, 4], 3, |mb| mb.total_beads());
        assert_eq!(first, 6);
        assert_eq!(store.len(), 1);

        // Second call must see the same box, not reseed it.
        store.with_box("_________", &[0, 4], 3, |mb| mb.reward(4, 3));
        let total = store.with_box("_________", &[0, 4], 3, |mb| mb.total_beads());
        assert_eq!(total, 9);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_skips_unknown_states() {
        let store = MatchboxStore::new();
        assert_eq!(store.update("_________", |mb| mb.reward(0, 1)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn view_reports_probabilities() {
        let store = MatchboxStore::new();
        store.with_box("X________", &[1, 2], 1, |mb| mb.reward(1, 3));

        let view = store.view("X________").unwrap();
        assert_eq!(view.total_beads, 5);
        assert_eq!(view.beads[&1], 4);
        assert!((view.probabilities[&1] - 0.8).abs() < 1e-9);
        assert!(store.view("O________").is_none());
    }

    #[test]
    fn snapshot_round_trips_the_table() {
        let store = MatchboxStore::new();
        store.with_box("_________", &[0, 4, 8], 3, |mb| mb.record_use());
        store.with_box("X________", &[1], 3, |_| ());

        let restored = MatchboxStore::from_snapshot(store.snapshot());
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.view("_________").unwrap().times_used, 1);
        assert_eq!(restored.total_beads(), store.total_beads());
    }

    #[test]
    fn concurrent_creation_seeds_exactly_once() {
        let store = Arc::new(MatchboxStore::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store.with_box("_________", &[0, 1, 2], 2, |mb| mb.record_use());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 1);
        let view = store.view("_________").unwrap();
        assert_eq!(view.times_used, 800);
        assert_eq!(view.total_beads, 6);
    }
}
