//! A single matchbox: the bead distribution for one canonical state
//!
//! Bead positions are always expressed in canonical coordinates. The bead
//! map is a `BTreeMap` so iteration order (and therefore sampling, given a
//! fixed RNG state) is deterministic.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::weighted_sample;

/// Bead distribution and usage counter for one canonical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchbox {
    state: String,
    beads: BTreeMap<usize, u32>,
    times_used: u64,
}

impl Matchbox {
    /// Create a matchbox seeding `initial_beads` beads on each legal move.
    pub fn new(state: impl Into<String>, legal_moves: &[usize], initial_beads: u32) -> Self {
        Matchbox {
            state: state.into(),
            beads: legal_moves.iter().map(|&m| (m, initial_beads)).collect(),
            times_used: 0,
        }
    }

    /// The canonical state encoding this matchbox belongs to
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Bead count for one canonical move, if the move is tracked
    pub fn bead_count(&self, position: usize) -> Option<u32> {
        self.beads.get(&position).copied()
    }

    /// The bead map, keyed by canonical move
    pub fn beads(&self) -> &BTreeMap<usize, u32> {
        &self.beads
    }

    /// How many times this matchbox has been opened for a decision
    pub fn times_used(&self) -> u64 {
        self.times_used
    }

    pub fn record_use(&mut self) {
        self.times_used += 1;
    }

    /// Sum of all bead counts
    pub fn total_beads(&self) -> u64 {
        self.beads.values().map(|&b| u64::from(b)).sum()
    }

    /// Selection probability per canonical move.
    ///
    /// Returns an empty map when the matchbox holds no beads at all.
    pub fn probabilities(&self) -> BTreeMap<usize, f64> {
        let total = self.total_beads();
        if total == 0 {
            return BTreeMap::new();
        }
        self.beads
            .iter()
            .map(|(&m, &b)| (m, f64::from(b) / total as f64))
            .collect()
    }

    /// Add `delta` beads to a traced move.
    ///
    /// Unknown positions are ignored; reinforcement only ever touches moves
    /// the matchbox was seeded with.
    pub fn reward(&mut self, position: usize, delta: u32) {
        if let Some(count) = self.beads.get_mut(&position) {
            *count = count.saturating_add(delta);
        }
    }

    /// Remove `delta` beads from a traced move, clamping at `floor`.
    ///
    /// With `floor >= 1` every seeded move stays selectable, so a matchbox
    /// can never be emptied by punishment.
    pub fn penalize(&mut self, position: usize, delta: u32, floor: u32) {
        if let Some(count) = self.beads.get_mut(&position) {
            *count = count.saturating_sub(delta).max(floor);
        }
    }

    /// Draw one canonical move with probability proportional to bead count.
    ///
    /// Returns `None` only when every tracked move has zero beads.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        let items: Vec<(usize, u32)> = self.beads.iter().map(|(&m, &b)| (m, b)).collect();
        weighted_sample(rng, &items)
    }
}
