//! Bellman look-ahead strategy
//!
//! Looks one ply ahead over words *outside* the remaining candidate set:
//! every unguessed external word is scored by the expected number of
//! candidates surviving its response, and the strongest reducer is played.
//! The strategy keeps its own record of everything guessed this game, so a
//! word is never proposed twice; on the opening guess, when the candidate
//! set still is the whole dictionary, the precomputed full-dictionary
//! reduction table supplies the answer instead.

use super::SelectContext;
use crate::core::WordId;
use crate::error::EngineError;
use crate::matrix::{PARALLEL_THRESHOLD, pick_min_f64};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::sync::atomic::Ordering;

/// Candidate evaluations between cancellation checks
const CANCEL_CHUNK: usize = 512;

#[derive(Default)]
pub struct BellmanStrategy {
    guessed: FxHashSet<WordId>,
}

impl BellmanStrategy {
    /// Words this strategy has seen guessed in the current game
    #[must_use]
    pub fn guessed(&self) -> &FxHashSet<WordId> {
        &self.guessed
    }

    pub(super) fn record_guess(&mut self, gid: WordId) {
        self.guessed.insert(gid);
    }

    pub(super) fn reset(&mut self) {
        self.guessed.clear();
    }

    pub(super) fn select(&self, ctx: &SelectContext<'_>) -> Result<WordId, EngineError> {
        let matrix = ctx.matrix;

        if ctx.first_call {
            let table = matrix.cached_reductions();
            return (0..table.len())
                .filter(|gid| !self.guessed.contains(gid))
                .map(|gid| (table[gid], gid))
                .reduce(pick_min_f64)
                .map(|(_, gid)| gid)
                .ok_or(EngineError::NoExternalCandidate);
        }

        let in_candidates: FxHashSet<WordId> = ctx.filtered.iter().copied().collect();
        let externals: Vec<WordId> = (0..matrix.size())
            .filter(|gid| !self.guessed.contains(gid) && !in_candidates.contains(gid))
            .collect();
        if externals.is_empty() {
            return Err(EngineError::NoExternalCandidate);
        }

        let score = |gid: WordId| (matrix.expected_remaining(gid, Some(ctx.filtered)), gid);
        let mut best: Option<(f64, WordId)> = None;
        for chunk in externals.chunks(CANCEL_CHUNK) {
            let chunk_best = if chunk.len() >= PARALLEL_THRESHOLD {
                chunk.par_iter().map(|&g| score(g)).reduce_with(pick_min_f64)
            } else {
                chunk.iter().map(|&g| score(g)).reduce(pick_min_f64)
            };
            best = match (best, chunk_best) {
                (Some(a), Some(b)) => Some(pick_min_f64(a, b)),
                (a, b) => a.or(b),
            };
            if let Some(flag) = ctx.cancel
                && flag.load(Ordering::Relaxed)
            {
                break;
            }
        }

        best.map(|(_, gid)| gid)
            .ok_or(EngineError::NoExternalCandidate)
    }
}
