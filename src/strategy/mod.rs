//! Guess selection strategies
//!
//! A closed set of six strategies behind one tagged enum. Runtime selection
//! stays static dispatch, and per-strategy state (PRNGs, the Bellman
//! guessed set) lives inside the variant.
//!
//! The three matrix-objective strategies share a two-regime shape: while
//! the candidate set is still most of the dictionary, the matrix's
//! full-dictionary caches are near-optimal and cost an O(N) scan; once the
//! set has shrunk past [`CACHED_REGIME_RATIO`], the objective is recomputed
//! against the live candidate set.

mod bellman;
mod letters;

pub use bellman::BellmanStrategy;
pub use letters::CommonLettersStrategy;

use crate::core::WordId;
use crate::error::EngineError;
use crate::matrix::{ResponseMatrix, pick_max_f32, pick_min_f32, pick_min_f64};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::AtomicBool;

/// Candidate-to-dictionary ratio above which cached full-dictionary
/// objectives are reused instead of recomputed
pub const CACHED_REGIME_RATIO: f64 = 0.8;

/// Seed an injectable PRNG; unseeded strategies draw from the OS once
pub(crate) fn rng_from(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Identifier for one of the six strategies (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Random,
    MostCommonLetters,
    MaximumEntropy,
    MinimiseColumnLengths,
    MaximumDictionaryReduction,
    BellmanFullDictionary,
}

impl StrategyKind {
    /// Every strategy, in wire-identifier order
    pub const ALL: [Self; 6] = [
        Self::Random,
        Self::MostCommonLetters,
        Self::MaximumEntropy,
        Self::MinimiseColumnLengths,
        Self::MaximumDictionaryReduction,
        Self::BellmanFullDictionary,
    ];

    /// Parse a wire identifier
    ///
    /// # Errors
    /// `UnknownStrategy` for anything outside the closed set.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "random" => Ok(Self::Random),
            "most_common_letters" => Ok(Self::MostCommonLetters),
            "maximum_entropy" => Ok(Self::MaximumEntropy),
            "minimise_column_lengths" => Ok(Self::MinimiseColumnLengths),
            "maximum_dictionary_reduction" => Ok(Self::MaximumDictionaryReduction),
            "bellman_full_dictionary" => Ok(Self::BellmanFullDictionary),
            other => Err(EngineError::UnknownStrategy(other.to_string())),
        }
    }

    /// The wire identifier
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::MostCommonLetters => "most_common_letters",
            Self::MaximumEntropy => "maximum_entropy",
            Self::MinimiseColumnLengths => "minimise_column_lengths",
            Self::MaximumDictionaryReduction => "maximum_dictionary_reduction",
            Self::BellmanFullDictionary => "bellman_full_dictionary",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a strategy sees when asked for a suggestion
pub struct SelectContext<'a> {
    pub matrix: &'a ResponseMatrix,
    /// Candidate ids consistent with every response so far
    pub filtered: &'a [WordId],
    /// True until the first response has been absorbed
    pub first_call: bool,
    /// Long scans poll this between evaluation chunks
    pub cancel: Option<&'a AtomicBool>,
}

/// A guess selection strategy with its per-game state
pub enum Strategy {
    Random(RandomStrategy),
    MostCommonLetters(CommonLettersStrategy),
    MaximumEntropy(EntropyStrategy),
    MinimiseColumnLengths(ColumnLengthStrategy),
    MaximumDictionaryReduction(ReductionStrategy),
    BellmanFullDictionary(BellmanStrategy),
}

impl Strategy {
    /// Instantiate a strategy; the seed makes stochastic strategies
    /// reproducible
    #[must_use]
    pub fn new(kind: StrategyKind, seed: Option<u64>) -> Self {
        match kind {
            StrategyKind::Random => Self::Random(RandomStrategy::new(seed)),
            StrategyKind::MostCommonLetters => {
                Self::MostCommonLetters(CommonLettersStrategy::new(seed))
            }
            StrategyKind::MaximumEntropy => Self::MaximumEntropy(EntropyStrategy),
            StrategyKind::MinimiseColumnLengths => {
                Self::MinimiseColumnLengths(ColumnLengthStrategy)
            }
            StrategyKind::MaximumDictionaryReduction => {
                Self::MaximumDictionaryReduction(ReductionStrategy)
            }
            StrategyKind::BellmanFullDictionary => {
                Self::BellmanFullDictionary(BellmanStrategy::default())
            }
        }
    }

    /// Which strategy this is
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::Random(_) => StrategyKind::Random,
            Self::MostCommonLetters(_) => StrategyKind::MostCommonLetters,
            Self::MaximumEntropy(_) => StrategyKind::MaximumEntropy,
            Self::MinimiseColumnLengths(_) => StrategyKind::MinimiseColumnLengths,
            Self::MaximumDictionaryReduction(_) => StrategyKind::MaximumDictionaryReduction,
            Self::BellmanFullDictionary(_) => StrategyKind::BellmanFullDictionary,
        }
    }

    /// Select the next guess
    ///
    /// An empty candidate set is `EmptyCandidates`; a singleton is returned
    /// directly. The chosen word is recorded for strategies that track
    /// their own guesses.
    ///
    /// # Errors
    /// `EmptyCandidates`; additionally `NoExternalCandidate` from the
    /// Bellman strategy.
    pub fn select(&mut self, ctx: &SelectContext<'_>) -> Result<WordId, EngineError> {
        if ctx.filtered.is_empty() {
            return Err(EngineError::EmptyCandidates);
        }
        if ctx.filtered.len() == 1 {
            let only = ctx.filtered[0];
            self.record_guess(only);
            return Ok(only);
        }

        let choice = match self {
            Self::Random(s) => Ok(s.select(ctx)),
            Self::MostCommonLetters(s) => Ok(s.select(ctx)),
            Self::MaximumEntropy(s) => s.select(ctx),
            Self::MinimiseColumnLengths(s) => s.select(ctx),
            Self::MaximumDictionaryReduction(s) => s.select(ctx),
            Self::BellmanFullDictionary(s) => s.select(ctx),
        }?;

        self.record_guess(choice);
        Ok(choice)
    }

    /// Inform the strategy a word was guessed, whether or not it suggested
    /// it. Only the Bellman strategy keeps state.
    pub fn record_guess(&mut self, gid: WordId) {
        if let Self::BellmanFullDictionary(s) = self {
            s.record_guess(gid);
        }
    }

    /// Clear per-game state (the Bellman guessed set)
    pub fn reset(&mut self) {
        if let Self::BellmanFullDictionary(s) = self {
            s.reset();
        }
    }
}

/// Uniform draw from the candidates
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: rng_from(seed),
        }
    }

    fn select(&mut self, ctx: &SelectContext<'_>) -> WordId {
        ctx.filtered[self.rng.random_range(0..ctx.filtered.len())]
    }
}

/// Maximize Shannon entropy of the response distribution
pub struct EntropyStrategy;

impl EntropyStrategy {
    fn select(&self, ctx: &SelectContext<'_>) -> Result<WordId, EngineError> {
        let matrix = ctx.matrix;
        if ctx.first_call {
            return best_cached_f32(matrix.cached_entropy_table(), None, pick_max_f32);
        }

        let ratio = ctx.filtered.len() as f64 / matrix.size() as f64;
        if ratio >= CACHED_REGIME_RATIO {
            best_cached_f32(matrix.cached_entropy_table(), Some(ctx.filtered), pick_max_f32)
        } else {
            matrix
                .find_max_entropy(ctx.filtered, ctx.filtered)
                .ok_or(EngineError::EmptyCandidates)
        }
    }
}

/// Minimize the expected per-position distinct-letter count
pub struct ColumnLengthStrategy;

impl ColumnLengthStrategy {
    fn select(&self, ctx: &SelectContext<'_>) -> Result<WordId, EngineError> {
        let matrix = ctx.matrix;
        if ctx.first_call {
            return best_cached_f32(matrix.cached_column_lengths(), None, pick_min_f32);
        }

        let ratio = ctx.filtered.len() as f64 / matrix.size() as f64;
        if ratio >= CACHED_REGIME_RATIO {
            best_cached_f32(matrix.cached_column_lengths(), Some(ctx.filtered), pick_min_f32)
        } else {
            matrix
                .find_min_column_length(ctx.filtered, ctx.filtered)
                .ok_or(EngineError::EmptyCandidates)
        }
    }
}

/// Minimize the expected surviving candidate count
pub struct ReductionStrategy;

impl ReductionStrategy {
    fn select(&self, ctx: &SelectContext<'_>) -> Result<WordId, EngineError> {
        let matrix = ctx.matrix;
        if ctx.first_call {
            let table = matrix.cached_reductions();
            return (0..table.len())
                .map(|gid| (table[gid], gid))
                .reduce(pick_min_f64)
                .map(|(_, gid)| gid)
                .ok_or(EngineError::EmptyCandidates);
        }

        let ratio = ctx.filtered.len() as f64 / matrix.size() as f64;
        if ratio >= CACHED_REGIME_RATIO {
            let table = matrix.cached_reductions();
            ctx.filtered
                .iter()
                .map(|&gid| (table[gid], gid))
                .reduce(pick_min_f64)
                .map(|(_, gid)| gid)
                .ok_or(EngineError::EmptyCandidates)
        } else {
            matrix
                .find_max_reduction(ctx.filtered, ctx.filtered)
                .ok_or(EngineError::EmptyCandidates)
        }
    }
}

/// Best id by cached score: over the whole table, or a candidate subset
fn best_cached_f32(
    table: &[f32],
    candidates: Option<&[WordId]>,
    pick: fn((f32, WordId), (f32, WordId)) -> (f32, WordId),
) -> Result<WordId, EngineError> {
    let best = match candidates {
        Some(ids) => ids.iter().map(|&gid| (table[gid], gid)).reduce(pick),
        None => (0..table.len()).map(|gid| (table[gid], gid)).reduce(pick),
    };
    best.map(|(_, gid)| gid).ok_or(EngineError::EmptyCandidates)
}
