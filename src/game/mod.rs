//! Game session
//!
//! One interactive game's lifecycle: a shared response matrix, a target, an
//! attempt budget, the accumulated candidate filter with its cached
//! filtered view, the ordered guess history, and the active strategy. A
//! session is owned by a single logical owner; hosts running several games
//! serialize access per game id.
//!
//! The state machine is `Active -> Won` on an all-green guess or
//! `Active -> Lost` when the budget runs out; both are terminal.

use crate::analytics::LetterStats;
use crate::core::{Response, Status, WordId};
use crate::error::EngineError;
use crate::matrix::ResponseMatrix;
use crate::strategy::{SelectContext, Strategy, StrategyKind, rng_from};
use rand::Rng;
use std::sync::Arc;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Active,
    Won,
    Lost,
}

/// One absorbed guess
#[derive(Debug, Clone)]
pub struct GuessRecord {
    pub guess: WordId,
    pub response: Response,
    /// Candidate count after this response was absorbed
    pub remaining: usize,
}

/// Everything a caller learns from one guess
#[derive(Debug, Clone)]
pub struct GuessOutcome {
    pub statuses: Vec<Status>,
    pub response: Response,
    pub remaining: usize,
    pub attempts: usize,
    pub max_attempts: usize,
    pub won: bool,
    pub over: bool,
}

/// A single game against one dictionary
pub struct GameSession {
    matrix: Arc<ResponseMatrix>,
    target: WordId,
    attempts: usize,
    max_attempts: usize,
    strategy: Strategy,
    filter: crate::filter::CandidateFilter,
    filtered: Vec<WordId>,
    history: Vec<GuessRecord>,
    state: GameState,
}

impl GameSession {
    /// Start a game
    ///
    /// An unset target is drawn uniformly from the dictionary; the seed
    /// makes both the draw and any stochastic strategy reproducible.
    ///
    /// # Errors
    /// `LengthMismatch` or `InvalidWord` for an unusable explicit target.
    pub fn new(
        matrix: Arc<ResponseMatrix>,
        strategy: StrategyKind,
        target: Option<&str>,
        seed: Option<u64>,
        max_attempts: usize,
    ) -> Result<Self, EngineError> {
        let store = Arc::clone(matrix.store());
        let target = match target {
            Some(word) => resolve_word(&store, word)?,
            None => rng_from(seed).random_range(0..store.size()),
        };

        Ok(Self {
            filter: crate::filter::CandidateFilter::new(store.word_length()),
            filtered: store.all_ids().collect(),
            strategy: Strategy::new(strategy, seed),
            matrix,
            target,
            attempts: 0,
            max_attempts,
            history: Vec::new(),
            state: GameState::Active,
        })
    }

    /// Submit a guess
    ///
    /// Invalid input is rejected before any state changes, so a rejected
    /// guess never consumes an attempt.
    ///
    /// # Errors
    /// `GameOver` after a terminal state, `MaxAttemptsReached` if the
    /// budget is somehow exhausted while active, `LengthMismatch` and
    /// `InvalidWord` for unusable words.
    pub fn guess(&mut self, word: &str) -> Result<GuessOutcome, EngineError> {
        if self.state != GameState::Active {
            return Err(EngineError::GameOver);
        }
        if self.attempts >= self.max_attempts {
            return Err(EngineError::MaxAttemptsReached);
        }

        let store = Arc::clone(self.matrix.store());
        let gid = resolve_word(&store, word)?;

        let response = self.matrix.pattern(gid, self.target);
        let statuses = response.decode(store.word_length());

        self.attempts += 1;
        self.filter.update(&store.words()[gid], &statuses)?;
        // Monotone constraints: refining the cached view equals reapplying
        // the filter to the whole dictionary
        self.filtered = self.filter.apply(&store, &self.filtered);
        debug_assert!(
            self.filtered.contains(&self.target),
            "target must survive its own response"
        );

        let remaining = self.filtered.len();
        self.history.push(GuessRecord {
            guess: gid,
            response,
            remaining,
        });
        self.strategy.record_guess(gid);

        if response.is_win() {
            self.state = GameState::Won;
        } else if self.attempts >= self.max_attempts {
            self.state = GameState::Lost;
        }

        Ok(GuessOutcome {
            statuses,
            response,
            remaining,
            attempts: self.attempts,
            max_attempts: self.max_attempts,
            won: self.state == GameState::Won,
            over: self.state != GameState::Active,
        })
    }

    /// Ask the active strategy for the next guess
    ///
    /// # Errors
    /// `GameOver` after a terminal state, plus whatever the strategy
    /// surfaces (`EmptyCandidates`, `NoExternalCandidate`).
    pub fn suggest(&mut self) -> Result<WordId, EngineError> {
        if self.state != GameState::Active {
            return Err(EngineError::GameOver);
        }
        let ctx = SelectContext {
            matrix: &self.matrix,
            filtered: &self.filtered,
            first_call: self.history.is_empty(),
            cancel: None,
        };
        self.strategy.select(&ctx)
    }

    /// Swap strategies mid-game
    ///
    /// The filter and history carry over; the incoming strategy re-derives
    /// its view, and a Bellman strategy learns every word already guessed.
    pub fn set_strategy(&mut self, kind: StrategyKind, seed: Option<u64>) {
        let mut strategy = Strategy::new(kind, seed);
        for record in &self.history {
            strategy.record_guess(record.guess);
        }
        self.strategy = strategy;
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Guesses consumed so far
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// The attempt budget
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The active strategy's identifier
    #[must_use]
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// The matrix this session plays against
    #[must_use]
    pub fn matrix(&self) -> &Arc<ResponseMatrix> {
        &self.matrix
    }

    /// The target word's id
    #[must_use]
    pub fn target_id(&self) -> WordId {
        self.target
    }

    /// The target word's text
    #[must_use]
    pub fn target_word(&self) -> &str {
        self.matrix.store().words()[self.target].text()
    }

    /// Ordered guess history
    #[must_use]
    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    /// Number of candidates still consistent with every response
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.filtered.len()
    }

    /// Ids of the remaining candidates
    #[must_use]
    pub fn remaining_ids(&self) -> &[WordId] {
        &self.filtered
    }

    /// Texts of the remaining candidates
    #[must_use]
    pub fn remaining_words(&self) -> Vec<&str> {
        let words = self.matrix.store().words();
        self.filtered.iter().map(|&id| words[id].text()).collect()
    }

    /// Letter statistics over the remaining candidates
    #[must_use]
    pub fn remaining_stats(&self) -> LetterStats {
        let words = self.matrix.store().words();
        LetterStats::compute(
            self.filtered.iter().map(|&id| &words[id]),
            self.matrix.word_length(),
        )
    }
}

fn resolve_word(store: &crate::store::WordStore, word: &str) -> Result<WordId, EngineError> {
    let trimmed = word.trim();
    if trimmed.chars().count() != store.word_length() {
        return Err(EngineError::LengthMismatch {
            expected: store.word_length(),
            actual: trimmed.chars().count(),
        });
    }
    store
        .id_of(trimmed)
        .ok_or_else(|| EngineError::InvalidWord(trimmed.to_lowercase()))
}
