//! Analysis runner
//!
//! Plays a complete simulated game against every target in a dictionary
//! (or a seeded random sample) with one strategy, aggregating outcomes
//! incrementally so memory stays bounded regardless of dictionary size.
//! Each finished game is handed to an observer callback; hosts hang
//! progress bars and trace sinks off it.

use crate::config::DEFAULT_MAX_ATTEMPTS;
use crate::core::WordId;
use crate::error::EngineError;
use crate::game::{GameSession, GameState};
use crate::matrix::ResponseMatrix;
use crate::strategy::{StrategyKind, rng_from};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Knobs for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Cap on simulated games; targets are randomly sampled when below the
    /// dictionary size
    pub max_games: Option<usize>,
    /// Attempt budget per game
    pub attempt_budget: usize,
    /// Seed for sampling and per-game strategy determinism
    pub seed: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_games: None,
            attempt_budget: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

/// Outcome of one simulated game
#[derive(Debug, Clone)]
pub struct GameReport {
    pub target: String,
    pub attempts: usize,
    pub won: bool,
    pub guesses: Vec<String>,
}

/// Aggregate results of an analysis run
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub strategy: StrategyKind,
    pub total_games: usize,
    pub wins: usize,
    pub losses: usize,
    /// Fewest attempts among wins (0 when nothing was won)
    pub min_attempts: usize,
    /// Most attempts among wins
    pub max_attempts: usize,
    /// Mean attempts among wins
    pub mean_attempts: f64,
    /// Wins per attempt count, indexed by attempts (slot 0 unused)
    pub attempt_distribution: Vec<usize>,
}

impl AnalysisSummary {
    fn new(strategy: StrategyKind, attempt_budget: usize) -> Self {
        Self {
            strategy,
            total_games: 0,
            wins: 0,
            losses: 0,
            min_attempts: 0,
            max_attempts: 0,
            mean_attempts: 0.0,
            attempt_distribution: vec![0; attempt_budget + 1],
        }
    }

    fn absorb(&mut self, report: &GameReport, total_winning_attempts: &mut usize) {
        self.total_games += 1;
        if report.won {
            self.wins += 1;
            *total_winning_attempts += report.attempts;
            self.attempt_distribution[report.attempts] += 1;
            if self.min_attempts == 0 || report.attempts < self.min_attempts {
                self.min_attempts = report.attempts;
            }
            if report.attempts > self.max_attempts {
                self.max_attempts = report.attempts;
            }
            self.mean_attempts = *total_winning_attempts as f64 / self.wins as f64;
        } else {
            self.losses += 1;
        }
    }

    /// Wins over total games, in [0, 1]
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.wins as f64 / self.total_games as f64
    }
}

/// Play every (sampled) target to completion with the given strategy
///
/// The cancellation flag is checked between games; on cancellation the
/// summary of the games already completed is returned.
///
/// # Errors
/// Propagates session and strategy errors (`EmptyCandidates`,
/// `NoExternalCandidate`); these indicate an inconsistent dictionary or a
/// strategy that cannot finish a game under the budget.
pub fn run_analysis(
    matrix: &Arc<ResponseMatrix>,
    strategy: StrategyKind,
    options: &AnalysisOptions,
    cancel: Option<&AtomicBool>,
    mut on_game: impl FnMut(&GameReport),
) -> Result<AnalysisSummary, EngineError> {
    let store = Arc::clone(matrix.store());
    let targets = sample_targets(store.size(), options);

    let mut summary = AnalysisSummary::new(strategy, options.attempt_budget);
    let mut total_winning_attempts = 0usize;

    for (game_index, &target) in targets.iter().enumerate() {
        if let Some(flag) = cancel
            && flag.load(Ordering::Relaxed)
        {
            break;
        }

        let target_text = store.words()[target].text().to_string();
        let game_seed = options.seed.map(|s| s.wrapping_add(game_index as u64));
        let mut session = GameSession::new(
            Arc::clone(matrix),
            strategy,
            Some(&target_text),
            game_seed,
            options.attempt_budget,
        )?;

        let mut guesses = Vec::with_capacity(options.attempt_budget);
        let mut won = false;
        while session.state() == GameState::Active {
            let gid = session.suggest()?;
            let word = store.words()[gid].text().to_string();
            let outcome = session.guess(&word)?;
            guesses.push(word);
            won = outcome.won;
        }

        let report = GameReport {
            target: target_text,
            attempts: session.attempts(),
            won,
            guesses,
        };
        summary.absorb(&report, &mut total_winning_attempts);
        on_game(&report);
    }

    Ok(summary)
}

fn sample_targets(size: usize, options: &AnalysisOptions) -> Vec<WordId> {
    match options.max_games {
        Some(cap) if cap < size => {
            let mut rng = rng_from(options.seed);
            let mut picked = rand::seq::index::sample(&mut rng, size, cap).into_vec();
            picked.sort_unstable();
            picked
        }
        _ => (0..size).collect(),
    }
}
