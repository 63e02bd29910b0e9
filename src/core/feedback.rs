//! Guess-vs-target feedback evaluation
//!
//! This is the canonical scorer: the response matrix, the candidate filter
//! and every test scenario are defined in terms of these three passes.
//!
//! 1. Greens: exact position matches consume their target position.
//! 2. Ambers: remaining guess letters consume the first unconsumed target
//!    position holding the same letter, scanning ascending; otherwise Red.
//! 3. Excess: a Red whose letter earned a Green or Amber elsewhere in the
//!    guess is reclassified, marking a duplicate beyond the target's count.

use super::{Status, Word};
use crate::error::EngineError;

/// Evaluate a guess against a target word
///
/// # Errors
/// Returns `LengthMismatch` if the words differ in length.
///
/// # Examples
/// ```
/// use wordle_engine::core::{evaluate, Status, Word};
///
/// let guess = Word::new("betel").unwrap();
/// let target = Word::new("beech").unwrap();
/// let statuses = evaluate(&guess, &target).unwrap();
///
/// // B and E placed, T and L absent, second E elsewhere
/// assert_eq!(
///     statuses,
///     [Status::Green, Status::Green, Status::Red, Status::Amber, Status::Red]
/// );
/// ```
pub fn evaluate(guess: &Word, target: &Word) -> Result<Vec<Status>, EngineError> {
    if guess.len() != target.len() {
        return Err(EngineError::LengthMismatch {
            expected: target.len(),
            actual: guess.len(),
        });
    }
    Ok(score_statuses(guess, target))
}

/// Infallible scorer for words of equal length
///
/// The matrix builder calls this over all N^2 pairs; lengths are guaranteed
/// by the `WordStore`.
pub(crate) fn score_statuses(guess: &Word, target: &Word) -> Vec<Status> {
    let g = guess.bytes();
    let t = target.bytes();
    debug_assert_eq!(g.len(), t.len());
    let len = g.len();

    let mut statuses = vec![Status::Red; len];
    let mut consumed = vec![false; len];

    // Pass 1: greens consume their own target position
    for i in 0..len {
        if g[i] == t[i] {
            statuses[i] = Status::Green;
            consumed[i] = true;
        }
    }

    // Pass 2: ambers consume the first matching unconsumed target position
    for i in 0..len {
        if statuses[i] == Status::Green {
            continue;
        }
        for j in 0..len {
            if !consumed[j] && t[j] == g[i] {
                statuses[i] = Status::Amber;
                consumed[j] = true;
                break;
            }
        }
    }

    // Pass 3: reds whose letter placed elsewhere become excess
    for i in 0..len {
        if statuses[i] != Status::Red {
            continue;
        }
        let placed_elsewhere = (0..len).any(|k| {
            k != i && g[k] == g[i] && matches!(statuses[k], Status::Green | Status::Amber)
        });
        if placed_elsewhere {
            statuses[i] = Status::Excess;
        }
    }

    statuses
}
