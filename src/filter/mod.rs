//! Candidate filter
//!
//! Accumulates the constraints implied by each response and prunes the
//! dictionary to the words still consistent with everything seen. The
//! filter is monotone: absorbing a response never relaxes a constraint, so
//! a refined view can be refined again without consulting the full
//! dictionary.
//!
//! Per-letter requirements are counts, not sets: a Green and an Amber of
//! the same letter in one response prove the target holds at least two of
//! it, and an Excess pins the count exactly. The evaluator is the only
//! producer of Excess; the filter consumes it purely as a count signal.

use crate::core::{Status, Word, WordId};
use crate::error::EngineError;
use crate::store::WordStore;

#[inline]
const fn letter_index(letter: u8) -> usize {
    (letter - b'a') as usize
}

#[inline]
const fn letter_bit(letter: u8) -> u32 {
    1 << (letter - b'a')
}

/// Accumulated per-position and per-letter constraints
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    word_length: usize,
    /// Exact required letter per position, where known
    fixed: Vec<Option<u8>>,
    /// 26-bit mask of letters proven absent at each position
    forbidden: Vec<u32>,
    /// Minimum required occurrences per letter
    min_count: [u8; 26],
    /// Exact required occurrences per letter, once an excess was seen
    exact_count: [Option<u8>; 26],
}

impl CandidateFilter {
    /// An unconstrained filter for the given word length
    #[must_use]
    pub fn new(word_length: usize) -> Self {
        Self {
            word_length,
            fixed: vec![None; word_length],
            forbidden: vec![0; word_length],
            min_count: [0; 26],
            exact_count: [None; 26],
        }
    }

    /// Fold one guess and its response into the constraints
    ///
    /// # Errors
    /// `LengthMismatch` if the guess or status sequence length differs from
    /// the filter's word length.
    pub fn update(&mut self, guess: &Word, statuses: &[Status]) -> Result<(), EngineError> {
        if guess.len() != self.word_length {
            return Err(EngineError::LengthMismatch {
                expected: self.word_length,
                actual: guess.len(),
            });
        }
        if statuses.len() != self.word_length {
            return Err(EngineError::LengthMismatch {
                expected: self.word_length,
                actual: statuses.len(),
            });
        }

        let letters = guess.bytes();

        // Placed (Green or Amber) occurrences per letter in this response
        let mut tally = [0u8; 26];
        for (&letter, &status) in letters.iter().zip(statuses) {
            if matches!(status, Status::Green | Status::Amber) {
                tally[letter_index(letter)] += 1;
            }
        }

        for (pos, (&letter, &status)) in letters.iter().zip(statuses).enumerate() {
            let idx = letter_index(letter);
            match status {
                Status::Green => {
                    self.fixed[pos] = Some(letter);
                }
                Status::Amber => {
                    self.forbidden[pos] |= letter_bit(letter);
                }
                Status::Red => {
                    if tally[idx] == 0 {
                        // Letter entirely absent from the target
                        for mask in &mut self.forbidden {
                            *mask |= letter_bit(letter);
                        }
                    } else {
                        // A foreign evaluator that never emits Excess marks
                        // surplus duplicates Red; treat it as Excess
                        self.forbidden[pos] |= letter_bit(letter);
                        self.exact_count[idx] = Some(tally[idx]);
                    }
                }
                Status::Excess => {
                    self.forbidden[pos] |= letter_bit(letter);
                    self.exact_count[idx] = Some(tally[idx]);
                }
            }
        }

        for idx in 0..26 {
            if tally[idx] > self.min_count[idx] {
                self.min_count[idx] = tally[idx];
            }
        }

        Ok(())
    }

    /// Whether a word satisfies every accumulated constraint
    #[must_use]
    pub fn matches(&self, word: &Word) -> bool {
        let letters = word.bytes();
        if letters.len() != self.word_length {
            return false;
        }

        for (pos, &letter) in letters.iter().enumerate() {
            if let Some(required) = self.fixed[pos]
                && letter != required
            {
                return false;
            }
            if self.forbidden[pos] & letter_bit(letter) != 0 {
                return false;
            }
        }

        let counts = word.letter_counts();
        for idx in 0..26 {
            if counts[idx] < self.min_count[idx] {
                return false;
            }
            if let Some(exact) = self.exact_count[idx]
                && counts[idx] != exact
            {
                return false;
            }
        }

        true
    }

    /// Prune a set of word ids to those satisfying the constraints
    #[must_use]
    pub fn apply(&self, store: &WordStore, ids: &[WordId]) -> Vec<WordId> {
        ids.iter()
            .copied()
            .filter(|&id| self.matches(&store.words()[id]))
            .collect()
    }

    /// Minimum required count for a letter
    #[must_use]
    pub fn min_count_of(&self, letter: u8) -> u8 {
        self.min_count[letter_index(letter)]
    }

    /// Exact required count for a letter, if pinned by an excess
    #[must_use]
    pub fn exact_count_of(&self, letter: u8) -> Option<u8> {
        self.exact_count[letter_index(letter)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::evaluate;

    fn filter_after(guess: &str, target: &str) -> CandidateFilter {
        let guess = Word::new(guess).unwrap();
        let target = Word::new(target).unwrap();
        let statuses = evaluate(&guess, &target).unwrap();
        let mut filter = CandidateFilter::new(guess.len());
        filter.update(&guess, &statuses).unwrap();
        filter
    }

    fn admits(filter: &CandidateFilter, word: &str) -> bool {
        filter.matches(&Word::new(word).unwrap())
    }

    #[test]
    fn fresh_filter_admits_everything() {
        let filter = CandidateFilter::new(5);
        for word in ["crane", "slate", "zzzzz"] {
            assert!(admits(&filter, word));
        }
    }

    #[test]
    fn target_always_survives_its_own_response() {
        let pairs = [
            ("crane", "slate"),
            ("betel", "beech"),
            ("furor", "mourn"),
            ("salsa", "pansy"),
            ("study", "mucus"),
            ("geese", "eagle"),
            ("aaaaa", "abaca"),
        ];
        for (guess, target) in pairs {
            let filter = filter_after(guess, target);
            assert!(admits(&filter, target), "{guess} vs {target}");
        }
    }

    #[test]
    fn beech_betel_scenario() {
        // GGRAR: fixed B and E, T and L absent, a second E required but not
        // at position 3
        let filter = filter_after("betel", "beech");

        assert!(admits(&filter, "beech"));
        assert!(admits(&filter, "beige"));
        assert!(!admits(&filter, "begin"), "only one E");
        assert!(!admits(&filter, "beret"), "E forbidden at position 3");
        assert_eq!(filter.min_count_of(b'e'), 2);
        assert_eq!(filter.exact_count_of(b'e'), None);
    }

    #[test]
    fn mourn_furor_scenario() {
        // RAAAX: F absent everywhere; U, R, O present but displaced; the
        // second R is excess, pinning the R count to exactly one
        let filter = filter_after("furor", "mourn");

        assert!(admits(&filter, "mourn"));
        assert!(!admits(&filter, "furor"), "two Rs but target has one");
        assert!(!admits(&filter, "flour"), "contains F");
        assert_eq!(filter.exact_count_of(b'r'), Some(1));
        assert_eq!(filter.min_count_of(b'u'), 1);
        assert_eq!(filter.min_count_of(b'o'), 1);
    }

    #[test]
    fn pansy_salsa_scenario() {
        // XGRGX: A and S fixed by greens; the duplicate S and A are excess,
        // pinning both counts to exactly one; L absent
        let filter = filter_after("salsa", "pansy");

        assert!(admits(&filter, "pansy"));
        assert!(!admits(&filter, "salsa"), "duplicate S and A");
        assert!(!admits(&filter, "sassy"), "S count exceeds one");
        assert_eq!(filter.exact_count_of(b's'), Some(1));
        assert_eq!(filter.exact_count_of(b'a'), Some(1));
    }

    #[test]
    fn mucus_study_scenario() {
        // ARARR: S and U displaced, T/D/Y absent
        let filter = filter_after("study", "mucus");

        assert!(admits(&filter, "mucus"));
        assert!(!admits(&filter, "study"), "S forbidden at position 0");
        assert!(!admits(&filter, "usurp"), "U forbidden at position 2");
        assert!(!admits(&filter, "crumb"), "missing S");
    }

    #[test]
    fn jerky_scenario() {
        // All five letters absent: every position forbids all of them
        let filter = filter_after("jerky", "stoic");

        assert!(admits(&filter, "stoic"));
        assert!(!admits(&filter, "jumbo"), "contains J");
        assert!(!admits(&filter, "corny"), "contains R and Y");
        assert!(!admits(&filter, "enact"), "contains E");
    }

    #[test]
    fn green_pins_position() {
        let filter = filter_after("crane", "crane");
        assert!(admits(&filter, "crane"));
        assert!(!admits(&filter, "slate"));
    }

    #[test]
    fn amber_forbids_position_but_requires_letter() {
        // CRANE vs RACER: C, R, A, E all displaced, N absent
        let filter = filter_after("crane", "racer");

        assert!(admits(&filter, "racer"));
        assert!(!admits(&filter, "crate"), "C stays at position 0");
        assert!(!admits(&filter, "tiger"), "missing A and C");
    }

    #[test]
    fn filtering_is_monotone() {
        let guesses = ["crane", "slate", "mourn"];
        let target = Word::new("stare").unwrap();
        let pool = [
            "crane", "slate", "stare", "arose", "raise", "mourn", "least", "trace",
        ];
        let words: Vec<Word> = pool.iter().map(|w| Word::new(*w).unwrap()).collect();

        let mut filter = CandidateFilter::new(5);
        let mut previous = words.len();
        for guess in guesses {
            let guess = Word::new(guess).unwrap();
            let statuses = evaluate(&guess, &target).unwrap();
            filter.update(&guess, &statuses).unwrap();

            let surviving = words.iter().filter(|w| filter.matches(w)).count();
            assert!(surviving <= previous, "constraints never relax");
            previous = surviving;
            assert!(filter.matches(&target));
        }
    }

    #[test]
    fn apply_prunes_store_ids() {
        let store =
            WordStore::from_lines("crane\nslate\nstare\narose\nraise\nleast\n", 5).unwrap();
        let target = store.words()[store.id_of("stare").unwrap()].clone();
        let guess = store.words()[store.id_of("crane").unwrap()].clone();

        let mut filter = CandidateFilter::new(5);
        let statuses = evaluate(&guess, &target).unwrap();
        filter.update(&guess, &statuses).unwrap();

        let all: Vec<WordId> = store.all_ids().collect();
        let remaining = filter.apply(&store, &all);
        assert!(remaining.contains(&store.id_of("stare").unwrap()));
        assert!(!remaining.contains(&store.id_of("crane").unwrap()));
        assert!(remaining.len() < all.len());
    }

    #[test]
    fn update_rejects_wrong_lengths() {
        let mut filter = CandidateFilter::new(5);
        let guess = Word::new("wasp").unwrap();
        assert!(matches!(
            filter.update(&guess, &[Status::Red; 4]),
            Err(EngineError::LengthMismatch { expected: 5, actual: 4 })
        ));

        let guess = Word::new("crane").unwrap();
        assert!(matches!(
            filter.update(&guess, &[Status::Red; 4]),
            Err(EngineError::LengthMismatch { expected: 5, actual: 4 })
        ));
    }

    #[test]
    fn implicit_excess_from_foreign_red() {
        // A response stream that never uses Excess: FUROR vs MOURN with the
        // second R reported Red instead. The filter must still learn the
        // exact R count instead of banning R outright.
        let guess = Word::new("furor").unwrap();
        let statuses = [
            Status::Red,
            Status::Amber,
            Status::Amber,
            Status::Amber,
            Status::Red,
        ];
        let mut filter = CandidateFilter::new(5);
        filter.update(&guess, &statuses).unwrap();

        assert!(admits(&filter, "mourn"));
        assert_eq!(filter.exact_count_of(b'r'), Some(1));
    }

    #[test]
    fn wrong_length_word_never_matches() {
        let filter = CandidateFilter::new(5);
        assert!(!filter.matches(&Word::new("wasp").unwrap()));
    }
}
