//! Most-Common-Letters strategy
//!
//! Ranks letters by total frequency across the remaining candidates, then
//! narrows to words containing all of the top three letters, backing off to
//! the top two and the top one when the intersection is empty. The final
//! tie among qualifying words is broken at random.

use super::SelectContext;
use crate::analytics::LetterStats;
use crate::core::WordId;
use crate::strategy::rng_from;
use rand::Rng;
use rand::rngs::StdRng;

pub struct CommonLettersStrategy {
    rng: StdRng,
}

impl CommonLettersStrategy {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: rng_from(seed),
        }
    }

    pub(super) fn select(&mut self, ctx: &SelectContext<'_>) -> WordId {
        let store = ctx.matrix.store();
        let words = store.words();
        let stats = LetterStats::compute(
            ctx.filtered.iter().map(|&id| &words[id]),
            store.word_length(),
        );
        let ranked = stats.ranked_letters();

        for take in (1..=3usize).rev() {
            let top: Vec<u8> = ranked
                .iter()
                .take(take)
                .filter(|&&(_, count)| count > 0)
                .map(|&(letter, _)| letter)
                .collect();
            if top.is_empty() {
                break;
            }

            let qualifying: Vec<WordId> = ctx
                .filtered
                .iter()
                .copied()
                .filter(|&id| top.iter().all(|&letter| words[id].has_letter(letter)))
                .collect();
            if !qualifying.is_empty() {
                return qualifying[self.rng.random_range(0..qualifying.len())];
            }
        }

        ctx.filtered[self.rng.random_range(0..ctx.filtered.len())]
    }
}
