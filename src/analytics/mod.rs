//! Dictionary analytics
//!
//! Letter-frequency and positional-frequency statistics over a word set,
//! computed in one O(N*L) pass. Feeds the Most-Common-Letters strategy and
//! UI-facing metrics.

use crate::core::Word;

/// Letter counts for a word set, total and per position
#[derive(Debug, Clone)]
pub struct LetterStats {
    word_length: usize,
    totals: [u32; 26],
    positional: Vec<[u32; 26]>,
}

impl LetterStats {
    /// Count letters across the given words
    pub fn compute<'a, I>(words: I, word_length: usize) -> Self
    where
        I: IntoIterator<Item = &'a Word>,
    {
        let mut totals = [0u32; 26];
        let mut positional = vec![[0u32; 26]; word_length];

        for word in words {
            for (pos, &letter) in word.bytes().iter().enumerate() {
                let idx = usize::from(letter - b'a');
                totals[idx] += 1;
                positional[pos][idx] += 1;
            }
        }

        Self {
            word_length,
            totals,
            positional,
        }
    }

    /// The word length these statistics describe
    #[inline]
    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Total occurrences of a letter across all words and positions
    #[must_use]
    pub fn total(&self, letter: u8) -> u32 {
        self.totals[usize::from(letter - b'a')]
    }

    /// Occurrences of a letter at one position
    #[must_use]
    pub fn positional(&self, pos: usize, letter: u8) -> u32 {
        self.positional[pos][usize::from(letter - b'a')]
    }

    /// The most frequent letter at each position (alphabetical on ties)
    #[must_use]
    pub fn most_frequent_by_position(&self) -> Vec<u8> {
        self.positional
            .iter()
            .map(|counts| {
                let mut best = 0usize;
                for idx in 1..26 {
                    if counts[idx] > counts[best] {
                        best = idx;
                    }
                }
                b'a' + best as u8
            })
            .collect()
    }

    /// The least frequent letter at each position among letters that occur
    /// there at all (alphabetical on ties; `a` if the set was empty)
    #[must_use]
    pub fn least_frequent_by_position(&self) -> Vec<u8> {
        self.positional
            .iter()
            .map(|counts| {
                let mut best: Option<usize> = None;
                for (idx, &count) in counts.iter().enumerate() {
                    if count == 0 {
                        continue;
                    }
                    match best {
                        Some(b) if counts[b] <= count => {}
                        _ => best = Some(idx),
                    }
                }
                b'a' + best.unwrap_or(0) as u8
            })
            .collect()
    }

    /// All letters ranked by total count, descending; alphabetical on ties
    #[must_use]
    pub fn ranked_letters(&self) -> Vec<(u8, u32)> {
        let mut ranked: Vec<(u8, u32)> = (0..26u8)
            .map(|idx| (b'a' + idx, self.totals[usize::from(idx)]))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}
