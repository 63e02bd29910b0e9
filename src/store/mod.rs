//! Word store
//!
//! Loads a line-delimited word source, normalizes it, and assigns stable
//! integer ids. Lines of the wrong length or with non-alphabetic characters
//! are dropped; survivors are lowercased, deduplicated, and sorted, with ids
//! 0..N-1 assigned in sort order. Immutable once built.

use crate::config::is_supported_word_length;
use crate::core::{Word, WordId};
use crate::error::EngineError;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An immutable, indexed dictionary of fixed-length words
#[derive(Debug)]
pub struct WordStore {
    word_length: usize,
    words: Vec<Word>,
    index: FxHashMap<String, WordId>,
}

impl WordStore {
    /// Build a store from a line-delimited reader
    ///
    /// # Errors
    /// `UnsupportedWordLength` for a length outside 4..=8,
    /// `SourceUnreadable` if the stream errors, `EmptyDictionary` if no
    /// usable words of the requested length survive normalization.
    pub fn read<R: BufRead>(reader: R, word_length: usize) -> Result<Self, EngineError> {
        if !is_supported_word_length(word_length) {
            return Err(EngineError::UnsupportedWordLength(word_length));
        }

        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if let Ok(word) = Word::new(line)
                && word.len() == word_length
            {
                words.push(word);
            }
        }

        Self::from_words(words, word_length)
    }

    /// Build a store from an in-memory line-delimited string
    ///
    /// # Errors
    /// As [`WordStore::read`], minus the I/O failure case.
    pub fn from_lines(text: &str, word_length: usize) -> Result<Self, EngineError> {
        if !is_supported_word_length(word_length) {
            return Err(EngineError::UnsupportedWordLength(word_length));
        }

        let words = text
            .lines()
            .filter_map(|line| Word::new(line).ok())
            .filter(|word| word.len() == word_length)
            .collect();

        Self::from_words(words, word_length)
    }

    /// Build a store from a word list file
    ///
    /// # Errors
    /// As [`WordStore::read`]; a missing or unreadable file is
    /// `SourceUnreadable`.
    pub fn load<P: AsRef<Path>>(path: P, word_length: usize) -> Result<Self, EngineError> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), word_length)
    }

    fn from_words(mut words: Vec<Word>, word_length: usize) -> Result<Self, EngineError> {
        words.sort();
        words.dedup();

        if words.is_empty() {
            return Err(EngineError::EmptyDictionary(word_length));
        }

        let index = words
            .iter()
            .enumerate()
            .map(|(id, word)| (word.text().to_string(), id))
            .collect();

        Ok(Self {
            word_length,
            words,
            index,
        })
    }

    /// Number of words in the store
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.words.len()
    }

    /// The fixed word length of this store
    #[inline]
    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Look up a word's id; lookup is case-insensitive
    #[must_use]
    pub fn id_of(&self, word: &str) -> Option<WordId> {
        let normalized = word.trim().to_lowercase();
        self.index.get(&normalized).copied()
    }

    /// Resolve an id to its word
    ///
    /// # Errors
    /// `UnknownWordId` for an id outside 0..N-1.
    pub fn word(&self, id: WordId) -> Result<&Word, EngineError> {
        self.words.get(id).ok_or(EngineError::UnknownWordId(id))
    }

    /// All words in id order
    #[inline]
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Iterator over every id in the store
    #[must_use]
    pub fn all_ids(&self) -> std::ops::Range<WordId> {
        0..self.words.len()
    }
}
