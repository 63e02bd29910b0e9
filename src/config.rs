//! Engine configuration
//!
//! Enumerated options with their defaults, plus per-dictionary definitions.
//! Parsing configuration files is a host concern; the engine deals only in
//! these native values.

use std::path::PathBuf;

use crate::wordlists;

/// Terminal attempt budget per game
pub const DEFAULT_MAX_ATTEMPTS: usize = 6;

/// Default word length for dictionary-unspecified games
pub const DEFAULT_WORD_LENGTH: usize = 5;

/// Shortest supported word length
pub const MIN_WORD_LENGTH: usize = 4;

/// Longest supported word length; 2 bits per position must fit a u16 pattern
pub const MAX_WORD_LENGTH: usize = 8;

/// Check whether a word length is inside the supported range
#[must_use]
pub const fn is_supported_word_length(len: usize) -> bool {
    len >= MIN_WORD_LENGTH && len <= MAX_WORD_LENGTH
}

/// Where a dictionary's words come from
#[derive(Debug, Clone)]
pub enum WordSource {
    /// Line-delimited word list on the filesystem
    File(PathBuf),
    /// Line-delimited word list bundled into the binary
    Builtin(&'static str),
}

/// Definition of one loadable dictionary
#[derive(Debug, Clone)]
pub struct DictionaryConfig {
    pub id: String,
    pub source: WordSource,
    pub word_length: usize,
    pub name: String,
    pub description: String,
}

impl DictionaryConfig {
    /// The bundled default dictionary of common five-letter words
    #[must_use]
    pub fn classic_five() -> Self {
        Self {
            id: wordlists::CLASSIC_FIVE_ID.to_string(),
            source: WordSource::Builtin(wordlists::CLASSIC_FIVE),
            word_length: DEFAULT_WORD_LENGTH,
            name: "Classic".to_string(),
            description: "Common five-letter English words".to_string(),
        }
    }

    /// A dictionary backed by a file on disk
    #[must_use]
    pub fn from_file(id: impl Into<String>, path: PathBuf, word_length: usize) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            description: format!("Word list loaded from {}", path.display()),
            id,
            source: WordSource::File(path),
            word_length,
        }
    }
}
