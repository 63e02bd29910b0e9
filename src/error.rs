//! Engine error type
//!
//! Every fallible surface operation of the engine reports one of these kinds.

use std::io;
use thiserror::Error;

/// Errors produced by the solver engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Guess word length does not match the dictionary word length
    #[error("word length {actual} does not match dictionary word length {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Word is well-formed but not present in the dictionary
    #[error("word '{0}' is not in the dictionary")]
    InvalidWord(String),

    /// Guess submitted after the game reached a terminal state
    #[error("game is already over")]
    GameOver,

    /// Attempt budget exhausted
    #[error("maximum number of attempts reached")]
    MaxAttemptsReached,

    /// The filter eliminated every word; indicates inconsistent input
    #[error("no candidate words remain")]
    EmptyCandidates,

    /// Internal word id outside 0..N-1
    #[error("word id {0} is out of range")]
    UnknownWordId(usize),

    /// The Bellman strategy has exhausted words outside the candidate set
    #[error("no unguessed word remains outside the candidate set")]
    NoExternalCandidate,

    /// Word list I/O failure at load time
    #[error("failed to read word list: {0}")]
    SourceUnreadable(#[from] io::Error),

    /// A word source yielded no usable words of the requested length
    #[error("dictionary contains no words of length {0}")]
    EmptyDictionary(usize),

    /// Requested word length outside the supported range
    #[error("word length {0} is outside the supported range 4..=8")]
    UnsupportedWordLength(usize),

    /// Strategy identifier outside the closed set
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    /// Dictionary identifier not present in the registry
    #[error("unknown dictionary '{0}'")]
    UnknownDictionary(String),
}
