//! Dictionary registry
//!
//! One explicit, process-wide handle mapping dictionary ids to their shared
//! word store and response matrix. Built once at startup from configuration
//! and never mutated afterwards, so lookups need no synchronization and
//! exactly one matrix exists per dictionary.

use crate::config::{DictionaryConfig, WordSource};
use crate::error::EngineError;
use crate::matrix::ResponseMatrix;
use crate::store::WordStore;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Host-facing description of a registered dictionary
#[derive(Debug, Clone)]
pub struct DictionaryMeta {
    pub id: String,
    pub word_length: usize,
    pub name: String,
    pub description: String,
}

/// A loaded dictionary with its precomputed matrix
pub struct DictionaryEntry {
    pub meta: DictionaryMeta,
    pub store: Arc<WordStore>,
    pub matrix: Arc<ResponseMatrix>,
}

/// Immutable id-to-dictionary map
pub struct DictionaryRegistry {
    entries: FxHashMap<String, Arc<DictionaryEntry>>,
    order: Vec<String>,
}

impl DictionaryRegistry {
    /// Load every configured dictionary and build its matrix
    ///
    /// # Errors
    /// Any load failure (`SourceUnreadable`, `EmptyDictionary`,
    /// `UnsupportedWordLength`) aborts the build.
    pub fn build(configs: &[DictionaryConfig]) -> Result<Self, EngineError> {
        let mut entries = FxHashMap::default();
        let mut order = Vec::with_capacity(configs.len());

        for config in configs {
            let store = match &config.source {
                WordSource::File(path) => WordStore::load(path, config.word_length)?,
                WordSource::Builtin(text) => WordStore::from_lines(text, config.word_length)?,
            };
            let store = Arc::new(store);
            let matrix = Arc::new(ResponseMatrix::build(Arc::clone(&store)));

            let entry = DictionaryEntry {
                meta: DictionaryMeta {
                    id: config.id.clone(),
                    word_length: config.word_length,
                    name: config.name.clone(),
                    description: config.description.clone(),
                },
                store,
                matrix,
            };
            if entries.insert(config.id.clone(), Arc::new(entry)).is_none() {
                order.push(config.id.clone());
            }
        }

        Ok(Self { entries, order })
    }

    /// A registry holding only the bundled default dictionary
    ///
    /// # Errors
    /// Cannot fail in practice; the bundled list is validated by tests.
    pub fn with_default() -> Result<Self, EngineError> {
        Self::build(&[DictionaryConfig::classic_five()])
    }

    /// Look up a dictionary by id
    ///
    /// # Errors
    /// `UnknownDictionary` for an unregistered id.
    pub fn get(&self, id: &str) -> Result<&Arc<DictionaryEntry>, EngineError> {
        self.entries
            .get(id)
            .ok_or_else(|| EngineError::UnknownDictionary(id.to_string()))
    }

    /// All registered dictionaries, in registration order
    #[must_use]
    pub fn list(&self) -> Vec<&DictionaryMeta> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| &entry.meta))
            .collect()
    }

    /// Number of registered dictionaries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
