//! Commands run by the `zhlib` binary.
//!
//! Each command takes a [`Context`] and returns a serializable report; the
//! binary prints it as JSON.

pub mod classify;
pub mod edit;
pub mod import;
pub mod lookup;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use zhlib_core::{
    DecompositionSource, DecompositionTable, EmptyCorpus, FrequencyCorpus, FrequencyTable,
    LevelEngine, MemoTable, Segmenter, LANGUAGE,
};

use crate::config::Config;
use crate::db::SqliteStore;

pub use classify::{classify, CharacterReport, ClassifyOptions, ClassifyReport, WordReport};
pub use edit::{add_character, add_sentence, add_word, tag, EntryKind, TagReport, Tagged};
pub use import::import_ranks;
pub use lookup::lookup;

/// Store and reference data shared by every command.
pub struct Context {
    pub store: SqliteStore,
    pub corpus: Box<dyn FrequencyCorpus>,
    pub decompositions: Option<MemoTable<DecompositionTable>>,
    pub link_limit: usize,
}

impl Context {
    /// Open the store and load the reference tables named by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(parent) = config.database.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let segmenter = Arc::new(Segmenter::new());
        let store = SqliteStore::open(&config.database, segmenter).with_context(|| {
            format!("failed to open dictionary at {}", config.database.display())
        })?;

        let corpus: Box<dyn FrequencyCorpus> = match &config.frequency_table {
            Some(path) => {
                let table = FrequencyTable::from_path(LANGUAGE, path).with_context(|| {
                    format!("failed to load frequency table {}", path.display())
                })?;
                tracing::info!(entries = table.len(), "loaded frequency table");
                Box::new(table)
            }
            None => Box::new(EmptyCorpus),
        };

        let decompositions = match &config.decompositions {
            Some(path) => {
                let table = DecompositionTable::from_path(path).with_context(|| {
                    format!("failed to load decomposition table {}", path.display())
                })?;
                Some(MemoTable::new(table, config.cache_capacity))
            }
            None => None,
        };

        Ok(Self {
            store,
            corpus,
            decompositions,
            link_limit: config.link_limit,
        })
    }

    /// Context over an already open store with no reference tables.
    pub fn with_store(store: SqliteStore, corpus: Box<dyn FrequencyCorpus>, link_limit: usize) -> Self {
        Self {
            store,
            corpus,
            decompositions: None,
            link_limit,
        }
    }

    pub fn engine(&self) -> LevelEngine<'_, SqliteStore, dyn FrequencyCorpus> {
        let engine = LevelEngine::new(&self.store, self.store.segmenter(), self.corpus.as_ref());
        match &self.decompositions {
            Some(table) => engine.with_decompositions(table as &dyn DecompositionSource),
            None => engine,
        }
    }
}
