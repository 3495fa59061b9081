#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use zhlib_cli::commands::Context;
use zhlib_cli::db::SqliteStore;
use zhlib_core::{EmptyCorpus, FrequencyCorpus, FrequencyTable, Segmenter, LANGUAGE};

/// Loading the jieba dictionary is slow; share one segmenter per test binary.
pub fn segmenter() -> Arc<Segmenter> {
    static SEGMENTER: OnceLock<Arc<Segmenter>> = OnceLock::new();
    SEGMENTER.get_or_init(|| Arc::new(Segmenter::new())).clone()
}

pub fn store() -> SqliteStore {
    SqliteStore::open_in_memory(segmenter()).unwrap()
}

pub fn context() -> Context {
    Context::with_store(store(), Box::new(EmptyCorpus), 10)
}

pub fn context_with_corpus(entries: &[(&str, f64)]) -> Context {
    let mut table = FrequencyTable::new(LANGUAGE);
    for (word, frequency) in entries {
        table.insert(*word, *frequency);
    }
    let corpus: Box<dyn FrequencyCorpus> = Box::new(table);
    Context::with_store(store(), corpus, 10)
}
