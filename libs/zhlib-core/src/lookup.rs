//! Exact lookup of a query string across all entity kinds.

use crate::error::Result;
use crate::store::DictionaryStore;
use crate::types::{Character, Sentence, Word};
use serde::Serialize;

/// Entries matching a query. Empty categories are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub characters: Vec<Character>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sentences: Vec<Sentence>,
}

impl LookupResult {
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.words.is_empty() && self.sentences.is_empty()
    }
}

/// A single character is looked up as a character, anything longer as a
/// sentence; both are also looked up as a word.
pub fn lookup<S>(store: &S, query: &str) -> Result<LookupResult>
where
    S: DictionaryStore + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(LookupResult::default());
    }

    let mut result = LookupResult::default();
    if query.chars().count() == 1 {
        result.characters.extend(store.get_character(query)?);
    } else {
        result.sentences = store.find_sentence(query)?;
    }
    result.words = store.find_word(query)?;

    Ok(result)
}
