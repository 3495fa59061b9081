//! Level engine: turns a block of text into ranked character and word
//! lists, each entry carrying its difficulty tier.

use crate::decomposition::{Decomposition, DecompositionSource};
use crate::error::Result;
use crate::rank::{FrequencyCorpus, RankResolver};
use crate::segmenter::Segmenter;
use crate::store::DictionaryStore;
use crate::tier::{character_tier, word_tier, Tier};
use crate::types::{Character, EntityKind, EntityRef, Record, Sentence, Tag, Word};
use serde::Serialize;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// A character found in the text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterLevel {
    pub rank: Option<u32>,
    pub tier: Tier,
    pub record: Record<Character>,
}

/// A word found in the text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordLevel {
    pub frequency: f64,
    pub tier: Tier,
    pub record: Record<Word>,
}

/// Result of classifying a text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    /// Ascending rank; unknown ranks last.
    pub characters: Vec<CharacterLevel>,
    /// Descending frequency.
    pub words: Vec<WordLevel>,
}

impl Classification {
    /// Keep characters whose rank lies in `ranks` (unknown rank counts as
    /// infinity) and words whose frequency lies in `frequencies`.
    pub fn within(mut self, ranks: RangeInclusive<f64>, frequencies: RangeInclusive<f64>) -> Self {
        self.characters.retain(|c| {
            let rank = c.rank.map(f64::from).unwrap_or(f64::INFINITY);
            ranks.contains(&rank)
        });
        self.words.retain(|w| frequencies.contains(&w.frequency));
        self
    }
}

/// A record whose related words and sentences can be looked up.
pub trait Linkable {
    /// Forms searched for by substring containment.
    fn search_forms(&self) -> Vec<&str>;
    /// Stored entity, if any.
    fn linked_entity(&self) -> Option<EntityRef>;
    /// Whether `word` is this record itself.
    fn is_itself(&self, word: &Word) -> bool;
}

impl Linkable for Record<Character> {
    fn search_forms(&self) -> Vec<&str> {
        vec![self.key()]
    }

    fn linked_entity(&self) -> Option<EntityRef> {
        self.entity()
    }

    fn is_itself(&self, _word: &Word) -> bool {
        false
    }
}

impl Linkable for Record<Word> {
    fn search_forms(&self) -> Vec<&str> {
        match self {
            Record::Found { entry } => entry.forms(),
            Record::Stub { key } => vec![key.as_str()],
        }
    }

    fn linked_entity(&self) -> Option<EntityRef> {
        self.entity()
    }

    fn is_itself(&self, word: &Word) -> bool {
        match self {
            Record::Found { entry } => entry.id == word.id,
            Record::Stub { key } => word.simplified == *key,
        }
    }
}

/// Orchestrates segmentation, dictionary lookup, rank resolution and tier
/// assignment.
pub struct LevelEngine<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    segmenter: &'a Segmenter,
    resolver: RankResolver<'a, S, C>,
    decompositions: Option<&'a dyn DecompositionSource>,
}

impl<'a, S, C> LevelEngine<'a, S, C>
where
    S: DictionaryStore + ?Sized,
    C: FrequencyCorpus + ?Sized,
{
    pub fn new(store: &'a S, segmenter: &'a Segmenter, corpus: &'a C) -> Self {
        Self {
            store,
            segmenter,
            resolver: RankResolver::new(store, corpus),
            decompositions: None,
        }
    }

    /// Attach a decomposition source for character records.
    pub fn with_decompositions(mut self, source: &'a dyn DecompositionSource) -> Self {
        self.decompositions = Some(source);
        self
    }

    pub fn resolver(&self) -> &RankResolver<'a, S, C> {
        &self.resolver
    }

    /// Classify every character and word in `text`.
    ///
    /// Unknown text never fails; only a store failure does.
    pub fn classify(&self, text: &str) -> Result<Classification> {
        let mut characters = Vec::new();
        for glyph in self.segmenter.characters(text) {
            let (rank, entry) = self.resolver.character(&glyph)?;
            characters.push(CharacterLevel {
                rank,
                tier: character_tier(rank),
                record: Record::found_or_stub(entry, &glyph),
            });
        }

        let mut words = Vec::new();
        let mut seen = HashSet::new();
        for token in self.segmenter.words(text) {
            let entry = self.store.find_word(&token)?.into_iter().next();
            if let Some(word) = &entry {
                // simplified and traditional tokens can resolve to one entry
                if !seen.insert(word.id) {
                    continue;
                }
            }
            let record = Record::found_or_stub(entry, &token);
            let frequency = self.resolver.word_frequency(record.key());
            words.push(WordLevel {
                frequency,
                tier: word_tier(frequency),
                record,
            });
        }

        characters.sort_by_key(|c| (c.rank.is_none(), c.rank));
        words.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));

        tracing::debug!(
            characters = characters.len(),
            words = words.len(),
            "classified text"
        );

        Ok(Classification { characters, words })
    }

    /// Related words, most frequent first, at most `limit`.
    ///
    /// Stored links come first, then every word containing one of the
    /// record's forms.
    pub fn linked_words<R: Linkable>(&self, record: &R, limit: usize) -> Result<Vec<Word>> {
        let mut candidates = Vec::new();
        if let Some(owner) = record.linked_entity() {
            if owner.kind() != EntityKind::Word {
                candidates.extend(self.store.linked_words(owner)?);
            }
        }
        for form in record.search_forms() {
            candidates.extend(self.store.search_word(form)?);
        }

        let mut seen = HashSet::new();
        let mut ranked: Vec<(f64, Word)> = candidates
            .into_iter()
            .filter(|w| !record.is_itself(w) && seen.insert(w.id))
            .map(|w| (self.resolver.word_frequency(&w.simplified), w))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(ranked.into_iter().take(limit).map(|(_, w)| w).collect())
    }

    /// Example sentences, at most `limit`: stored links first, then
    /// sentences containing one of the record's forms.
    pub fn linked_sentences<R: Linkable>(&self, record: &R, limit: usize) -> Result<Vec<Sentence>> {
        let mut sentences = Vec::new();
        let mut seen = HashSet::new();

        if let Some(owner) = record.linked_entity() {
            for sentence in self.store.linked_sentences(owner)? {
                if sentences.len() >= limit {
                    return Ok(sentences);
                }
                if seen.insert(sentence.id) {
                    sentences.push(sentence);
                }
            }
        }

        for form in record.search_forms() {
            for sentence in self.store.sentences_containing(form)? {
                if sentences.len() >= limit {
                    return Ok(sentences);
                }
                if seen.insert(sentence.id) {
                    sentences.push(sentence);
                }
            }
        }

        Ok(sentences)
    }

    /// Tags of a stored record; stubs have none.
    pub fn tags<R: Linkable>(&self, record: &R) -> Result<Vec<Tag>> {
        match record.linked_entity() {
            Some(owner) => self.store.tags_of(owner),
            None => Ok(Vec::new()),
        }
    }

    /// Decomposition of a character, when a source is attached.
    pub fn decomposition(&self, record: &Record<Character>) -> Option<Decomposition> {
        self.decompositions
            .and_then(|source| source.decompose(record.key()))
    }
}
