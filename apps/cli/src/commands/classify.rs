//! Difficulty report for a block of text.

use std::ops::RangeInclusive;

use serde::Serialize;
use zhlib_core::{
    CharacterLevel, Decomposition, Result, Sentence, Tag, Word, WordLevel,
};

use super::Context;

/// Filters applied to a classification before it is reported.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Linked words and sentences per entry.
    pub link_limit: usize,
    pub ranks: RangeInclusive<f64>,
    pub frequencies: RangeInclusive<f64>,
}

impl ClassifyOptions {
    pub fn new(link_limit: usize) -> Self {
        Self {
            link_limit,
            ranks: f64::NEG_INFINITY..=f64::INFINITY,
            frequencies: f64::NEG_INFINITY..=f64::INFINITY,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CharacterReport {
    #[serde(flatten)]
    pub level: CharacterLevel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decomposition: Option<Decomposition>,
    pub words: Vec<Word>,
    pub sentences: Vec<Sentence>,
}

#[derive(Debug, Serialize)]
pub struct WordReport {
    #[serde(flatten)]
    pub level: WordLevel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    pub words: Vec<Word>,
    pub sentences: Vec<Sentence>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub characters: Vec<CharacterReport>,
    pub words: Vec<WordReport>,
}

/// Classify `text` and attach related entries to every item.
pub fn classify(ctx: &Context, text: &str, options: &ClassifyOptions) -> Result<ClassifyReport> {
    let engine = ctx.engine();
    let classification = engine
        .classify(text)?
        .within(options.ranks.clone(), options.frequencies.clone());

    let mut characters = Vec::with_capacity(classification.characters.len());
    for level in classification.characters {
        characters.push(CharacterReport {
            tags: engine.tags(&level.record)?,
            decomposition: engine.decomposition(&level.record),
            words: engine.linked_words(&level.record, options.link_limit)?,
            sentences: engine.linked_sentences(&level.record, options.link_limit)?,
            level,
        });
    }

    let mut words = Vec::with_capacity(classification.words.len());
    for level in classification.words {
        words.push(WordReport {
            tags: engine.tags(&level.record)?,
            words: engine.linked_words(&level.record, options.link_limit)?,
            sentences: engine.linked_sentences(&level.record, options.link_limit)?,
            level,
        });
    }

    Ok(ClassifyReport { characters, words })
}
