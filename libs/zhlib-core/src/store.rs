//! Dictionary store interface.
//!
//! The core never owns entities; it talks to a store through these traits.
//! Uniqueness races on get-or-create resolve to the existing row, and
//! linking an already-linked pair is a no-op.

use crate::error::Result;
use crate::types::{
    Character, EntityRef, NewCharacter, NewSentence, NewWord, Sentence, Tag, Word,
};

/// Repository for character operations.
pub trait CharacterRepository {
    fn get_character(&self, glyph: &str) -> Result<Option<Character>>;
    fn get_or_create_character(&self, glyph: &str) -> Result<Character>;
    /// Insert or complete a character entry; supplied fields overwrite.
    fn upsert_character(&self, entry: &NewCharacter) -> Result<Character>;
    /// Assign a frequency rank, creating the character if needed.
    fn assign_rank(&self, glyph: &str, rank: u32) -> Result<Character>;
}

/// Repository for word operations.
pub trait WordRepository {
    fn get_word(&self, id: i64) -> Result<Option<Word>>;
    /// Exact match on simplified or traditional form, ordered by id.
    fn find_word(&self, form: &str) -> Result<Vec<Word>>;
    /// Words whose simplified or traditional form contains `fragment`.
    fn search_word(&self, fragment: &str) -> Result<Vec<Word>>;
    /// Get-or-create on `(simplified, traditional, pinyin)`, then link the
    /// characters the word contains.
    fn create_word(&self, word: NewWord) -> Result<Word>;
}

/// Repository for sentence operations.
pub trait SentenceRepository {
    fn get_sentence(&self, id: i64) -> Result<Option<Sentence>>;
    /// Sentences whose text equals `text`.
    fn find_sentence(&self, text: &str) -> Result<Vec<Sentence>>;
    /// Sentences whose text contains `fragment`, ordered by `order` then id.
    fn sentences_containing(&self, fragment: &str) -> Result<Vec<Sentence>>;
    /// Get-or-create on `(text, pinyin)`, then link the characters and
    /// words the sentence contains.
    fn create_sentence(&self, sentence: NewSentence) -> Result<Sentence>;
}

/// Repository for many-to-many links between entities.
///
/// Valid pairs are character–word, character–sentence and word–sentence,
/// in either argument order.
pub trait LinkRepository {
    /// Add the link if absent. Returns whether a new link was stored.
    fn link(&self, a: EntityRef, b: EntityRef) -> Result<bool>;
    fn linked_characters(&self, owner: EntityRef) -> Result<Vec<Character>>;
    fn linked_words(&self, owner: EntityRef) -> Result<Vec<Word>>;
    fn linked_sentences(&self, owner: EntityRef) -> Result<Vec<Sentence>>;
}

/// Repository for tag operations.
pub trait TagRepository {
    /// Attach a tag, creating it by case-insensitive name if needed.
    fn attach_tag(&self, owner: EntityRef, name: &str) -> Result<Tag>;
    /// Returns whether a link was removed.
    fn detach_tag(&self, owner: EntityRef, name: &str) -> Result<bool>;
    fn tags_of(&self, owner: EntityRef) -> Result<Vec<Tag>>;
}

/// Everything the level engine needs from a store.
pub trait DictionaryStore:
    CharacterRepository + WordRepository + SentenceRepository + LinkRepository + TagRepository
{
}

impl<T> DictionaryStore for T where
    T: CharacterRepository + WordRepository + SentenceRepository + LinkRepository + TagRepository
{
}
