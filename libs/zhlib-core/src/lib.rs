//! Core library of the Chinese reference dictionary.
//!
//! Provides:
//! - Han character and word-candidate extraction (jieba search mode)
//! - Rank and frequency resolution against the store and a frequency corpus
//! - Difficulty tiers for characters and words
//! - The level engine that classifies a whole text
//! - Dictionary store traits and cross-link discovery on entity creation

pub mod decomposition;
pub mod error;
pub mod level;
pub mod links;
pub mod lookup;
pub mod rank;
pub mod segmenter;
pub mod store;
pub mod tier;
pub mod types;

pub use decomposition::{Decomposition, DecompositionSource, DecompositionTable, MemoTable};
pub use error::{Result, StoreError, TableError};
pub use level::{CharacterLevel, Classification, LevelEngine, Linkable, WordLevel};
pub use links::{apply_links, discover_and_link, LinkReport, LinkSet, LinkSource};
pub use lookup::{lookup, LookupResult};
pub use rank::{parse_rank_list, EmptyCorpus, FrequencyCorpus, FrequencyTable, RankResolver, FREQ_FACTOR, LANGUAGE};
pub use segmenter::{contains_han, find_characters, is_han, Segmenter};
pub use store::{
    CharacterRepository, DictionaryStore, LinkRepository, SentenceRepository, TagRepository,
    WordRepository,
};
pub use tier::{character_tier, word_tier, Tier};
pub use types::{
    Character, EntityKind, EntityRef, Entry, NewCharacter, NewSentence, NewWord, Record, Sentence,
    Tag, Word,
};
