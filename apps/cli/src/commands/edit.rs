//! Commands that add entries to the store or change their tags.

use clap::ValueEnum;
use serde::Serialize;
use zhlib_core::{
    CharacterRepository, EntityRef, NewCharacter, NewSentence, NewWord, Result,
    SentenceRepository, StoreError, Tag, TagRepository, WordRepository,
};

use super::Context;

/// Kind of entry a command addresses by its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryKind {
    Character,
    Word,
    Sentence,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Word => "word",
            Self::Sentence => "sentence",
        }
    }
}

/// A stored entry together with its tags.
#[derive(Debug, Serialize)]
pub struct Tagged<E> {
    #[serde(flatten)]
    pub entry: E,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Serialize)]
pub struct TagReport {
    pub entity: EntityRef,
    /// Whether the tag set changed.
    pub changed: bool,
    pub tags: Vec<Tag>,
}

pub fn add_character(
    ctx: &Context,
    entry: &NewCharacter,
    tags: &[String],
) -> Result<Tagged<zhlib_core::Character>> {
    let character = ctx.store.upsert_character(entry)?;
    let tags = attach_all(ctx, EntityRef::Character(character.id), tags)?;
    Ok(Tagged { entry: character, tags })
}

/// Get-or-create a word; its characters are linked on creation.
pub fn add_word(ctx: &Context, word: NewWord, tags: &[String]) -> Result<Tagged<zhlib_core::Word>> {
    let word = ctx.store.create_word(word)?;
    tracing::info!(id = word.id, word = %word, "word stored");
    let tags = attach_all(ctx, EntityRef::Word(word.id), tags)?;
    Ok(Tagged { entry: word, tags })
}

/// Get-or-create a sentence; its characters and words are linked on creation.
pub fn add_sentence(
    ctx: &Context,
    sentence: NewSentence,
    tags: &[String],
) -> Result<Tagged<zhlib_core::Sentence>> {
    let sentence = ctx.store.create_sentence(sentence)?;
    tracing::info!(id = sentence.id, "sentence stored");
    let tags = attach_all(ctx, EntityRef::Sentence(sentence.id), tags)?;
    Ok(Tagged { entry: sentence, tags })
}

/// Attach `name` to the entry with text `key`, or detach it when `remove`.
pub fn tag(ctx: &Context, kind: EntryKind, key: &str, name: &str, remove: bool) -> Result<TagReport> {
    let entity = resolve(ctx, kind, key)?;
    let changed = if remove {
        ctx.store.detach_tag(entity, name)?
    } else {
        let before = ctx.store.tags_of(entity)?.len();
        ctx.store.attach_tag(entity, name)?;
        ctx.store.tags_of(entity)?.len() != before
    };
    Ok(TagReport {
        entity,
        changed,
        tags: ctx.store.tags_of(entity)?,
    })
}

fn attach_all(ctx: &Context, owner: EntityRef, names: &[String]) -> Result<Vec<Tag>> {
    for name in names {
        ctx.store.attach_tag(owner, name)?;
    }
    ctx.store.tags_of(owner)
}

/// The stored entry for `key`; the lowest id wins among words and sentences.
fn resolve(ctx: &Context, kind: EntryKind, key: &str) -> Result<EntityRef> {
    let key = key.trim();
    let found = match kind {
        EntryKind::Character => ctx
            .store
            .get_character(key)?
            .map(|c| EntityRef::Character(c.id)),
        EntryKind::Word => ctx
            .store
            .find_word(key)?
            .into_iter()
            .next()
            .map(|w| EntityRef::Word(w.id)),
        EntryKind::Sentence => ctx
            .store
            .find_sentence(key)?
            .into_iter()
            .map(|s| s.id)
            .min()
            .map(EntityRef::Sentence),
    };
    found.ok_or_else(|| StoreError::NotFound(format!("{} {}", kind.as_str(), key)))
}
