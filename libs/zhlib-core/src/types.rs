//! Core types for the Chinese reference dictionary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single CJK glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub glyph: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    /// Mnemonic index from an external character-learning sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heisig: Option<i64>,
    /// Japanese form of the same character, when it differs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kanji: Option<String>,
    /// Frequency-of-use rank (lower = more common). Unique when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// Character entry as supplied by an importer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCharacter {
    pub glyph: String,
    pub pinyin: Option<String>,
    pub meaning: Option<String>,
    pub heisig: Option<i64>,
    pub kanji: Option<String>,
}

impl NewCharacter {
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            ..Default::default()
        }
    }
}

/// A lexical unit of one or more characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub simplified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traditional: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

impl Word {
    /// Script forms this word can be found under in running text.
    pub fn forms(&self) -> Vec<&str> {
        let mut forms = vec![self.simplified.as_str()];
        if let Some(traditional) = self.traditional.as_deref() {
            forms.push(traditional);
        }
        forms
    }
}

/// Word to be created. `(simplified, traditional, pinyin)` identifies it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWord {
    pub simplified: String,
    pub traditional: Option<String>,
    pub pinyin: Option<String>,
    pub english: Option<String>,
}

impl NewWord {
    /// A stub word carrying only its simplified form.
    pub fn stub(simplified: impl Into<String>) -> Self {
        Self {
            simplified: simplified.into(),
            ..Default::default()
        }
    }

    /// Drop a traditional form identical to the simplified one, and blank
    /// optional fields.
    pub fn normalized(mut self) -> Self {
        self.simplified = self.simplified.trim().to_string();
        self.traditional = non_blank(self.traditional).filter(|t| *t != self.simplified);
        self.pinyin = non_blank(self.pinyin);
        self.english = non_blank(self.english);
        self
    }
}

/// An example sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Sentence to be created. `(text, pinyin)` identifies it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSentence {
    pub text: String,
    pub pinyin: Option<String>,
    pub english: Option<String>,
    pub order: Option<i64>,
}

impl NewSentence {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn normalized(mut self) -> Self {
        self.text = self.text.trim().to_string();
        self.pinyin = non_blank(self.pinyin);
        self.english = non_blank(self.english);
        self
    }
}

/// Case-insensitive label attachable to any entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Entity kinds held by the dictionary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Word,
    Sentence,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Word => "word",
            Self::Sentence => "sentence",
        }
    }
}

/// Reference to a stored entity by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Character(i64),
    Word(i64),
    Sentence(i64),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Character(_) => EntityKind::Character,
            Self::Word(_) => EntityKind::Word,
            Self::Sentence(_) => EntityKind::Sentence,
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            Self::Character(id) | Self::Word(id) | Self::Sentence(id) => id,
        }
    }
}

/// Read-only projection shared by stored entities and stubs.
pub trait Entry {
    fn key(&self) -> &str;
    fn pinyin(&self) -> Option<&str>;
    fn gloss(&self) -> Option<&str>;
    fn entity(&self) -> EntityRef;
}

impl Entry for Character {
    fn key(&self) -> &str {
        &self.glyph
    }
    fn pinyin(&self) -> Option<&str> {
        self.pinyin.as_deref()
    }
    fn gloss(&self) -> Option<&str> {
        self.meaning.as_deref()
    }
    fn entity(&self) -> EntityRef {
        EntityRef::Character(self.id)
    }
}

impl Entry for Word {
    fn key(&self) -> &str {
        &self.simplified
    }
    fn pinyin(&self) -> Option<&str> {
        self.pinyin.as_deref()
    }
    fn gloss(&self) -> Option<&str> {
        self.english.as_deref()
    }
    fn entity(&self) -> EntityRef {
        EntityRef::Word(self.id)
    }
}

impl Entry for Sentence {
    fn key(&self) -> &str {
        &self.text
    }
    fn pinyin(&self) -> Option<&str> {
        self.pinyin.as_deref()
    }
    fn gloss(&self) -> Option<&str> {
        self.english.as_deref()
    }
    fn entity(&self) -> EntityRef {
        EntityRef::Sentence(self.id)
    }
}

/// A stored entity, or a placeholder for text the store does not know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Record<E> {
    Found { entry: E },
    Stub { key: String },
}

impl<E: Entry> Record<E> {
    pub fn key(&self) -> &str {
        match self {
            Self::Found { entry } => entry.key(),
            Self::Stub { key } => key,
        }
    }

    pub fn pinyin(&self) -> Option<&str> {
        match self {
            Self::Found { entry } => entry.pinyin(),
            Self::Stub { .. } => None,
        }
    }

    pub fn gloss(&self) -> Option<&str> {
        match self {
            Self::Found { entry } => entry.gloss(),
            Self::Stub { .. } => None,
        }
    }

    pub fn entity(&self) -> Option<EntityRef> {
        match self {
            Self::Found { entry } => Some(entry.entity()),
            Self::Stub { .. } => None,
        }
    }

    pub fn entry(&self) -> Option<&E> {
        match self {
            Self::Found { entry } => Some(entry),
            Self::Stub { .. } => None,
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Self::Stub { .. })
    }
}

impl<E> Record<E> {
    pub fn found_or_stub(entry: Option<E>, key: &str) -> Self {
        match entry {
            Some(entry) => Self::Found { entry },
            None => Self::Stub {
                key: key.to_string(),
            },
        }
    }
}

/// Space-separated display of the present parts; pinyin in brackets.
fn write_parts(
    f: &mut fmt::Formatter<'_>,
    head: &[Option<&str>],
    pinyin: Option<&str>,
    gloss: Option<&str>,
) -> fmt::Result {
    let bracketed = pinyin.map(|p| format!("[{}]", p));
    let parts: Vec<&str> = head
        .iter()
        .copied()
        .chain([bracketed.as_deref(), gloss])
        .flatten()
        .collect();
    write!(f, "{}", parts.join(" "))
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(f, &[Some(&self.glyph)], self.pinyin.as_deref(), self.meaning.as_deref())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(
            f,
            &[Some(&self.simplified), self.traditional.as_deref()],
            self.pinyin.as_deref(),
            self.english.as_deref(),
        )
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parts(f, &[Some(&self.text)], self.pinyin.as_deref(), self.english.as_deref())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn traditional_equal_to_simplified_is_dropped() {
        let word = NewWord {
            simplified: "你好".to_string(),
            traditional: Some("你好".to_string()),
            pinyin: Some("ni3 hao3".to_string()),
            english: None,
        }
        .normalized();
        assert_eq!(word.traditional, None);
        assert_eq!(word.pinyin.as_deref(), Some("ni3 hao3"));
    }

    #[test]
    fn distinct_traditional_is_kept() {
        let word = NewWord {
            simplified: "汉字".to_string(),
            traditional: Some("漢字".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(word.traditional.as_deref(), Some("漢字"));
    }

    #[test]
    fn blank_fields_become_absent() {
        let sentence = NewSentence {
            text: " 我是学生。 ".to_string(),
            pinyin: Some("  ".to_string()),
            english: Some(String::new()),
            order: None,
        }
        .normalized();
        assert_eq!(sentence.text, "我是学生。");
        assert_eq!(sentence.pinyin, None);
        assert_eq!(sentence.english, None);
    }

    #[test]
    fn stub_record_projects_key_only() {
        let record: Record<Character> = Record::found_or_stub(None, "好");
        assert!(record.is_stub());
        assert_eq!(record.key(), "好");
        assert_eq!(record.pinyin(), None);
        assert_eq!(record.entity(), None);
    }

    #[test]
    fn found_record_projects_entry() {
        let word = Word {
            id: 7,
            simplified: "学生".to_string(),
            traditional: Some("學生".to_string()),
            pinyin: Some("xue2 sheng5".to_string()),
            english: Some("student".to_string()),
        };
        let record = Record::found_or_stub(Some(word), "学生");
        assert_eq!(record.key(), "学生");
        assert_eq!(record.gloss(), Some("student"));
        assert_eq!(record.entity(), Some(EntityRef::Word(7)));
    }

    #[test]
    fn display_skips_absent_parts() {
        let word = Word {
            id: 1,
            simplified: "汉字".to_string(),
            traditional: Some("漢字".to_string()),
            pinyin: Some("han4 zi4".to_string()),
            english: Some("Chinese character".to_string()),
        };
        assert_eq!(word.to_string(), "汉字 漢字 [han4 zi4] Chinese character");

        let stub = Word {
            id: 2,
            simplified: "你好".to_string(),
            traditional: None,
            pinyin: None,
            english: None,
        };
        assert_eq!(stub.to_string(), "你好");
    }

    #[test]
    fn word_forms_include_traditional() {
        let word = Word {
            id: 1,
            simplified: "汉字".to_string(),
            traditional: Some("漢字".to_string()),
            pinyin: None,
            english: None,
        };
        assert_eq!(word.forms(), vec!["汉字", "漢字"]);
    }
}
