//! Repository pattern for dictionary access.

use crate::db::error::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use zhlib_core::{
    apply_links, discover_and_link, Character, CharacterRepository, EntityKind, EntityRef,
    LinkRepository, LinkSource, NewCharacter, NewSentence, NewWord, Result, Segmenter, Sentence,
    SentenceRepository, StoreError, Tag, TagRepository, Word, WordRepository,
};

type DbResult<T> = std::result::Result<T, DbError>;

const CHARACTER_COLUMNS: &str = "c.id, c.glyph, c.pinyin, c.meaning, c.heisig, c.kanji, c.rank";
const WORD_COLUMNS: &str = "w.id, w.simplified, w.traditional, w.pinyin, w.english";
const SENTENCE_COLUMNS: &str = "s.id, s.text, s.pinyin, s.english, s.sequence";
const SENTENCE_ORDER: &str = "ORDER BY s.sequence IS NULL, s.sequence, s.id";

/// SQLite implementation of the dictionary store.
///
/// Creating a word or sentence links everything it contains before the
/// creating call returns.
pub struct SqliteStore {
    conn: Connection,
    segmenter: Arc<Segmenter>,
}

impl SqliteStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P, segmenter: Arc<Segmenter>) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn, segmenter };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory(segmenter: Arc<Segmenter>) -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, segmenter };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> DbResult<()> {
        self.conn.busy_timeout(Duration::from_secs(5))?;
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Assign ranks from a parsed rank list in one savepoint.
    pub fn import_ranks(&self, ranks: &[(u32, String)]) -> Result<usize> {
        let count = self.in_savepoint("import_ranks", || {
            for (rank, glyph) in ranks {
                self.assign_rank(glyph, *rank)?;
            }
            Ok(ranks.len())
        })?;
        tracing::info!(count, "imported character ranks");
        Ok(count)
    }

    /// Run `f` as one unit of writes, rolling them back on error.
    ///
    /// The outermost call takes the write lock up front with
    /// `BEGIN IMMEDIATE`, so concurrent writers queue on the busy timeout
    /// instead of failing on a lock upgrade. Nested calls become savepoints,
    /// so creating a sentence may create stub words.
    fn in_savepoint<T>(&self, name: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let (begin, commit, rollback) = if self.conn.is_autocommit() {
            (
                "BEGIN IMMEDIATE;".to_string(),
                "COMMIT;".to_string(),
                "ROLLBACK;".to_string(),
            )
        } else {
            (
                format!("SAVEPOINT {name};"),
                format!("RELEASE {name};"),
                format!("ROLLBACK TO {name}; RELEASE {name};"),
            )
        };

        self.conn.execute_batch(&begin).map_err(DbError::from)?;
        let result = f().and_then(|value| {
            self.conn.execute_batch(&commit).map_err(DbError::from)?;
            Ok(value)
        });
        if result.is_err() {
            if let Err(error) = self.conn.execute_batch(&rollback) {
                tracing::warn!(%error, savepoint = name, "rollback failed");
            }
        }
        result
    }

    fn query_character(&self, glyph: &str) -> DbResult<Option<Character>> {
        self.conn
            .query_row(
                &format!("SELECT {CHARACTER_COLUMNS} FROM characters c WHERE c.glyph = ?1"),
                params![glyph],
                row_to_character,
            )
            .optional()
            .map_err(Into::into)
    }

    fn ensure_character(&self, glyph: &str) -> DbResult<Character> {
        let glyph = glyph.trim();
        if glyph.chars().count() != 1 {
            return Err(DbError::InvalidData(format!(
                "a character must be a single glyph: {:?}",
                glyph
            )));
        }

        self.conn.execute(
            "INSERT OR IGNORE INTO characters (glyph) VALUES (?1)",
            params![glyph],
        )?;
        self.query_character(glyph)?
            .ok_or_else(|| DbError::InvalidData(format!("character vanished: {}", glyph)))
    }

    fn query_words(&self, filter: &str, value: &str) -> DbResult<Vec<Word>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORD_COLUMNS} FROM words w WHERE {filter} ORDER BY w.id"
        ))?;
        let words = stmt
            .query_map(params![value], row_to_word)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(words)
    }

    fn word_by_identity(&self, word: &NewWord) -> DbResult<Option<Word>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {WORD_COLUMNS} FROM words w
                     WHERE w.simplified = ?1 AND w.traditional IS ?2 AND w.pinyin IS ?3"
                ),
                params![word.simplified, word.traditional, word.pinyin],
                row_to_word,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get-or-create; the flag tells whether a row was inserted.
    fn insert_word(&self, word: &NewWord) -> DbResult<(Word, bool)> {
        if let Some(existing) = self.word_by_identity(word)? {
            return Ok((existing, false));
        }

        let inserted = self.conn.execute(
            "INSERT INTO words (simplified, traditional, pinyin, english) VALUES (?1, ?2, ?3, ?4)",
            params![word.simplified, word.traditional, word.pinyin, word.english],
        );
        match inserted {
            Ok(_) => Ok((
                Word {
                    id: self.conn.last_insert_rowid(),
                    simplified: word.simplified.clone(),
                    traditional: word.traditional.clone(),
                    pinyin: word.pinyin.clone(),
                    english: word.english.clone(),
                },
                true,
            )),
            Err(e) => {
                let e = DbError::from(e);
                if e.is_constraint_violation() {
                    // lost a race with a concurrent writer
                    if let Some(existing) = self.word_by_identity(word)? {
                        return Ok((existing, false));
                    }
                }
                Err(e)
            }
        }
    }

    fn query_sentences(&self, filter: &str, value: &str) -> DbResult<Vec<Sentence>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SENTENCE_COLUMNS} FROM sentences s WHERE {filter} {SENTENCE_ORDER}"
        ))?;
        let sentences = stmt
            .query_map(params![value], row_to_sentence)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sentences)
    }

    fn sentence_by_identity(&self, sentence: &NewSentence) -> DbResult<Option<Sentence>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {SENTENCE_COLUMNS} FROM sentences s WHERE s.text = ?1 AND s.pinyin IS ?2"
                ),
                params![sentence.text, sentence.pinyin],
                row_to_sentence,
            )
            .optional()
            .map_err(Into::into)
    }

    fn insert_sentence(&self, sentence: &NewSentence) -> DbResult<(Sentence, bool)> {
        if let Some(existing) = self.sentence_by_identity(sentence)? {
            return Ok((existing, false));
        }

        let inserted = self.conn.execute(
            "INSERT INTO sentences (text, pinyin, english, sequence) VALUES (?1, ?2, ?3, ?4)",
            params![sentence.text, sentence.pinyin, sentence.english, sentence.order],
        );
        match inserted {
            Ok(_) => Ok((
                Sentence {
                    id: self.conn.last_insert_rowid(),
                    text: sentence.text.clone(),
                    pinyin: sentence.pinyin.clone(),
                    english: sentence.english.clone(),
                    order: sentence.order,
                },
                true,
            )),
            Err(e) => {
                let e = DbError::from(e);
                if !e.is_constraint_violation() {
                    return Err(e);
                }
                match self.sentence_by_identity(sentence)? {
                    Some(existing) => Ok((existing, false)),
                    None => Err(DbError::Conflict(format!(
                        "sentence order {:?} is already used",
                        sentence.order
                    ))),
                }
            }
        }
    }

    fn query_linked<T>(
        &self,
        sql: &str,
        id: i64,
        map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
    ) -> DbResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![id], map)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_tag(&self, name: &str) -> DbResult<Option<Tag>> {
        self.conn
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1",
                params![name],
                row_to_tag,
            )
            .optional()
            .map_err(Into::into)
    }
}

fn row_to_character(row: &rusqlite::Row) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        glyph: row.get(1)?,
        pinyin: row.get(2)?,
        meaning: row.get(3)?,
        heisig: row.get(4)?,
        kanji: row.get(5)?,
        rank: row.get(6)?,
    })
}

fn row_to_word(row: &rusqlite::Row) -> rusqlite::Result<Word> {
    Ok(Word {
        id: row.get(0)?,
        simplified: row.get(1)?,
        traditional: row.get(2)?,
        pinyin: row.get(3)?,
        english: row.get(4)?,
    })
}

fn row_to_sentence(row: &rusqlite::Row) -> rusqlite::Result<Sentence> {
    Ok(Sentence {
        id: row.get(0)?,
        text: row.get(1)?,
        pinyin: row.get(2)?,
        english: row.get(3)?,
        order: row.get(4)?,
    })
}

fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Join table and `(left, right)` ids for a link between two entities.
fn link_table(a: EntityRef, b: EntityRef) -> DbResult<(&'static str, i64, i64)> {
    match (a, b) {
        (EntityRef::Character(c), EntityRef::Word(w))
        | (EntityRef::Word(w), EntityRef::Character(c)) => Ok(("character_words", c, w)),
        (EntityRef::Character(c), EntityRef::Sentence(s))
        | (EntityRef::Sentence(s), EntityRef::Character(c)) => Ok(("character_sentences", c, s)),
        (EntityRef::Word(w), EntityRef::Sentence(s))
        | (EntityRef::Sentence(s), EntityRef::Word(w)) => Ok(("word_sentences", w, s)),
        _ => Err(DbError::InvalidData(format!(
            "cannot link a {} to a {}",
            a.kind().as_str(),
            b.kind().as_str()
        ))),
    }
}

fn link_columns(table: &str) -> (&'static str, &'static str) {
    match table {
        "character_words" => ("character_id", "word_id"),
        "character_sentences" => ("character_id", "sentence_id"),
        _ => ("word_id", "sentence_id"),
    }
}

fn tag_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Character => "character_tags",
        EntityKind::Word => "word_tags",
        EntityKind::Sentence => "sentence_tags",
    }
}

fn unrelated(owner: EntityRef, wanted: &str) -> StoreError {
    StoreError::InvalidData(format!(
        "a {} has no linked {}",
        owner.kind().as_str(),
        wanted
    ))
}

impl CharacterRepository for SqliteStore {
    fn get_character(&self, glyph: &str) -> Result<Option<Character>> {
        Ok(self.query_character(glyph)?)
    }

    fn get_or_create_character(&self, glyph: &str) -> Result<Character> {
        Ok(self.ensure_character(glyph)?)
    }

    fn upsert_character(&self, entry: &NewCharacter) -> Result<Character> {
        let character = self.ensure_character(&entry.glyph)?;
        self.conn
            .execute(
                "UPDATE characters SET
                    pinyin = COALESCE(?2, pinyin),
                    meaning = COALESCE(?3, meaning),
                    heisig = COALESCE(?4, heisig),
                    kanji = COALESCE(?5, kanji)
                 WHERE id = ?1",
                params![character.id, entry.pinyin, entry.meaning, entry.heisig, entry.kanji],
            )
            .map_err(DbError::from)?;
        Ok(self.ensure_character(&entry.glyph)?)
    }

    fn assign_rank(&self, glyph: &str, rank: u32) -> Result<Character> {
        let character = self.ensure_character(glyph)?;
        let holder: Option<String> = self
            .conn
            .query_row(
                "SELECT glyph FROM characters WHERE rank = ?1",
                params![rank],
                |row| row.get(0),
            )
            .optional()
            .map_err(DbError::from)?;

        match holder {
            Some(other) if other != character.glyph => Err(StoreError::Conflict(format!(
                "rank {} already belongs to {}",
                rank, other
            ))),
            Some(_) => Ok(character),
            None => {
                self.conn
                    .execute(
                        "UPDATE characters SET rank = ?2 WHERE id = ?1",
                        params![character.id, rank],
                    )
                    .map_err(DbError::from)?;
                Ok(Character {
                    rank: Some(rank),
                    ..character
                })
            }
        }
    }
}

impl WordRepository for SqliteStore {
    fn get_word(&self, id: i64) -> Result<Option<Word>> {
        self.conn
            .query_row(
                &format!("SELECT {WORD_COLUMNS} FROM words w WHERE w.id = ?1"),
                params![id],
                row_to_word,
            )
            .optional()
            .map_err(|e| DbError::from(e).into())
    }

    fn find_word(&self, form: &str) -> Result<Vec<Word>> {
        Ok(self.query_words("w.simplified = ?1 OR w.traditional = ?1", form)?)
    }

    fn search_word(&self, fragment: &str) -> Result<Vec<Word>> {
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.query_words(
            "instr(w.simplified, ?1) > 0 OR instr(COALESCE(w.traditional, ''), ?1) > 0",
            fragment,
        )?)
    }

    fn create_word(&self, word: NewWord) -> Result<Word> {
        let word = word.normalized();
        if word.simplified.is_empty() {
            return Err(StoreError::InvalidData(
                "a word needs a simplified form".to_string(),
            ));
        }

        self.in_savepoint("create_word", || {
            let (created, inserted) = self.insert_word(&word)?;
            if inserted {
                let links = discover_and_link(&self.segmenter, LinkSource::Word(&created));
                apply_links(self, &links)?;
            }
            Ok(created)
        })
    }
}

impl SentenceRepository for SqliteStore {
    fn get_sentence(&self, id: i64) -> Result<Option<Sentence>> {
        self.conn
            .query_row(
                &format!("SELECT {SENTENCE_COLUMNS} FROM sentences s WHERE s.id = ?1"),
                params![id],
                row_to_sentence,
            )
            .optional()
            .map_err(|e| DbError::from(e).into())
    }

    fn find_sentence(&self, text: &str) -> Result<Vec<Sentence>> {
        Ok(self.query_sentences("s.text = ?1", text)?)
    }

    fn sentences_containing(&self, fragment: &str) -> Result<Vec<Sentence>> {
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.query_sentences("instr(s.text, ?1) > 0", fragment)?)
    }

    fn create_sentence(&self, sentence: NewSentence) -> Result<Sentence> {
        let sentence = sentence.normalized();
        if sentence.text.is_empty() {
            return Err(StoreError::InvalidData(
                "a sentence needs text".to_string(),
            ));
        }

        self.in_savepoint("create_sentence", || {
            let (created, inserted) = self.insert_sentence(&sentence)?;
            if inserted {
                let links = discover_and_link(&self.segmenter, LinkSource::Sentence(&created));
                let report = apply_links(self, &links)?;
                tracing::debug!(sentence = created.id, ?report, "linked sentence");
            }
            Ok(created)
        })
    }
}

impl LinkRepository for SqliteStore {
    fn link(&self, a: EntityRef, b: EntityRef) -> Result<bool> {
        let (table, left, right) = link_table(a, b)?;
        let (left_column, right_column) = link_columns(table);
        let changed = self
            .conn
            .execute(
                &format!(
                    "INSERT OR IGNORE INTO {table} ({left_column}, {right_column}) VALUES (?1, ?2)"
                ),
                params![left, right],
            )
            .map_err(DbError::from)?;
        Ok(changed > 0)
    }

    fn linked_characters(&self, owner: EntityRef) -> Result<Vec<Character>> {
        let sql = match owner {
            EntityRef::Word(_) => format!(
                "SELECT {CHARACTER_COLUMNS} FROM characters c
                 JOIN character_words l ON l.character_id = c.id
                 WHERE l.word_id = ?1 ORDER BY c.id"
            ),
            EntityRef::Sentence(_) => format!(
                "SELECT {CHARACTER_COLUMNS} FROM characters c
                 JOIN character_sentences l ON l.character_id = c.id
                 WHERE l.sentence_id = ?1 ORDER BY c.id"
            ),
            EntityRef::Character(_) => return Err(unrelated(owner, "characters")),
        };
        Ok(self.query_linked(&sql, owner.id(), row_to_character)?)
    }

    fn linked_words(&self, owner: EntityRef) -> Result<Vec<Word>> {
        let sql = match owner {
            EntityRef::Character(_) => format!(
                "SELECT {WORD_COLUMNS} FROM words w
                 JOIN character_words l ON l.word_id = w.id
                 WHERE l.character_id = ?1 ORDER BY w.id"
            ),
            EntityRef::Sentence(_) => format!(
                "SELECT {WORD_COLUMNS} FROM words w
                 JOIN word_sentences l ON l.word_id = w.id
                 WHERE l.sentence_id = ?1 ORDER BY w.id"
            ),
            EntityRef::Word(_) => return Err(unrelated(owner, "words")),
        };
        Ok(self.query_linked(&sql, owner.id(), row_to_word)?)
    }

    fn linked_sentences(&self, owner: EntityRef) -> Result<Vec<Sentence>> {
        let sql = match owner {
            EntityRef::Character(_) => format!(
                "SELECT {SENTENCE_COLUMNS} FROM sentences s
                 JOIN character_sentences l ON l.sentence_id = s.id
                 WHERE l.character_id = ?1 {SENTENCE_ORDER}"
            ),
            EntityRef::Word(_) => format!(
                "SELECT {SENTENCE_COLUMNS} FROM sentences s
                 JOIN word_sentences l ON l.sentence_id = s.id
                 WHERE l.word_id = ?1 {SENTENCE_ORDER}"
            ),
            EntityRef::Sentence(_) => return Err(unrelated(owner, "sentences")),
        };
        Ok(self.query_linked(&sql, owner.id(), row_to_sentence)?)
    }
}

impl TagRepository for SqliteStore {
    fn attach_tag(&self, owner: EntityRef, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidData("empty tag name".to_string()));
        }

        self.conn
            .execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![name])
            .map_err(DbError::from)?;
        let tag = self
            .query_tag(name)?
            .ok_or_else(|| StoreError::NotFound(format!("tag {}", name)))?;

        let table = tag_table(owner.kind());
        self.conn
            .execute(
                &format!("INSERT OR IGNORE INTO {table} (tag_id, owner_id) VALUES (?1, ?2)"),
                params![tag.id, owner.id()],
            )
            .map_err(DbError::from)?;
        Ok(tag)
    }

    fn detach_tag(&self, owner: EntityRef, name: &str) -> Result<bool> {
        let table = tag_table(owner.kind());
        let changed = self
            .conn
            .execute(
                &format!(
                    "DELETE FROM {table}
                     WHERE owner_id = ?1 AND tag_id IN (SELECT id FROM tags WHERE name = ?2)"
                ),
                params![owner.id(), name.trim()],
            )
            .map_err(DbError::from)?;
        Ok(changed > 0)
    }

    fn tags_of(&self, owner: EntityRef) -> Result<Vec<Tag>> {
        let table = tag_table(owner.kind());
        let sql = format!(
            "SELECT t.id, t.name FROM tags t
             JOIN {table} l ON l.tag_id = t.id
             WHERE l.owner_id = ?1 ORDER BY t.name"
        );
        Ok(self.query_linked(&sql, owner.id(), row_to_tag)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory(Arc::new(Segmenter::new())).unwrap()
    }

    #[test]
    fn get_or_create_character_is_idempotent() {
        let store = store();
        let first = store.get_or_create_character("好").unwrap();
        let second = store.get_or_create_character("好").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.pinyin, None);
    }

    #[test]
    fn character_must_be_single_glyph() {
        let store = store();
        let result = store.get_or_create_character("你好");
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn upsert_fills_supplied_fields_only() {
        let store = store();
        store
            .upsert_character(&NewCharacter {
                glyph: "好".to_string(),
                pinyin: Some("hao3".to_string()),
                meaning: Some("good".to_string()),
                ..Default::default()
            })
            .unwrap();
        let updated = store
            .upsert_character(&NewCharacter {
                glyph: "好".to_string(),
                heisig: Some(99),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.pinyin.as_deref(), Some("hao3"));
        assert_eq!(updated.meaning.as_deref(), Some("good"));
        assert_eq!(updated.heisig, Some(99));
    }

    #[test]
    fn rank_is_unique_across_characters() {
        let store = store();
        store.assign_rank("的", 1).unwrap();
        assert_eq!(store.assign_rank("的", 1).unwrap().rank, Some(1));
        let result = store.assign_rank("一", 1);
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[test]
    fn link_rejects_unrelated_kinds() {
        let store = store();
        let result = store.link(EntityRef::Word(1), EntityRef::Word(2));
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn link_is_add_if_absent() {
        let store = store();
        let character = store.get_or_create_character("人").unwrap();
        let sentence = store.create_sentence(NewSentence::new("龘")).unwrap();
        let pair = (EntityRef::Character(character.id), EntityRef::Sentence(sentence.id));
        assert!(store.link(pair.0, pair.1).unwrap());
        assert!(!store.link(pair.1, pair.0).unwrap());
    }

    #[test]
    fn savepoint_rolls_back_on_error() {
        let store = store();
        let result: Result<()> = store.in_savepoint("test", || {
            store.get_or_create_character("学")?;
            Err(StoreError::InvalidData("abort".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(store.get_character("学").unwrap(), None);
        assert!(store.conn.is_autocommit());
    }

    #[test]
    fn nested_failure_keeps_outer_writes() {
        let store = store();
        let result: Result<()> = store.in_savepoint("outer", || {
            store.get_or_create_character("学")?;
            let inner: Result<()> = store.in_savepoint("inner", || {
                store.get_or_create_character("习")?;
                Err(StoreError::InvalidData("abort".to_string()))
            });
            assert!(inner.is_err());
            assert!(!store.conn.is_autocommit());
            Ok(())
        });
        assert!(result.is_ok());
        assert!(store.conn.is_autocommit());
        assert!(store.get_character("学").unwrap().is_some());
        assert_eq!(store.get_character("习").unwrap(), None);
    }
}
