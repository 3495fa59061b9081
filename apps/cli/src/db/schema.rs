//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the dictionary database.
pub const SCHEMA: &str = r#"
-- Single glyphs
CREATE TABLE IF NOT EXISTS characters (
    id INTEGER PRIMARY KEY,
    glyph TEXT NOT NULL UNIQUE,
    pinyin TEXT,
    meaning TEXT,
    heisig INTEGER,
    kanji TEXT,
    rank INTEGER UNIQUE
);

-- Words; traditional is NULL when identical to simplified
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY,
    simplified TEXT NOT NULL,
    traditional TEXT,
    pinyin TEXT,
    english TEXT
);

-- Example sentences
CREATE TABLE IF NOT EXISTS sentences (
    id INTEGER PRIMARY KEY,
    text TEXT NOT NULL,
    pinyin TEXT,
    english TEXT,
    sequence INTEGER UNIQUE
);

-- Tags, unique regardless of case
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE
);

-- Cross links
CREATE TABLE IF NOT EXISTS character_words (
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    PRIMARY KEY (character_id, word_id)
);

CREATE TABLE IF NOT EXISTS character_sentences (
    character_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    sentence_id INTEGER NOT NULL REFERENCES sentences(id) ON DELETE CASCADE,
    PRIMARY KEY (character_id, sentence_id)
);

CREATE TABLE IF NOT EXISTS word_sentences (
    word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    sentence_id INTEGER NOT NULL REFERENCES sentences(id) ON DELETE CASCADE,
    PRIMARY KEY (word_id, sentence_id)
);

-- Tag links
CREATE TABLE IF NOT EXISTS character_tags (
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    owner_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    PRIMARY KEY (tag_id, owner_id)
);

CREATE TABLE IF NOT EXISTS word_tags (
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    owner_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    PRIMARY KEY (tag_id, owner_id)
);

CREATE TABLE IF NOT EXISTS sentence_tags (
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    owner_id INTEGER NOT NULL REFERENCES sentences(id) ON DELETE CASCADE,
    PRIMARY KEY (tag_id, owner_id)
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Uniqueness over nullable columns: NULL must compare equal here
CREATE UNIQUE INDEX IF NOT EXISTS uq_words_identity
    ON words(simplified, COALESCE(traditional, ''), COALESCE(pinyin, ''));
CREATE UNIQUE INDEX IF NOT EXISTS uq_sentences_identity
    ON sentences(text, COALESCE(pinyin, ''));

-- Indexes
CREATE INDEX IF NOT EXISTS idx_words_traditional ON words(traditional);
CREATE INDEX IF NOT EXISTS idx_character_words_word ON character_words(word_id);
CREATE INDEX IF NOT EXISTS idx_character_sentences_sentence ON character_sentences(sentence_id);
CREATE INDEX IF NOT EXISTS idx_word_sentences_sentence ON word_sentences(sentence_id);
"#;

/// Record the schema version if not present.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (1);
"#;
