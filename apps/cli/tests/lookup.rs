mod common;

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, TempDir};
use zhlib_cli::commands::{self, Context};
use zhlib_cli::db::SqliteStore;
use zhlib_core::{
    CharacterRepository, EmptyCorpus, NewCharacter, NewSentence, NewWord, SentenceRepository,
    WordRepository,
};

#[test]
fn single_character_query() {
    let ctx = common::context();
    let mut entry = NewCharacter::new("好");
    entry.pinyin = Some("hao3".to_string());
    ctx.store.upsert_character(&entry).unwrap();

    let result = commands::lookup(&ctx, "好").unwrap();
    assert_eq!(result.characters.len(), 1);
    assert_eq!(result.characters[0].pinyin.as_deref(), Some("hao3"));
    assert!(result.words.is_empty());
    assert!(result.sentences.is_empty());
}

#[test]
fn longer_query_matches_sentences_and_words() {
    let ctx = common::context();
    let word = ctx.store.create_word(NewWord::stub("你好")).unwrap();
    let sentence = ctx.store.create_sentence(NewSentence::new("你好")).unwrap();

    let result = commands::lookup(&ctx, " 你好 ").unwrap();
    assert!(result.characters.is_empty());
    assert_eq!(result.words, vec![word]);
    assert_eq!(result.sentences, vec![sentence]);
}

#[test]
fn empty_categories_are_omitted() {
    let ctx = common::context();
    ctx.store.create_word(NewWord::stub("你好")).unwrap();

    let result = commands::lookup(&ctx, "你好").unwrap();
    let json = serde_json::to_value(&result).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["words"]);
}

#[test]
fn unknown_query_is_empty() {
    let ctx = common::context();
    assert!(commands::lookup(&ctx, "龘").unwrap().is_empty());
}

#[test]
fn file_backed_store_persists_between_opens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dict.db");

    {
        let store = SqliteStore::open(&path, common::segmenter()).unwrap();
        store.create_sentence(NewSentence::new("我们学习中文。")).unwrap();
    }

    let store = SqliteStore::open(&path, common::segmenter()).unwrap();
    assert_eq!(store.find_sentence("我们学习中文。").unwrap().len(), 1);
    assert!(store.get_character("学").unwrap().is_some());
    assert!(!store.find_word("学习").unwrap().is_empty());
}

#[test]
fn import_ranks_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# rank\tglyph").unwrap();
    writeln!(file, "1\t的").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "2\t一").unwrap();

    let store = SqliteStore::open_in_memory(common::segmenter()).unwrap();
    let ctx = Context::with_store(store, Box::new(EmptyCorpus), 10);
    let imported = commands::import_ranks(&ctx, file.path()).unwrap();
    assert_eq!(imported, 2);
    assert_eq!(ctx.store.get_character("一").unwrap().unwrap().rank, Some(2));
}

#[test]
fn import_ranks_rejects_malformed_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "first\t的").unwrap();

    let ctx = common::context();
    let err = commands::import_ranks(&ctx, file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("line 1"));
}
