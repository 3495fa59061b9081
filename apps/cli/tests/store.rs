mod common;

use pretty_assertions::assert_eq;
use zhlib_cli::commands::{self, EntryKind};
use zhlib_cli::db::SqliteStore;
use zhlib_core::{
    CharacterRepository, EntityRef, LinkRepository, NewSentence, NewWord, SentenceRepository,
    StoreError, TagRepository, WordRepository,
};

fn glyphs(store: &SqliteStore, owner: EntityRef) -> Vec<String> {
    store
        .linked_characters(owner)
        .unwrap()
        .into_iter()
        .map(|c| c.glyph)
        .collect()
}

#[test]
fn create_word_is_idempotent() {
    let store = common::store();
    let word = NewWord {
        simplified: "学习".to_string(),
        traditional: Some("學習".to_string()),
        pinyin: Some("xue2 xi2".to_string()),
        english: None,
    };
    let first = store.create_word(word.clone()).unwrap();
    let second = store.create_word(word).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.find_word("学习").unwrap().len(), 1);
}

#[test]
fn create_word_does_not_overwrite_existing_fields() {
    let store = common::store();
    let stub = store.create_word(NewWord::stub("你好")).unwrap();
    let again = store
        .create_word(NewWord {
            english: Some("hello".to_string()),
            ..NewWord::stub("你好")
        })
        .unwrap();
    assert_eq!(again.id, stub.id);
    assert_eq!(again.english, None);
}

#[test]
fn traditional_equal_to_simplified_is_dropped() {
    let store = common::store();
    let word = store
        .create_word(NewWord {
            traditional: Some("你好".to_string()),
            ..NewWord::stub("你好")
        })
        .unwrap();
    assert_eq!(word.traditional, None);
}

#[test]
fn word_found_by_either_form() {
    let store = common::store();
    let word = store
        .create_word(NewWord {
            traditional: Some("漢字".to_string()),
            ..NewWord::stub("汉字")
        })
        .unwrap();
    assert_eq!(store.find_word("漢字").unwrap(), vec![word.clone()]);
    assert_eq!(store.find_word("汉字").unwrap(), vec![word]);
}

#[test]
fn empty_word_is_rejected() {
    let store = common::store();
    let result = store.create_word(NewWord::stub("  "));
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[test]
fn word_links_characters_of_both_forms() {
    let store = common::store();
    let word = store
        .create_word(NewWord {
            traditional: Some("漢字".to_string()),
            ..NewWord::stub("汉字")
        })
        .unwrap();
    assert_eq!(glyphs(&store, EntityRef::Word(word.id)), vec!["汉", "字", "漢"]);

    let han = store.get_character("漢").unwrap().unwrap();
    let linked: Vec<i64> = store
        .linked_words(EntityRef::Character(han.id))
        .unwrap()
        .into_iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(linked, vec![word.id]);
}

#[test]
fn sentence_links_characters_and_known_words() {
    let store = common::store();
    let known = store
        .create_word(NewWord {
            pinyin: Some("ni3 hao3".to_string()),
            ..NewWord::stub("你好")
        })
        .unwrap();

    let sentence = store.create_sentence(NewSentence::new("你好世界")).unwrap();
    let owner = EntityRef::Sentence(sentence.id);

    assert_eq!(glyphs(&store, owner), vec!["你", "好", "世", "界"]);

    let words = store.linked_words(owner).unwrap();
    assert!(words.contains(&known));
    assert_eq!(store.find_word("你好").unwrap(), vec![known]);

    let world = store
        .find_word("世界")
        .unwrap()
        .into_iter()
        .next()
        .expect("stub word created for 世界");
    assert_eq!(world.pinyin, None);
    assert_eq!(world.english, None);
    assert!(words.contains(&world));
    assert_eq!(glyphs(&store, EntityRef::Word(world.id)), vec!["世", "界"]);
}

#[test]
fn linking_twice_is_a_noop() {
    let store = common::store();
    let word = store.create_word(NewWord::stub("你好")).unwrap();
    let sentence = store.create_sentence(NewSentence::new("你好吗")).unwrap();

    let added = store
        .link(EntityRef::Sentence(sentence.id), EntityRef::Word(word.id))
        .unwrap();
    assert!(!added);
    let words = store.linked_words(EntityRef::Sentence(sentence.id)).unwrap();
    assert_eq!(words.iter().filter(|w| w.id == word.id).count(), 1);
}

#[test]
fn sentence_order_is_unique() {
    let store = common::store();
    let mut first = NewSentence::new("我们学习中文。");
    first.order = Some(1);
    store.create_sentence(first).unwrap();

    let mut second = NewSentence::new("他们学习中文。");
    second.order = Some(1);
    let result = store.create_sentence(second);
    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert!(store.find_sentence("他们学习中文。").unwrap().is_empty());
}

#[test]
fn rank_held_by_another_character_conflicts() {
    let store = common::store();
    store.assign_rank("的", 1).unwrap();
    let result = store.assign_rank("一", 1);
    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(store.get_character("一").unwrap().unwrap().rank, None);
}

#[test]
fn tags_are_case_insensitive() {
    let store = common::store();
    let word = store.create_word(NewWord::stub("你好")).unwrap();
    let owner = EntityRef::Word(word.id);

    let first = store.attach_tag(owner, "HSK1").unwrap();
    let second = store.attach_tag(owner, "hsk1").unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(store.tags_of(owner).unwrap(), vec![first]);

    assert!(store.detach_tag(owner, "Hsk1").unwrap());
    assert!(store.tags_of(owner).unwrap().is_empty());
    assert!(!store.detach_tag(owner, "hsk1").unwrap());
}

#[test]
fn tag_command_reports_changes() {
    let ctx = common::context();
    ctx.store.create_word(NewWord::stub("你好")).unwrap();

    let added = commands::tag(&ctx, EntryKind::Word, "你好", "greeting", false).unwrap();
    assert!(added.changed);
    assert_eq!(added.tags.len(), 1);

    let again = commands::tag(&ctx, EntryKind::Word, "你好", "Greeting", false).unwrap();
    assert!(!again.changed);

    let removed = commands::tag(&ctx, EntryKind::Word, "你好", "greeting", true).unwrap();
    assert!(removed.changed);
    assert!(removed.tags.is_empty());
}

#[test]
fn tag_command_requires_existing_entry() {
    let ctx = common::context();
    let result = commands::tag(&ctx, EntryKind::Sentence, "不存在。", "x", false);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn add_sentence_command_attaches_tags() {
    let ctx = common::context();
    let mut sentence = NewSentence::new("你好吗？");
    sentence.english = Some("How are you?".to_string());
    let stored = commands::add_sentence(&ctx, sentence, &["daily".to_string()]).unwrap();

    assert_eq!(stored.entry.english.as_deref(), Some("How are you?"));
    let names: Vec<&str> = stored.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["daily"]);
}
