//! Cross-link discovery run after a word or sentence is created.
//!
//! Discovery is a pure function of the new entity's text; applying the
//! result goes through the store's get-or-create and add-if-absent
//! operations, so replaying it is harmless.

use crate::error::Result;
use crate::segmenter::Segmenter;
use crate::store::DictionaryStore;
use crate::types::{EntityRef, NewWord, Sentence, Word};
use serde::Serialize;

/// Newly created entity whose contents should be linked.
#[derive(Debug, Clone, Copy)]
pub enum LinkSource<'a> {
    Word(&'a Word),
    Sentence(&'a Sentence),
}

/// Characters and words to link to `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSet {
    pub owner: EntityRef,
    pub characters: Vec<String>,
    pub words: Vec<String>,
}

/// Outcome of applying a link set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub characters_linked: usize,
    pub words_linked: usize,
    pub words_created: usize,
}

/// Work out which characters and words `source` contains.
///
/// A word contributes the characters of both script forms. A sentence
/// contributes its characters and its word candidates.
pub fn discover_and_link(segmenter: &Segmenter, source: LinkSource<'_>) -> LinkSet {
    match source {
        LinkSource::Word(word) => {
            let mut text = word.simplified.clone();
            if let Some(traditional) = &word.traditional {
                text.push_str(traditional);
            }
            LinkSet {
                owner: EntityRef::Word(word.id),
                characters: segmenter.characters(&text),
                words: Vec::new(),
            }
        }
        LinkSource::Sentence(sentence) => LinkSet {
            owner: EntityRef::Sentence(sentence.id),
            characters: segmenter.characters(&sentence.text),
            words: segmenter.words(&sentence.text),
        },
    }
}

/// Store every link in `links`, creating stub characters and words as needed.
pub fn apply_links<S>(store: &S, links: &LinkSet) -> Result<LinkReport>
where
    S: DictionaryStore + ?Sized,
{
    let mut report = LinkReport::default();

    for glyph in &links.characters {
        let character = store.get_or_create_character(glyph)?;
        if store.link(links.owner, EntityRef::Character(character.id))? {
            report.characters_linked += 1;
        } else {
            tracing::debug!(glyph = %glyph, owner = ?links.owner, "character already linked");
        }
    }

    for form in &links.words {
        let word = match store.find_word(form)?.into_iter().next() {
            Some(word) => word,
            None => {
                tracing::debug!(word = %form, "creating stub word");
                report.words_created += 1;
                store.create_word(NewWord::stub(form.as_str()))?
            }
        };
        if store.link(links.owner, EntityRef::Word(word.id))? {
            report.words_linked += 1;
        } else {
            tracing::debug!(word = %form, owner = ?links.owner, "word already linked");
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn word_links_characters_of_both_forms() {
        let segmenter = Segmenter::new();
        let word = Word {
            id: 3,
            simplified: "汉字".to_string(),
            traditional: Some("漢字".to_string()),
            pinyin: None,
            english: None,
        };
        let links = discover_and_link(&segmenter, LinkSource::Word(&word));
        assert_eq!(links.owner, EntityRef::Word(3));
        assert_eq!(links.characters, vec!["汉", "字", "漢"]);
        assert!(links.words.is_empty());
    }

    #[test]
    fn sentence_links_characters_and_words() {
        let segmenter = Segmenter::new();
        let sentence = Sentence {
            id: 9,
            text: "你好，世界。".to_string(),
            pinyin: None,
            english: None,
            order: None,
        };
        let links = discover_and_link(&segmenter, LinkSource::Sentence(&sentence));
        assert_eq!(links.owner, EntityRef::Sentence(9));
        assert_eq!(links.characters, vec!["你", "好", "世", "界"]);
        assert!(links.words.contains(&"你好".to_string()), "{:?}", links.words);
    }
}
