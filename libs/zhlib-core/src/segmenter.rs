//! Extraction of Han characters and word candidates from running text.

use jieba_rs::Jieba;
use std::collections::HashSet;

/// Whether `c` belongs to the Han script.
pub fn is_han(c: char) -> bool {
    matches!(c,
        '\u{2E80}'..='\u{2EFF}'     // CJK Radicals Supplement
        | '\u{2F00}'..='\u{2FDF}'   // Kangxi Radicals
        | '\u{3005}' | '\u{3007}'
        | '\u{3021}'..='\u{3029}'
        | '\u{3038}'..='\u{303B}'
        | '\u{3400}'..='\u{4DBF}'   // Extension A
        | '\u{4E00}'..='\u{9FFF}'   // Unified Ideographs
        | '\u{F900}'..='\u{FAFF}'   // Compatibility Ideographs
        | '\u{20000}'..='\u{2A6DF}' // Extension B
        | '\u{2A700}'..='\u{2EBEF}' // Extensions C-F
        | '\u{2F800}'..='\u{2FA1F}' // Compatibility Supplement
        | '\u{30000}'..='\u{3134F}' // Extension G
    )
}

/// Whether `s` contains at least one Han character.
pub fn contains_han(s: &str) -> bool {
    s.chars().any(is_han)
}

/// Distinct Han characters of `text`, in order of first appearance.
pub fn find_characters(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.chars()
        .filter(|c| is_han(*c) && seen.insert(*c))
        .map(String::from)
        .collect()
}

/// Text analysis over a fixed language model.
///
/// The jieba dictionary is loaded once per instance; share one segmenter
/// across the store and the level engine.
pub struct Segmenter {
    jieba: Jieba,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    /// Segmenter over jieba's bundled dictionary.
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }

    /// Segmenter over a caller-supplied jieba model.
    pub fn with_model(jieba: Jieba) -> Self {
        Self { jieba }
    }

    /// Distinct Han characters of `text`.
    pub fn characters(&self, text: &str) -> Vec<String> {
        find_characters(text)
    }

    /// Distinct multi-character word candidates of `text`.
    ///
    /// Uses search-mode segmentation, so nested candidates are emitted too
    /// (`中华人民共和国` also yields `中华`, `人民`, `共和国` ...). Only tokens made
    /// entirely of Han characters are kept.
    pub fn words(&self, text: &str) -> Vec<String> {
        if !contains_han(text) {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut words = Vec::new();
        for token in self.jieba.cut_for_search(text, true) {
            let token = token.trim();
            if token.chars().count() < 2 || !token.chars().all(is_han) {
                continue;
            }
            if seen.insert(token) {
                words.push(token.to_string());
            }
        }
        words
    }
}
