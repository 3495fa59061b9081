//! Rank and frequency resolution.

use crate::error::{Result, TableError};
use crate::store::CharacterRepository;
use crate::types::Character;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Scale applied to corpus frequencies so that values read like `37.5`
/// instead of `0.0000375`.
pub const FREQ_FACTOR: f64 = 1_000_000.0;

/// Language code used for frequency lookups.
pub const LANGUAGE: &str = "zh";

/// Word-frequency reference corpus.
pub trait FrequencyCorpus {
    /// Frequency of `word` as a fraction of all tokens; 0 when unknown.
    fn frequency(&self, word: &str, language: &str) -> f64;
}

/// Corpus that knows no words.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCorpus;

impl FrequencyCorpus for EmptyCorpus {
    fn frequency(&self, _word: &str, _language: &str) -> f64 {
        0.0
    }
}

/// In-memory frequency table for a single language.
///
/// # Format
/// ```text
/// # word<TAB>frequency
/// 的	0.0406
/// 你好	0.0000375
/// ```
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    language: String,
    entries: HashMap<String, f64>,
}

impl FrequencyTable {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, word: impl Into<String>, frequency: f64) {
        self.entries.insert(word.into(), frequency);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_reader<R: BufRead>(
        language: impl Into<String>,
        reader: R,
    ) -> std::result::Result<Self, TableError> {
        let mut table = Self::new(language);

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed.split('\t');
            let word = fields.next().map(str::trim).unwrap_or_default();
            let value = fields.next().map(str::trim).ok_or_else(|| TableError::InvalidLine {
                line: line_num,
                reason: "missing frequency".to_string(),
            })?;
            let frequency: f64 = value.parse().map_err(|_| TableError::InvalidLine {
                line: line_num,
                reason: format!("invalid frequency: {}", value),
            })?;
            if word.is_empty() || !frequency.is_finite() || frequency < 0.0 {
                return Err(TableError::InvalidLine {
                    line: line_num,
                    reason: format!("invalid entry: {}", trimmed),
                });
            }

            table.insert(word, frequency);
        }

        Ok(table)
    }

    pub fn from_path(
        language: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> std::result::Result<Self, TableError> {
        let file = File::open(path)?;
        Self::from_reader(language, BufReader::new(file))
    }
}

impl FrequencyCorpus for FrequencyTable {
    fn frequency(&self, word: &str, language: &str) -> f64 {
        if language != self.language {
            return 0.0;
        }
        self.entries.get(word).copied().unwrap_or(0.0)
    }
}

/// Resolves character ranks from the store and word frequencies from a
/// reference corpus.
pub struct RankResolver<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    corpus: &'a C,
}

impl<'a, S, C> RankResolver<'a, S, C>
where
    S: CharacterRepository + ?Sized,
    C: FrequencyCorpus + ?Sized,
{
    pub fn new(store: &'a S, corpus: &'a C) -> Self {
        Self { store, corpus }
    }

    /// Stored entry of `glyph` together with its rank.
    pub fn character(&self, glyph: &str) -> Result<(Option<u32>, Option<Character>)> {
        let entry = self.store.get_character(glyph)?;
        Ok((entry.as_ref().and_then(|c| c.rank), entry))
    }

    /// Stored rank of `glyph`; `None` when unknown or never ranked.
    pub fn character_rank(&self, glyph: &str) -> Result<Option<u32>> {
        Ok(self.character(glyph)?.0)
    }

    /// Scaled usage frequency of a word's simplified form; 0 when unknown.
    pub fn word_frequency(&self, simplified: &str) -> f64 {
        let frequency = self.corpus.frequency(simplified, LANGUAGE) * FREQ_FACTOR;
        if frequency.is_finite() && frequency > 0.0 {
            frequency
        } else {
            0.0
        }
    }
}

/// Parse a character rank list.
///
/// Each non-blank line is `rank<TAB>glyph[<TAB>...]`; extra columns are
/// ignored.
pub fn parse_rank_list<R: BufRead>(reader: R) -> std::result::Result<Vec<(u32, String)>, TableError> {
    let mut ranks = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split('\t').map(str::trim);
        let rank_str = fields.next().unwrap_or_default();
        let rank: u32 = rank_str.parse().map_err(|_| TableError::InvalidLine {
            line: line_num,
            reason: format!("invalid rank: {}", rank_str),
        })?;
        let glyph = fields
            .next()
            .filter(|g| g.chars().count() == 1)
            .ok_or_else(|| TableError::InvalidLine {
                line: line_num,
                reason: "expected a single character".to_string(),
            })?;

        ranks.push((rank, glyph.to_string()));
    }

    Ok(ranks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewCharacter;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct RankedCharacters(HashMap<String, u32>);

    impl CharacterRepository for RankedCharacters {
        fn get_character(&self, glyph: &str) -> Result<Option<Character>> {
            Ok(self.0.get(glyph).map(|rank| Character {
                id: 1,
                glyph: glyph.to_string(),
                pinyin: None,
                meaning: None,
                heisig: None,
                kanji: None,
                rank: Some(*rank),
            }))
        }

        fn get_or_create_character(&self, _glyph: &str) -> Result<Character> {
            unimplemented!()
        }

        fn upsert_character(&self, _entry: &NewCharacter) -> Result<Character> {
            unimplemented!()
        }

        fn assign_rank(&self, _glyph: &str, _rank: u32) -> Result<Character> {
            unimplemented!()
        }
    }

    #[test]
    fn character_rank_from_store() {
        let store = RankedCharacters(HashMap::from([("的".to_string(), 1)]));
        let resolver = RankResolver::new(&store, &EmptyCorpus);
        assert_eq!(resolver.character_rank("的").unwrap(), Some(1));
        assert_eq!(resolver.character_rank("龘").unwrap(), None);
    }

    #[test]
    fn word_frequency_is_scaled() {
        let store = RankedCharacters(HashMap::new());
        let mut table = FrequencyTable::new(LANGUAGE);
        table.insert("你好", 0.0000375);
        let resolver = RankResolver::new(&store, &table);
        assert!((resolver.word_frequency("你好") - 37.5).abs() < 1e-9);
        assert_eq!(resolver.word_frequency("龘龘"), 0.0);
    }

    #[test]
    fn frequency_table_ignores_other_languages() {
        let mut table = FrequencyTable::new("zh");
        table.insert("你好", 0.5);
        assert_eq!(table.frequency("你好", "ja"), 0.0);
        assert_eq!(table.frequency("你好", "zh"), 0.5);
    }

    #[test]
    fn frequency_table_from_tsv() {
        let input = "# comment\n的\t0.0406\n\n你好\t3.75e-5\n";
        let table = FrequencyTable::from_reader(LANGUAGE, input.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.frequency("的", LANGUAGE), 0.0406);
    }

    #[test]
    fn frequency_table_rejects_bad_numbers() {
        let input = "的\tlots\n";
        let result = FrequencyTable::from_reader(LANGUAGE, input.as_bytes());
        assert!(matches!(result, Err(TableError::InvalidLine { line: 1, .. })));
    }

    #[test]
    fn rank_list_parses_rank_and_glyph() {
        let input = "1\t的\t7922684\n2\t一\t3050722\n\n3\t是\n";
        let ranks = parse_rank_list(input.as_bytes()).unwrap();
        assert_eq!(
            ranks,
            vec![(1, "的".to_string()), (2, "一".to_string()), (3, "是".to_string())]
        );
    }

    #[test]
    fn rank_list_rejects_missing_glyph() {
        let input = "1\t的\n2\n";
        let result = parse_rank_list(input.as_bytes());
        assert!(matches!(result, Err(TableError::InvalidLine { line: 2, .. })));
    }
}
