//! Character decomposition lookups (components, compounds, variants).

use crate::error::TableError;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Mutex;

/// Structural relations of a single character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Decomposition {
    /// Components the character is built from.
    pub compositions: Vec<String>,
    /// Characters that contain this one as a component.
    pub supercompositions: Vec<String>,
    pub variants: Vec<String>,
}

/// Source of decomposition data.
pub trait DecompositionSource {
    fn decompose(&self, glyph: &str) -> Option<Decomposition>;
}

/// Decomposition data held in memory.
///
/// # Format
/// ```text
/// # glyph<TAB>compositions<TAB>supercompositions<TAB>variants
/// 好	女子	恏
/// ```
/// Each list column is a run of characters; whitespace is ignored and
/// trailing columns may be omitted.
#[derive(Debug, Clone, Default)]
pub struct DecompositionTable {
    entries: HashMap<String, Decomposition>,
}

impl DecompositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, glyph: impl Into<String>, decomposition: Decomposition) {
        self.entries.insert(glyph.into(), decomposition);
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let mut table = Self::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let glyph = fields.next().map(str::trim).unwrap_or_default();
            if glyph.chars().count() != 1 {
                return Err(TableError::InvalidLine {
                    line: idx + 1,
                    reason: format!("expected a single character, got {:?}", glyph),
                });
            }

            let mut column = || split_glyphs(fields.next().unwrap_or_default());
            let decomposition = Decomposition {
                compositions: column(),
                supercompositions: column(),
                variants: column(),
            };
            table.insert(glyph, decomposition);
        }

        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl DecompositionSource for DecompositionTable {
    fn decompose(&self, glyph: &str) -> Option<Decomposition> {
        self.entries.get(glyph).cloned()
    }
}

fn split_glyphs(field: &str) -> Vec<String> {
    field
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(String::from)
        .collect()
}

/// Bounded memoization in front of a decomposition source.
///
/// Misses are cached too. When full, the oldest entry is evicted.
pub struct MemoTable<S> {
    source: S,
    capacity: usize,
    inner: Mutex<MemoInner>,
}

#[derive(Default)]
struct MemoInner {
    entries: HashMap<String, Option<Decomposition>>,
    order: VecDeque<String>,
}

impl<S: DecompositionSource> MemoTable<S> {
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            capacity: capacity.max(1),
            inner: Mutex::new(MemoInner::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: DecompositionSource> DecompositionSource for MemoTable<S> {
    fn decompose(&self, glyph: &str) -> Option<Decomposition> {
        if let Some(cached) = self.lock().entries.get(glyph) {
            return cached.clone();
        }

        let result = self.source.decompose(glyph);

        let mut inner = self.lock();
        if !inner.entries.contains_key(glyph) {
            if inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
            inner.order.push_back(glyph.to_string());
            inner.entries.insert(glyph.to_string(), result.clone());
        }
        result
    }
}
