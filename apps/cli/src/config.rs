//! Runtime configuration read from the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_LINK_LIMIT: usize = 10;
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database: PathBuf,
    /// Tab-separated `word<TAB>frequency` corpus. None means every word is unknown.
    pub frequency_table: Option<PathBuf>,
    pub decompositions: Option<PathBuf>,
    /// Cap on linked words and sentences shown per entry.
    pub link_limit: usize,
    pub cache_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = |key: &str| var(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        let count = |key: &str, default: usize| -> Result<usize> {
            match var(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw)),
                None => Ok(default),
            }
        };

        Ok(Self {
            database: path("ZHLIB_DATABASE").unwrap_or_else(default_database_path),
            frequency_table: path("ZHLIB_FREQUENCY_TABLE"),
            decompositions: path("ZHLIB_DECOMPOSITIONS"),
            link_limit: count("ZHLIB_LINK_LIMIT", DEFAULT_LINK_LIMIT)?,
            cache_capacity: count("ZHLIB_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?,
        })
    }
}

/// `<local data dir>/zhlib/dict.db`, or `./dict.db` when there is no data dir.
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("zhlib").join("dict.db"))
        .unwrap_or_else(|| PathBuf::from("dict.db"))
}
