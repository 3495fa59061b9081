//! Command-line front end and SQLite dictionary store for zhlib.

pub mod commands;
pub mod config;
pub mod db;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zhlib_core::{NewCharacter, NewSentence, NewWord};

use crate::commands::{ClassifyOptions, Context, EntryKind};
use crate::config::Config;

/// Chinese text difficulty classifier and reference dictionary.
#[derive(Debug, Parser)]
#[command(name = "zhlib", version, about)]
pub struct Cli {
    /// Dictionary database (overrides ZHLIB_DATABASE).
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Word frequency table (overrides ZHLIB_FREQUENCY_TABLE).
    #[arg(long, global = true)]
    pub frequency_table: Option<PathBuf>,

    /// Character decomposition table (overrides ZHLIB_DECOMPOSITIONS).
    #[arg(long, global = true)]
    pub decompositions: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every character and word of a text by difficulty.
    Classify {
        /// Text file to read; stdin when omitted.
        file: Option<PathBuf>,
        /// Linked words and sentences per entry (overrides ZHLIB_LINK_LIMIT).
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        min_rank: Option<f64>,
        #[arg(long)]
        max_rank: Option<f64>,
        #[arg(long)]
        min_frequency: Option<f64>,
        #[arg(long)]
        max_frequency: Option<f64>,
    },
    /// Look up a character, word or sentence exactly.
    Lookup { query: String },
    /// Add a character or complete an existing one.
    AddCharacter {
        glyph: String,
        #[arg(long)]
        pinyin: Option<String>,
        #[arg(long)]
        meaning: Option<String>,
        #[arg(long)]
        heisig: Option<i64>,
        #[arg(long)]
        kanji: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Add a word and link its characters.
    AddWord {
        simplified: String,
        #[arg(long)]
        traditional: Option<String>,
        #[arg(long)]
        pinyin: Option<String>,
        #[arg(long)]
        english: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Add a sentence and link its characters and words.
    AddSentence {
        text: String,
        #[arg(long)]
        pinyin: Option<String>,
        #[arg(long)]
        english: Option<String>,
        #[arg(long)]
        order: Option<i64>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Attach a tag to an entry, or remove it.
    Tag {
        #[arg(value_enum)]
        kind: EntryKind,
        key: String,
        name: String,
        #[arg(long)]
        remove: bool,
    },
    /// Assign character ranks from a `rank<TAB>glyph` file.
    ImportRanks { file: PathBuf },
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config.database = database;
    }
    if cli.frequency_table.is_some() {
        config.frequency_table = cli.frequency_table;
    }
    if cli.decompositions.is_some() {
        config.decompositions = cli.decompositions;
    }

    tracing::debug!(database = %config.database.display(), "opening dictionary");
    let ctx = Context::open(&config)?;

    match cli.command {
        Command::Classify {
            file,
            limit,
            min_rank,
            max_rank,
            min_frequency,
            max_frequency,
        } => {
            let text = match file {
                Some(path) => fs::read_to_string(&path)?,
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let mut options = ClassifyOptions::new(limit.unwrap_or(ctx.link_limit));
            options.ranks = min_rank.unwrap_or(f64::NEG_INFINITY)..=max_rank.unwrap_or(f64::INFINITY);
            options.frequencies =
                min_frequency.unwrap_or(f64::NEG_INFINITY)..=max_frequency.unwrap_or(f64::INFINITY);
            print_json(&commands::classify(&ctx, &text, &options)?)
        }
        Command::Lookup { query } => print_json(&commands::lookup(&ctx, &query)?),
        Command::AddCharacter {
            glyph,
            pinyin,
            meaning,
            heisig,
            kanji,
            tags,
        } => {
            let entry = NewCharacter {
                glyph,
                pinyin,
                meaning,
                heisig,
                kanji,
            };
            print_json(&commands::add_character(&ctx, &entry, &tags)?)
        }
        Command::AddWord {
            simplified,
            traditional,
            pinyin,
            english,
            tags,
        } => {
            let word = NewWord {
                simplified,
                traditional,
                pinyin,
                english,
            };
            print_json(&commands::add_word(&ctx, word, &tags)?)
        }
        Command::AddSentence {
            text,
            pinyin,
            english,
            order,
            tags,
        } => {
            let sentence = NewSentence {
                text,
                pinyin,
                english,
                order,
            };
            print_json(&commands::add_sentence(&ctx, sentence, &tags)?)
        }
        Command::Tag {
            kind,
            key,
            name,
            remove,
        } => print_json(&commands::tag(&ctx, kind, &key, &name, remove)?),
        Command::ImportRanks { file } => {
            let imported = commands::import_ranks(&ctx, &file)?;
            print_json(&serde_json::json!({ "imported": imported }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
