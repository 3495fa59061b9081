//! Bulk import of reference data into the store.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context as _, Result};
use zhlib_core::parse_rank_list;

use super::Context;

/// Assign ranks from a `rank<TAB>glyph` list. Returns the number of lines applied.
pub fn import_ranks(ctx: &Context, path: &Path) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let ranks = parse_rank_list(BufReader::new(file))
        .with_context(|| format!("failed to parse rank list {}", path.display()))?;
    let imported = ctx.store.import_ranks(&ranks)?;
    Ok(imported)
}
