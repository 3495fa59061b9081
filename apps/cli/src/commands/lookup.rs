//! Exact lookup across characters, words and sentences.

use zhlib_core::{LookupResult, Result};

use super::Context;

pub fn lookup(ctx: &Context, query: &str) -> Result<LookupResult> {
    let result = zhlib_core::lookup(&ctx.store, query)?;
    if result.is_empty() {
        tracing::debug!(query, "no entries");
    }
    Ok(result)
}
