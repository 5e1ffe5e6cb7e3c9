//! Cache command handlers.

use anyhow::{Context, Result};
use shprompt_core::cache::Cache;
use shprompt_core::config;

pub fn path() {
    println!("{}", config::paths::cache_path().display());
}

pub fn clear() -> Result<()> {
    let mut cache = Cache::load();
    let entries = cache.len();
    cache
        .clear()
        .with_context(|| format!("clear cache at {}", cache.path().display()))?;
    println!("Cleared {entries} cached entries");
    Ok(())
}
