use std::path::PathBuf;

use anyhow::{Context, Result};
use vyper_guard::cache::FileCache;

use super::load_config;

pub fn clear(cache_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let dir = cache_dir.unwrap_or_else(|| config.global.cache_dir.clone());
    let mut cache = FileCache::open(dir.clone())
        .with_context(|| format!("Failed to open cache: {}", dir.display()))?;
    let dropped = cache.len();
    cache.clear()?;
    println!("Cleared {dropped} cached responses from {}", dir.display());
    Ok(())
}
