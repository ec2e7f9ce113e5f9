pub mod cache;
pub mod classify;
pub mod init;
pub mod list;
pub mod networks;
pub mod scan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use vyper_guard::config::Config;
use vyper_guard::Network;

use crate::DEFAULT_CONFIG;

/// Load the config file, falling back to defaults when absent.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    Config::load(&path)
}

/// Networks named on the command line, or every network the config enables.
pub fn select_networks(names: Option<Vec<String>>, config: &Config) -> Result<Vec<Network>> {
    let Some(names) = names else {
        return Ok(config.enabled_networks());
    };
    let mut networks = names
        .iter()
        .map(|n| n.parse::<Network>().with_context(|| format!("--network {n}")))
        .collect::<Result<Vec<_>>>()?;
    // Scan order is fixed regardless of how they were listed
    networks.sort();
    networks.dedup();
    Ok(networks)
}
