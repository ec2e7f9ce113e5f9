use std::path::PathBuf;

use anyhow::Result;
use vyper_guard::store::ContractStore;

use super::{load_config, select_networks};

pub fn run(
    networks: Option<Vec<String>>,
    output_dir: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config)?;
    let networks = select_networks(networks, &config)?;
    let store = ContractStore::new(output_dir.unwrap_or_else(|| config.global.output_dir.clone()));

    let mut total = 0;
    for network in networks {
        let files = store.flagged(network)?;
        if files.is_empty() {
            continue;
        }
        println!("{network} ({})", files.len());
        for file in &files {
            println!("  {}", file.display());
        }
        total += files.len();
    }

    println!("\nTotal: {total} flagged contracts in {}", store.root().display());
    Ok(())
}
