use std::path::Path;

use anyhow::Result;
use vyper_guard::config::Config;

use crate::DEFAULT_CONFIG;

pub fn run() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG);
    if path.exists() {
        eprintln!("Config file already exists: {}", path.display());
        return Ok(());
    }
    std::fs::write(path, Config::default_toml())?;
    println!("Created {}", path.display());
    Ok(())
}
