use std::collections::HashMap;

use crate::error::{Result, ScanError};
use crate::network::Network;

/// Round-robin pool of explorer API keys for one network.
#[derive(Debug, Clone)]
pub struct ApiKeyPool {
    keys: Vec<String>,
    cursor: usize,
}

impl ApiKeyPool {
    /// Returns None for an empty key list.
    pub fn new(keys: Vec<String>) -> Option<Self> {
        if keys.is_empty() {
            return None;
        }
        Some(Self { keys, cursor: 0 })
    }

    /// Split a comma-separated list, dropping blank entries.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Key at the cursor; advances the cursor modulo pool size.
    pub fn next_key(&mut self) -> &str {
        let idx = self.cursor;
        self.cursor = (self.cursor + 1) % self.keys.len();
        &self.keys[idx]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// One [`ApiKeyPool`] per network, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pools: HashMap<Network, ApiKeyPool>,
}

impl ApiKeys {
    /// Read each network's key variable from the process environment.
    pub fn from_env(networks: &[Network]) -> Result<Self> {
        Self::from_lookup(networks, |var| std::env::var(var).ok())
    }

    /// Build pools through an arbitrary variable lookup.
    pub fn from_lookup<F>(networks: &[Network], lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut pools = HashMap::new();
        for &network in networks {
            let var = network.api_key_var();
            let pool = lookup(var)
                .as_deref()
                .and_then(ApiKeyPool::parse)
                .ok_or(ScanError::MissingApiKeys { network, var })?;
            pools.insert(network, pool);
        }
        Ok(Self { pools })
    }

    pub fn insert(&mut self, network: Network, pool: ApiKeyPool) {
        self.pools.insert(network, pool);
    }

    pub fn pool_mut(&mut self, network: Network) -> Option<&mut ApiKeyPool> {
        self.pools.get_mut(&network)
    }

    pub fn contains(&self, network: Network) -> bool {
        self.pools.contains_key(&network)
    }
}
