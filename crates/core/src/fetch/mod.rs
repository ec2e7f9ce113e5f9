pub mod transport;

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::{CacheKey, SourceCache};
use crate::error::{Result, ScanError};
use crate::keys::ApiKeys;
use crate::network::Network;

pub use transport::{ExplorerTransport, HttpTransport};

/// Verified source for one contract, as reported by its explorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceResult {
    pub source_code: String,
    /// Semantic version, e.g. `0.3.0` out of `vyper:0.3.0`
    pub compiler_version: String,
    #[serde(skip)]
    pub raw_response: serde_json::Value,
}

/// Fetches verified sources, consulting the cache before the explorer.
pub struct SourceFetcher<T, C> {
    transport: T,
    cache: C,
    keys: ApiKeys,
    api_urls: HashMap<Network, String>,
}

impl<T: ExplorerTransport, C: SourceCache> SourceFetcher<T, C> {
    pub fn new(transport: T, cache: C, keys: ApiKeys) -> Self {
        Self {
            transport,
            cache,
            keys,
            api_urls: HashMap::new(),
        }
    }

    /// Point a network at a non-default explorer endpoint.
    pub fn with_api_url(mut self, network: Network, url: impl Into<String>) -> Self {
        self.api_urls.insert(network, url.into());
        self
    }

    pub fn api_url(&self, network: Network) -> &str {
        self.api_urls
            .get(&network)
            .map(String::as_str)
            .unwrap_or_else(|| network.default_api_url())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Fetch source for `address`. A cached response is returned without
    /// touching the network or the key pool.
    pub fn fetch(&mut self, network: Network, address: &str) -> Result<SourceResult> {
        let key = CacheKey::new(network, address);
        if let Some(raw) = self.cache.get(&key)? {
            tracing::trace!(%key, "cache hit");
            return parse_response(network, address, raw);
        }

        let api_url = self.api_url(network).to_string();
        let api_key = self
            .keys
            .pool_mut(network)
            .ok_or(ScanError::MissingApiKeys {
                network,
                var: network.api_key_var(),
            })?
            .next_key()
            .to_string();

        tracing::debug!(%network, %address, %api_url, "requesting verified source");
        let raw = self
            .transport
            .get_source(network, &api_url, address, &api_key)?;

        // Only well-formed responses are worth keeping
        let result = parse_response(network, address, raw)?;
        self.cache.put(&key, &result.raw_response)?;
        Ok(result)
    }
}

/// Pull `SourceCode` and `CompilerVersion` out of the first `result` entry.
pub fn parse_response(
    network: Network,
    address: &str,
    raw: serde_json::Value,
) -> Result<SourceResult> {
    let malformed = |reason: String| ScanError::MalformedResponse {
        network,
        address: address.to_string(),
        reason,
    };

    let first = match raw.get("result") {
        Some(serde_json::Value::Array(entries)) => entries
            .first()
            .ok_or_else(|| malformed("empty result list".to_string()))?,
        // Explorers report errors such as a bad API key as a string result
        Some(serde_json::Value::String(msg)) => {
            let message = raw.get("message").and_then(|m| m.as_str()).unwrap_or("");
            return Err(malformed(format!("{message} {msg}").trim().to_string()));
        }
        Some(_) => return Err(malformed("`result` is not a list".to_string())),
        None => return Err(malformed("missing `result`".to_string())),
    };

    let field = |name: &str| {
        first
            .get(name)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| malformed(format!("missing `{name}`")))
    };
    let source_code = field("SourceCode")?;
    let compiler_version = compiler_semver(&field("CompilerVersion")?).to_string();

    Ok(SourceResult {
        source_code,
        compiler_version,
        raw_response: raw,
    })
}

/// Suffix after the final `:` of a compound version string.
pub fn compiler_semver(compound: &str) -> &str {
    compound.rsplit(':').next().unwrap_or(compound).trim()
}
