use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, ScanError};
use crate::network::Network;

/// Schema version — bump when the cached artifact layout changes
const SCHEMA_VERSION: u32 = 1;

/// Identity of a cached explorer response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub network: Network,
    pub address: String,
}

impl CacheKey {
    pub fn new(network: Network, address: &str) -> Self {
        Self {
            network,
            address: address.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.network, self.address)
    }
}

/// Key/value store for raw explorer responses. Entries never expire.
pub trait SourceCache {
    fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>>;

    fn put(&mut self, key: &CacheKey, value: &serde_json::Value) -> Result<()>;
}

/// In-process cache, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<CacheKey, serde_json::Value>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SourceCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &CacheKey, value: &serde_json::Value) -> Result<()> {
        self.entries.insert(key.clone(), value.clone());
        Ok(())
    }
}

/// Artifact body. The response is kept as JSON text since bincode can't
/// round-trip a self-describing `serde_json::Value`.
#[derive(Serialize, Deserialize)]
struct CachedResponse {
    key: String,
    body: String,
}

/// Cache manifest mapping `network:address` to artifact files
#[derive(Serialize, Deserialize)]
struct Manifest {
    schema_version: u32,
    entries: HashMap<String, String>,
}

impl Manifest {
    fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// Persistent cache: `manifest.json` plus one bincode artifact per response.
pub struct FileCache {
    cache_dir: PathBuf,
    manifest: Manifest,
}

impl FileCache {
    /// Open or create a cache in the given directory
    pub fn open(cache_dir: PathBuf) -> Result<Self> {
        let artifacts_dir = cache_dir.join("artifacts");
        fs::create_dir_all(&artifacts_dir).map_err(|e| ScanError::io(&artifacts_dir, e))?;

        let manifest_path = cache_dir.join("manifest.json");
        let manifest = if manifest_path.exists() {
            let data =
                fs::read_to_string(&manifest_path).map_err(|e| ScanError::io(&manifest_path, e))?;
            match serde_json::from_str::<Manifest>(&data) {
                // Invalidate if schema version changed
                Ok(m) if m.schema_version == SCHEMA_VERSION => m,
                Ok(_) => {
                    tracing::info!("cache schema changed, starting empty");
                    Manifest::empty()
                }
                Err(e) => {
                    tracing::warn!("unreadable cache manifest {}: {e}", manifest_path.display());
                    Manifest::empty()
                }
            }
        } else {
            Manifest::empty()
        };

        Ok(Self {
            cache_dir,
            manifest,
        })
    }

    /// Compute SHA256 hash of a cache key
    pub fn hash_key(key: &CacheKey) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn len(&self) -> usize {
        self.manifest.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifest.entries.is_empty()
    }

    /// Flush manifest to disk
    pub fn flush(&self) -> Result<()> {
        let manifest_path = self.cache_dir.join("manifest.json");
        let data = serde_json::to_string_pretty(&self.manifest)
            .map_err(|e| ScanError::Cache(e.to_string()))?;
        fs::write(&manifest_path, data).map_err(|e| ScanError::io(&manifest_path, e))
    }

    /// Clear all cached artifacts
    pub fn clear(&mut self) -> Result<()> {
        let artifacts_dir = self.cache_dir.join("artifacts");
        if artifacts_dir.exists() {
            fs::remove_dir_all(&artifacts_dir).map_err(|e| ScanError::io(&artifacts_dir, e))?;
        }
        fs::create_dir_all(&artifacts_dir).map_err(|e| ScanError::io(&artifacts_dir, e))?;
        self.manifest.entries.clear();
        self.flush()
    }
}

impl SourceCache for FileCache {
    fn get(&self, key: &CacheKey) -> Result<Option<serde_json::Value>> {
        let Some(artifact_file) = self.manifest.entries.get(&key.to_string()) else {
            return Ok(None);
        };
        let artifact_path = self.cache_dir.join("artifacts").join(artifact_file);
        // A manifest entry whose artifact vanished is a miss, not an error.
        let Ok(data) = fs::read(&artifact_path) else {
            tracing::warn!("cache artifact missing for {key}");
            return Ok(None);
        };
        // Unreadable or mismatched artifacts are refetched and overwritten.
        let cached = match bincode::deserialize::<CachedResponse>(&data) {
            Ok(cached) if cached.key == key.to_string() => cached,
            Ok(cached) => {
                tracing::warn!("cache artifact for {key} holds {}", cached.key);
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("corrupt cache artifact for {key}: {e}");
                return Ok(None);
            }
        };
        match serde_json::from_str(&cached.body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("corrupt cached response for {key}: {e}");
                Ok(None)
            }
        }
    }

    fn put(&mut self, key: &CacheKey, value: &serde_json::Value) -> Result<()> {
        let hash = Self::hash_key(key);
        let artifact_name = format!("{}.bin", &hash[..16]);
        let artifact_path = self.cache_dir.join("artifacts").join(&artifact_name);

        let cached = CachedResponse {
            key: key.to_string(),
            body: value.to_string(),
        };
        let data = bincode::serialize(&cached).map_err(|e| ScanError::Cache(e.to_string()))?;
        fs::write(&artifact_path, data).map_err(|e| ScanError::io(&artifact_path, e))?;

        self.manifest.entries.insert(key.to_string(), artifact_name);
        // Flushed per entry so an aborted run keeps what it already fetched
        self.flush()
    }
}
