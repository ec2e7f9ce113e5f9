use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::network::Network;

/// Compiler releases shipping the broken nonreentrant lock
pub const DEFAULT_VULNERABLE_VERSIONS: [&str; 3] = ["0.2.15", "0.2.16", "0.3.0"];

/// Project-level configuration loaded from `.vyper-guard.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub suppressions: SuppressionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub vulnerable_versions: Vec<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("etherscan-export"),
            output_dir: PathBuf::from("contracts"),
            cache_dir: PathBuf::from(".vyper-guard-cache"),
            vulnerable_versions: DEFAULT_VULNERABLE_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub enabled: Option<bool>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Appended to the built-in safe-call allowlist
    pub extra_safe_calls: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    /// Glob patterns of addresses already reviewed
    pub addresses: Vec<String>,
}

impl Config {
    /// Load config from a TOML file path. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Reject `[networks.<name>]` tables naming an unsupported chain.
    pub fn validate(&self) -> crate::error::Result<()> {
        for name in self.networks.keys() {
            name.parse::<Network>()?;
        }
        Ok(())
    }

    /// `[networks.<name>]` table for a network; names match case-insensitively.
    pub fn network(&self, network: Network) -> Option<&NetworkConfig> {
        self.networks
            .iter()
            .find(|(name, _)| name.parse::<Network>().is_ok_and(|n| n == network))
            .map(|(_, cfg)| cfg)
    }

    /// Check if a network is enabled according to config.
    pub fn is_network_enabled(&self, network: Network) -> bool {
        self.network(network)
            .and_then(|n| n.enabled)
            .unwrap_or(true)
    }

    /// Enabled networks in scan order.
    pub fn enabled_networks(&self) -> Vec<Network> {
        Network::ALL
            .into_iter()
            .filter(|n| self.is_network_enabled(*n))
            .collect()
    }

    pub fn api_url(&self, network: Network) -> &str {
        self.network(network)
            .and_then(|n| n.api_url.as_deref())
            .unwrap_or_else(|| network.default_api_url())
    }

    pub fn vulnerable_versions(&self) -> BTreeSet<String> {
        self.global
            .vulnerable_versions
            .iter()
            .map(|v| v.trim().to_string())
            .collect()
    }

    /// Check if an address matches a suppression glob pattern.
    pub fn is_address_suppressed(&self, address: &str) -> bool {
        self.suppressions
            .addresses
            .iter()
            .any(|pattern| glob::Pattern::new(pattern).is_ok_and(|p| p.matches(address)))
    }

    /// Generate default config file content.
    pub fn default_toml() -> &'static str {
        r#"# vyper-guard configuration
# See: https://github.com/safestackai/vyper-guard

[global]
# One `<network>.csv` of `address,version` rows per network
input_dir = "etherscan-export"
# Flagged sources are saved as <output_dir>/<network>/<address>.vy
output_dir = "contracts"
cache_dir = ".vyper-guard-cache"
vulnerable_versions = ["0.2.15", "0.2.16", "0.3.0"]

# Per-network overrides
# [networks.celo]
# enabled = false

# [networks.ethereum]
# api_url = "https://api.etherscan.io/api"

[classifier]
# Extra raw_call argument markers treated as safe
extra_safe_calls = []

[suppressions]
# Glob patterns for addresses to skip entirely
addresses = []
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.global.output_dir, PathBuf::from("contracts"));
        assert_eq!(config.enabled_networks(), Network::ALL.to_vec());
        assert!(config.vulnerable_versions().contains("0.3.0"));
        assert_eq!(config.vulnerable_versions().len(), 3);
        assert_eq!(config.api_url(Network::Op), Network::Op.default_api_url());
    }

    #[test]
    fn test_default_toml_parses_to_defaults() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config.global.input_dir, PathBuf::from("etherscan-export"));
        assert_eq!(config.enabled_networks().len(), Network::ALL.len());
        assert!(config.classifier.extra_safe_calls.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[global]
vulnerable_versions = ["0.3.0"]

[networks.celo]
enabled = false

[networks.ethereum]
api_url = "http://localhost:8080/api"

[classifier]
extra_safe_calls = ["mint(address,uint256)"]

[suppressions]
addresses = ["0xdead*"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.vulnerable_versions().len(), 1);
        assert!(!config.is_network_enabled(Network::Celo));
        assert!(config.is_network_enabled(Network::Arb));
        assert!(!config.enabled_networks().contains(&Network::Celo));
        assert_eq!(config.api_url(Network::Ethereum), "http://localhost:8080/api");
        assert_eq!(config.classifier.extra_safe_calls, vec!["mint(address,uint256)"]);
        assert!(config.is_address_suppressed("0xdeadbeef"));
        assert!(!config.is_address_suppressed("0xbeef"));
    }

    #[test]
    fn test_network_tables_match_any_case() {
        let toml = r#"
[networks.ETHEREUM]
api_url = "http://localhost:9000/api"

[networks.Celo]
enabled = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.api_url(Network::Ethereum), "http://localhost:9000/api");
        assert!(!config.is_network_enabled(Network::Celo));
        assert!(!config.enabled_networks().contains(&Network::Celo));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/.vyper-guard.toml")).unwrap();
        assert_eq!(config.global.cache_dir, PathBuf::from(".vyper-guard-cache"));
    }

    #[test]
    fn test_unknown_network_is_rejected() {
        let toml = "[networks.solana]\nenabled = true\n";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }
}
