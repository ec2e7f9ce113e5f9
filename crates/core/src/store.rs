use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Result, ScanError};
use crate::network::Network;

/// Extension of saved contract sources
pub const CONTRACT_EXTENSION: &str = "vy";

/// What [`ContractStore::reconcile`] did to a contract file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    Written,
    Removed,
    Unchanged,
}

/// On-disk set of flagged contracts: `<root>/<network>/<address>.vy`.
/// A file exists iff the latest verdict for that address was vulnerable.
#[derive(Debug, Clone)]
pub struct ContractStore {
    root: PathBuf,
}

impl ContractStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn network_dir(&self, network: Network) -> PathBuf {
        self.root.join(network.as_str())
    }

    pub fn path_for(&self, network: Network, address: &str) -> PathBuf {
        self.network_dir(network)
            .join(format!("{address}.{CONTRACT_EXTENSION}"))
    }

    pub fn ensure_network_dir(&self, network: Network) -> Result<PathBuf> {
        let dir = self.network_dir(network);
        fs::create_dir_all(&dir).map_err(|e| ScanError::io(&dir, e))?;
        Ok(dir)
    }

    /// Make the store reflect the latest verdict: write the source verbatim
    /// when vulnerable, drop a stale file when not.
    pub fn reconcile(
        &self,
        network: Network,
        address: &str,
        source: &str,
        vulnerable: bool,
    ) -> Result<Reconciliation> {
        let path = self.path_for(network, address);
        if vulnerable {
            self.ensure_network_dir(network)?;
            fs::write(&path, source).map_err(|e| ScanError::io(&path, e))?;
            tracing::debug!(path = %path.display(), "saved flagged contract");
            return Ok(Reconciliation::Written);
        }
        if path.exists() {
            fs::remove_file(&path).map_err(|e| ScanError::io(&path, e))?;
            tracing::debug!(path = %path.display(), "removed contract no longer flagged");
            return Ok(Reconciliation::Removed);
        }
        Ok(Reconciliation::Unchanged)
    }

    /// Saved contract files for a network, sorted by path
    pub fn flagged(&self, network: Network) -> Result<Vec<PathBuf>> {
        let dir = self.network_dir(network);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&dir).max_depth(1) {
            let entry = entry.map_err(|e| ScanError::io(&dir, e.into()))?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == CONTRACT_EXTENSION)
            {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let store = ContractStore::new("contracts");
        assert_eq!(
            store.path_for(Network::Poly, "0xAbC"),
            PathBuf::from("contracts/poly/0xAbC.vy")
        );
    }

    #[test]
    fn test_vulnerable_writes_source_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContractStore::new(dir.path());
        let source = "# @version 0.3.0\n\n@external\n@nonreentrant(\"lock\")\ndef f():\n    pass\n";

        let action = store.reconcile(Network::Ethereum, "0x1", source, true).unwrap();
        assert_eq!(action, Reconciliation::Written);
        let path = store.path_for(Network::Ethereum, "0x1");
        assert_eq!(fs::read_to_string(path).unwrap(), source);
    }

    #[test]
    fn test_vulnerable_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContractStore::new(dir.path());
        store.reconcile(Network::Arb, "0x1", "old", true).unwrap();
        store.reconcile(Network::Arb, "0x1", "new", true).unwrap();
        assert_eq!(
            fs::read_to_string(store.path_for(Network::Arb, "0x1")).unwrap(),
            "new"
        );
    }

    #[test]
    fn test_safe_removes_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContractStore::new(dir.path());
        store.reconcile(Network::Ftm, "0x1", "src", true).unwrap();

        let action = store.reconcile(Network::Ftm, "0x1", "src", false).unwrap();
        assert_eq!(action, Reconciliation::Removed);
        assert!(!store.path_for(Network::Ftm, "0x1").exists());

        let action = store.reconcile(Network::Ftm, "0x1", "src", false).unwrap();
        assert_eq!(action, Reconciliation::Unchanged);
    }

    #[test]
    fn test_flagged_lists_only_contract_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContractStore::new(dir.path());
        assert!(store.flagged(Network::Celo).unwrap().is_empty());

        store.reconcile(Network::Celo, "0xb", "b", true).unwrap();
        store.reconcile(Network::Celo, "0xa", "a", true).unwrap();
        fs::write(store.network_dir(Network::Celo).join("notes.txt"), "x").unwrap();

        let files = store.flagged(Network::Celo).unwrap();
        assert_eq!(
            files,
            vec![
                store.path_for(Network::Celo, "0xa"),
                store.path_for(Network::Celo, "0xb"),
            ]
        );
    }
}
