use std::path::Path;

use serde::Serialize;

use crate::error::{Result, ScanError};
use crate::network::Network;

/// One `address,version` row of an explorer export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRecord {
    pub network: Network,
    pub address: String,
    pub declared_version: String,
}

/// Read a network's export file, keeping file order.
pub fn read_records(network: Network, path: &Path) -> Result<Vec<ContractRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
    parse_records(network, path, &text)
}

/// Parse export rows. Blank lines are skipped; `path` is only used in errors.
pub fn parse_records(network: Network, path: &Path, text: &str) -> Result<Vec<ContractRecord>> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let row = line.trim();
        if row.is_empty() {
            continue;
        }
        let invalid = || ScanError::InvalidInput {
            path: path.to_path_buf(),
            line: idx + 1,
            row: row.to_string(),
        };
        let (address, version) = row.split_once(',').ok_or_else(invalid)?;
        let address = unquote(address);
        if !is_file_safe_address(address) {
            return Err(invalid());
        }
        records.push(ContractRecord {
            network,
            address: address.to_string(),
            declared_version: unquote(version).to_string(),
        });
    }
    Ok(records)
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

/// The address names the saved contract file, so it must stay a single
/// path component.
fn is_file_safe_address(address: &str) -> bool {
    !address.is_empty()
        && !address.contains(['/', '\\'])
        && !address.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_order_and_skips_blanks() {
        let text = "0xaaa,0.3.0\n\n  0xbbb , 0.2.4 \r\n0xccc,\"0.2.15\"\n\"0xddd\",\"0.3.0\"\n";
        let records = parse_records(Network::Gnosis, Path::new("gnosis.csv"), text).unwrap();
        let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["0xaaa", "0xbbb", "0xccc", "0xddd"]);
        assert_eq!(records[1].declared_version, "0.2.4");
        assert_eq!(records[2].declared_version, "0.2.15");
        assert_eq!(records[3].declared_version, "0.3.0");
        assert!(records.iter().all(|r| r.network == Network::Gnosis));
    }

    #[test]
    fn test_row_without_comma_is_rejected() {
        let err = parse_records(Network::Op, Path::new("op.csv"), "0xaaa,0.3.0\n0xbbb\n")
            .unwrap_err();
        match err {
            ScanError::InvalidInput { line, row, .. } => {
                assert_eq!(line, 2);
                assert_eq!(row, "0xbbb");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_address_must_be_a_single_path_component() {
        for row in ["../../x,0.3.0", "a/b,0.3.0", "a\\b,0.3.0", ",0.3.0", "\"\",0.3.0"] {
            let err = parse_records(Network::Arb, Path::new("arb.csv"), row).unwrap_err();
            assert!(
                matches!(err, ScanError::InvalidInput { line: 1, .. }),
                "accepted {row:?}"
            );
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_records(Network::Op, Path::new("/nonexistent/op.csv")).unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
