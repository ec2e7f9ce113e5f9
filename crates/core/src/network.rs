use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Chains with an Etherscan-compatible explorer API.
/// Variant order is the order networks are scanned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Arb,
    Avax,
    Celo,
    Ethereum,
    Ftm,
    Gnosis,
    Moonbeam,
    Op,
    Poly,
}

impl Network {
    pub const ALL: [Network; 9] = [
        Network::Arb,
        Network::Avax,
        Network::Celo,
        Network::Ethereum,
        Network::Ftm,
        Network::Gnosis,
        Network::Moonbeam,
        Network::Op,
        Network::Poly,
    ];

    /// Short name used for input files, output directories and config tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Arb => "arb",
            Network::Avax => "avax",
            Network::Celo => "celo",
            Network::Ethereum => "ethereum",
            Network::Ftm => "ftm",
            Network::Gnosis => "gnosis",
            Network::Moonbeam => "moonbeam",
            Network::Op => "op",
            Network::Poly => "poly",
        }
    }

    pub fn default_api_url(self) -> &'static str {
        match self {
            Network::Arb => "https://api.arbiscan.io/api",
            Network::Avax => "https://api.snowtrace.io/api",
            Network::Celo => "https://api.celoscan.io/api",
            Network::Ethereum => "https://api.etherscan.io/api",
            Network::Ftm => "https://api.ftmscan.io/api",
            Network::Gnosis => "https://api.gnosisscan.io/api",
            Network::Moonbeam => "https://api.moonscan.io/api",
            Network::Op => "https://api-optimistic.etherscan.io/api",
            Network::Poly => "https://api.polygonscan.com/api",
        }
    }

    /// Environment variable holding the comma-separated API keys.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Network::Arb => "ARBISCAN_API_KEY",
            Network::Avax => "SNOWTRACE_API_KEY",
            Network::Celo => "CELOSCAN_API_KEY",
            Network::Ethereum => "ETHERSCAN_API_KEY",
            Network::Ftm => "FTMSCAN_API_KEY",
            Network::Gnosis => "GNOSISSCAN_API_KEY",
            Network::Moonbeam => "MOONSCAN_API_KEY",
            Network::Op => "OPTIMISTIC_ETHERSCAN_API_KEY",
            Network::Poly => "POLYGONSCAN_API_KEY",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == wanted)
            .ok_or_else(|| ScanError::UnknownNetwork(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ETHEREUM".parse::<Network>().unwrap(), Network::Ethereum);
        assert_eq!(" op ".parse::<Network>().unwrap(), Network::Op);
        assert!(matches!(
            "solana".parse::<Network>(),
            Err(ScanError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for network in Network::ALL {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
        }
    }

    #[test]
    fn test_scan_order_is_sorted() {
        let mut sorted = Network::ALL;
        sorted.sort();
        assert_eq!(sorted, Network::ALL);
    }
}
