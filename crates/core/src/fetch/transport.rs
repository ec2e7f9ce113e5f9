use crate::error::{Result, ScanError};
use crate::network::Network;

/// One `getsourcecode` round-trip against an explorer API.
pub trait ExplorerTransport {
    fn get_source(
        &self,
        network: Network,
        api_url: &str,
        address: &str,
        api_key: &str,
    ) -> Result<serde_json::Value>;
}

/// The request URL carries the API key, so it is dropped from the error.
fn fetch_error(network: Network, source: reqwest::Error) -> ScanError {
    ScanError::Fetch {
        network,
        source: source.without_url(),
    }
}

/// Blocking HTTP transport; the transport's default timeout applies.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerTransport for HttpTransport {
    fn get_source(
        &self,
        network: Network,
        api_url: &str,
        address: &str,
        api_key: &str,
    ) -> Result<serde_json::Value> {
        let resp = self
            .client
            .get(api_url)
            .header(
                reqwest::header::USER_AGENT,
                concat!("vyper-guard/", env!("CARGO_PKG_VERSION")),
            )
            .query(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address),
                ("apikey", api_key),
            ])
            .send()
            .map_err(|e| fetch_error(network, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                network,
                address: address.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<serde_json::Value>()
            .map_err(|e| fetch_error(network, e))
    }
}
