pub mod cache;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod input;
pub mod keys;
pub mod network;
pub mod report;
pub mod scan;
pub mod store;

pub use error::{ExtractError, Result, ScanError};
pub use network::Network;
