pub mod types;

pub use types::{ContractOutcome, NetworkSummary, ScanReport};
