use serde::Serialize;

use crate::classifier::Assessment;
use crate::network::Network;

/// Result of processing one export row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ContractOutcome {
    /// Declared compiler is not a vulnerable release
    Skipped { declared_version: String },
    /// Address matches a suppression pattern
    Suppressed,
    /// Possibly vulnerable; source saved
    Flagged {
        compiler_version: String,
        assessment: Assessment,
    },
    /// Previously saved, now judged safe; file removed
    Cleared { compiler_version: String },
    Safe { compiler_version: String },
}

impl ContractOutcome {
    pub fn is_flagged(&self) -> bool {
        matches!(self, ContractOutcome::Flagged { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub network: Option<Network>,
    pub records: usize,
    pub skipped: usize,
    pub suppressed: usize,
    pub flagged: usize,
    pub cleared: usize,
    pub safe: usize,
}

impl NetworkSummary {
    pub fn new(network: Network) -> Self {
        Self {
            network: Some(network),
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &ContractOutcome) {
        self.records += 1;
        match outcome {
            ContractOutcome::Skipped { .. } => self.skipped += 1,
            ContractOutcome::Suppressed => self.suppressed += 1,
            ContractOutcome::Flagged { .. } => self.flagged += 1,
            ContractOutcome::Cleared { .. } => self.cleared += 1,
            ContractOutcome::Safe { .. } => self.safe += 1,
        }
    }

    /// Contracts that were fetched and classified
    pub fn classified(&self) -> usize {
        self.flagged + self.cleared + self.safe
    }

    fn add(&mut self, other: &NetworkSummary) {
        self.records += other.records;
        self.skipped += other.skipped;
        self.suppressed += other.suppressed;
        self.flagged += other.flagged;
        self.cleared += other.cleared;
        self.safe += other.safe;
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub networks: Vec<NetworkSummary>,
    /// Sum over all networks (`network` is null)
    pub totals: NetworkSummary,
}

impl ScanReport {
    pub fn from_summaries(networks: Vec<NetworkSummary>) -> Self {
        let mut totals = NetworkSummary::default();
        for summary in &networks {
            totals.add(summary);
        }
        Self { networks, totals }
    }
}
