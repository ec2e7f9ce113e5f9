use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::cache::SourceCache;
use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::{Result, ScanError};
use crate::fetch::{ExplorerTransport, SourceFetcher};
use crate::input::{read_records, ContractRecord};
use crate::network::Network;
use crate::report::{ContractOutcome, NetworkSummary, ScanReport};
use crate::store::{ContractStore, Reconciliation};

/// Export file for a network: `<input_dir>/<network>.csv`
pub fn input_path(config: &Config, network: Network) -> PathBuf {
    config.global.input_dir.join(format!("{network}.csv"))
}

/// Fail before any scanning if an export file is missing.
pub fn check_inputs(config: &Config, networks: &[Network]) -> Result<()> {
    for &network in networks {
        let path = input_path(config, network);
        if !path.is_file() {
            let source = std::io::Error::new(std::io::ErrorKind::NotFound, "input file not found");
            return Err(ScanError::io(path, source));
        }
    }
    Ok(())
}

/// Drives fetch → classify → reconcile over export rows, one at a time.
pub struct ScanOrchestrator<'a, T, C> {
    fetcher: SourceFetcher<T, C>,
    classifier: &'a dyn Classifier,
    store: ContractStore,
    config: &'a Config,
    vulnerable_versions: BTreeSet<String>,
}

impl<'a, T: ExplorerTransport, C: SourceCache> ScanOrchestrator<'a, T, C> {
    pub fn new(
        fetcher: SourceFetcher<T, C>,
        classifier: &'a dyn Classifier,
        config: &'a Config,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            store: ContractStore::new(&config.global.output_dir),
            config,
            vulnerable_versions: config.vulnerable_versions(),
        }
    }

    pub fn store(&self) -> &ContractStore {
        &self.store
    }

    pub fn fetcher(&self) -> &SourceFetcher<T, C> {
        &self.fetcher
    }

    pub fn into_fetcher(self) -> SourceFetcher<T, C> {
        self.fetcher
    }

    /// Process one row. Errors from the fetcher abort the caller's run.
    pub fn process(&mut self, record: &ContractRecord) -> Result<ContractOutcome> {
        if !self.vulnerable_versions.contains(record.declared_version.trim()) {
            return Ok(ContractOutcome::Skipped {
                declared_version: record.declared_version.clone(),
            });
        }
        if self.config.is_address_suppressed(&record.address) {
            return Ok(ContractOutcome::Suppressed);
        }

        let fetched = self.fetcher.fetch(record.network, &record.address)?;
        let assessment = self.classifier.assess(&fetched.source_code);
        let action = self.store.reconcile(
            record.network,
            &record.address,
            &fetched.source_code,
            assessment.vulnerable,
        )?;

        let compiler_version = fetched.compiler_version;
        Ok(match action {
            Reconciliation::Written => ContractOutcome::Flagged {
                compiler_version,
                assessment,
            },
            Reconciliation::Removed => ContractOutcome::Cleared { compiler_version },
            Reconciliation::Unchanged => ContractOutcome::Safe { compiler_version },
        })
    }

    /// Process rows in order, reporting each outcome as soon as it is known.
    pub fn scan_network<F>(
        &mut self,
        network: Network,
        records: &[ContractRecord],
        observer: &mut F,
    ) -> Result<NetworkSummary>
    where
        F: FnMut(&ContractRecord, &ContractOutcome),
    {
        self.store.ensure_network_dir(network)?;
        let mut summary = NetworkSummary::new(network);
        for record in records {
            let outcome = self.process(record)?;
            observer(record, &outcome);
            summary.record(&outcome);
        }
        tracing::info!(
            %network,
            records = summary.records,
            flagged = summary.flagged,
            cleared = summary.cleared,
            "network scanned"
        );
        Ok(summary)
    }

    /// Scan each network's export file in order.
    pub fn run<F>(&mut self, networks: &[Network], observer: &mut F) -> Result<ScanReport>
    where
        F: FnMut(&ContractRecord, &ContractOutcome),
    {
        check_inputs(self.config, networks)?;
        let mut summaries = Vec::with_capacity(networks.len());
        for &network in networks {
            let records = read_records(network, &input_path(self.config, network))?;
            summaries.push(self.scan_network(network, &records, observer)?);
        }
        Ok(ScanReport::from_summaries(summaries))
    }
}
