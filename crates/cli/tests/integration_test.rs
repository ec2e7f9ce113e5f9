use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::json;
use vyper_guard::cache::{FileCache, MemoryCache, SourceCache};
use vyper_guard::classifier::Classifier;
use vyper_guard::config::Config;
use vyper_guard::fetch::{ExplorerTransport, SourceFetcher};
use vyper_guard::keys::ApiKeys;
use vyper_guard::report::ContractOutcome;
use vyper_guard::scan::{input_path, ScanOrchestrator};
use vyper_guard::{Network, Result, ScanError};
use vyper_guard_detectors::LockReuseClassifier;

const PAYABLE_POOL: &str = include_str!("fixtures/payable_pool.vy");
const RAW_CALL_VAULT: &str = include_str!("fixtures/raw_call_vault.vy");
const ERC20_ROUTER: &str = include_str!("fixtures/erc20_router.vy");
const SINGLE_LOCK: &str = include_str!("fixtures/single_lock.vy");

/// Explorer stand-in serving fixture sources by address.
struct FixtureExplorer {
    sources: HashMap<String, String>,
    calls: Cell<usize>,
}

impl FixtureExplorer {
    fn new(sources: &[(&str, &str)]) -> Self {
        Self {
            sources: sources
                .iter()
                .map(|(a, s)| (a.to_string(), s.to_string()))
                .collect(),
            calls: Cell::new(0),
        }
    }
}

impl ExplorerTransport for FixtureExplorer {
    fn get_source(
        &self,
        network: Network,
        _api_url: &str,
        address: &str,
        api_key: &str,
    ) -> Result<serde_json::Value> {
        assert!(api_key.starts_with("key-"), "unexpected key {api_key}");
        self.calls.set(self.calls.get() + 1);
        let Some(source) = self.sources.get(address) else {
            return Err(ScanError::HttpStatus {
                network,
                address: address.to_string(),
                status: 404,
            });
        };
        Ok(json!({
            "status": "1",
            "message": "OK",
            "result": [{"SourceCode": source, "CompilerVersion": "vyper:0.3.0"}]
        }))
    }
}

fn keys() -> ApiKeys {
    ApiKeys::from_lookup(&[Network::Ethereum, Network::Poly], |var| match var {
        "ETHERSCAN_API_KEY" => Some("key-e1,key-e2".to_string()),
        "POLYGONSCAN_API_KEY" => Some("key-p1".to_string()),
        _ => None,
    })
    .unwrap()
}

fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.global.input_dir = dir.join("etherscan-export");
    config.global.output_dir = dir.join("contracts");
    config.global.cache_dir = dir.join("cache");
    fs::create_dir_all(&config.global.input_dir).unwrap();
    config
}

fn write_export(config: &Config, network: Network, rows: &str) {
    fs::write(input_path(config, network), rows).unwrap();
}

fn scan<C: SourceCache>(
    config: &Config,
    explorer: FixtureExplorer,
    cache: C,
    networks: &[Network],
) -> (Vec<(String, ContractOutcome)>, SourceFetcher<FixtureExplorer, C>) {
    let classifier = LockReuseClassifier::default();
    let fetcher = SourceFetcher::new(explorer, cache, keys());
    let mut orchestrator = ScanOrchestrator::new(fetcher, &classifier, config);
    let mut outcomes = Vec::new();
    orchestrator
        .run(networks, &mut |record, outcome| {
            outcomes.push((record.address.clone(), outcome.clone()))
        })
        .unwrap();
    (outcomes, orchestrator.into_fetcher())
}

#[test]
fn test_fixture_verdicts() {
    let classifier = LockReuseClassifier::default();
    assert!(classifier.classify(PAYABLE_POOL));
    assert!(classifier.classify(RAW_CALL_VAULT));
    assert!(!classifier.classify(ERC20_ROUTER));
    assert!(!classifier.classify(SINGLE_LOCK));
}

#[test]
fn test_raw_call_vault_reports_both_call_sites() {
    let assessment = LockReuseClassifier::default().assess(RAW_CALL_VAULT);
    assert_eq!(assessment.unsafe_calls.len(), 2);
    // multi-line call is captured up to its closing paren
    assert!(assessment.unsafe_calls[1]
        .argument_text
        .ends_with("max_outsize=32\n    )"));
}

#[test]
fn test_full_pipeline_saves_only_flagged_contracts() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_export(
        &config,
        Network::Ethereum,
        "0xpool,0.3.0\n0xrouter,0.2.15\n0xold,0.2.4\n",
    );
    write_export(&config, Network::Poly, "0xvault,0.2.16\n0xsingle,0.3.0\n");

    let explorer = FixtureExplorer::new(&[
        ("0xpool", PAYABLE_POOL),
        ("0xrouter", ERC20_ROUTER),
        ("0xvault", RAW_CALL_VAULT),
        ("0xsingle", SINGLE_LOCK),
    ]);
    let (outcomes, fetcher) = scan(
        &config,
        explorer,
        MemoryCache::new(),
        &[Network::Ethereum, Network::Poly],
    );

    let flagged: Vec<&str> = outcomes
        .iter()
        .filter(|(_, o)| o.is_flagged())
        .map(|(a, _)| a.as_str())
        .collect();
    assert_eq!(flagged, vec!["0xpool", "0xvault"]);
    assert!(matches!(outcomes[2].1, ContractOutcome::Skipped { .. }));
    // the 0.2.4 row is never fetched
    assert_eq!(fetcher.transport().calls.get(), 4);

    let contracts = config.global.output_dir.clone();
    assert_eq!(
        fs::read_to_string(contracts.join("ethereum/0xpool.vy")).unwrap(),
        PAYABLE_POOL
    );
    assert_eq!(
        fs::read_to_string(contracts.join("poly/0xvault.vy")).unwrap(),
        RAW_CALL_VAULT
    );
    assert!(!contracts.join("ethereum/0xrouter.vy").exists());
    assert!(!contracts.join("poly/0xsingle.vy").exists());
}

#[test]
fn test_rescan_removes_contracts_no_longer_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_export(&config, Network::Ethereum, "0xabc,0.3.0\n");

    let (outcomes, _) = scan(
        &config,
        FixtureExplorer::new(&[("0xabc", RAW_CALL_VAULT)]),
        MemoryCache::new(),
        &[Network::Ethereum],
    );
    assert!(outcomes[0].1.is_flagged());
    let saved = config.global.output_dir.join("ethereum/0xabc.vy");
    assert!(saved.exists());

    // Explorer now serves a safe source for the same address
    let (outcomes, _) = scan(
        &config,
        FixtureExplorer::new(&[("0xabc", ERC20_ROUTER)]),
        MemoryCache::new(),
        &[Network::Ethereum],
    );
    assert!(matches!(outcomes[0].1, ContractOutcome::Cleared { .. }));
    assert!(!saved.exists());
}

#[test]
fn test_persistent_cache_skips_refetch_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_export(&config, Network::Ethereum, "0xpool,0.3.0\n0xrouter,0.3.0\n");
    let sources = [("0xpool", PAYABLE_POOL), ("0xrouter", ERC20_ROUTER)];

    let cache = FileCache::open(config.global.cache_dir.clone()).unwrap();
    let (first, fetcher) = scan(&config, FixtureExplorer::new(&sources), cache, &[Network::Ethereum]);
    assert_eq!(fetcher.transport().calls.get(), 2);
    drop(fetcher);

    // A fresh process reopening the same cache directory
    let cache = FileCache::open(config.global.cache_dir.clone()).unwrap();
    let (second, fetcher) = scan(&config, FixtureExplorer::new(&sources), cache, &[Network::Ethereum]);
    assert_eq!(fetcher.transport().calls.get(), 0);
    assert_eq!(first, second);
}

#[test]
fn test_fetch_failure_aborts_remaining_networks() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_export(&config, Network::Ethereum, "0xmissing,0.3.0\n");
    write_export(&config, Network::Poly, "0xvault,0.2.16\n");

    let classifier = LockReuseClassifier::default();
    let explorer = FixtureExplorer::new(&[("0xvault", RAW_CALL_VAULT)]);
    let fetcher = SourceFetcher::new(explorer, MemoryCache::new(), keys());
    let mut orchestrator = ScanOrchestrator::new(fetcher, &classifier, &config);

    let err = orchestrator
        .run(&[Network::Ethereum, Network::Poly], &mut |_, _| {})
        .unwrap_err();
    assert!(matches!(err, ScanError::HttpStatus { status: 404, .. }));
    assert!(!config.global.output_dir.join("poly/0xvault.vy").exists());
}

#[test]
fn test_config_extends_allowlist() {
    let toml_str = r#"
[classifier]
extra_safe_calls = ["value=amount"]
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let classifier = LockReuseClassifier::default()
        .with_extra_safe_calls(config.classifier.extra_safe_calls.iter().cloned());
    let assessment = classifier.assess(RAW_CALL_VAULT);
    // the value transfer is now allowlisted, the harvest call is not
    assert_eq!(assessment.unsafe_calls.len(), 1);
    assert!(assessment.vulnerable);
}
