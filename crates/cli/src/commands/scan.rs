use anyhow::{Context, Result};
use vyper_guard::cache::{FileCache, MemoryCache, SourceCache};
use vyper_guard::config::Config;
use vyper_guard::fetch::{HttpTransport, SourceFetcher};
use vyper_guard::keys::ApiKeys;
use vyper_guard::scan::{check_inputs, ScanOrchestrator};
use vyper_guard::Network;
use vyper_guard_detectors::LockReuseClassifier;

use super::{load_config, select_networks};
use crate::output;
use crate::{OutputFormat, ScanArgs};

pub fn run(args: ScanArgs) -> Result<()> {
    let mut config = load_config(args.config)?;
    if let Some(dir) = args.input_dir {
        config.global.input_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.global.output_dir = dir;
    }
    if let Some(dir) = args.cache_dir {
        config.global.cache_dir = dir;
    }
    let networks = select_networks(args.network, &config)?;

    // 1. Configuration errors abort before any request is made
    let keys = ApiKeys::from_env(&networks)?;
    check_inputs(&config, &networks)?;

    let console = output::text::Console::new(
        args.quiet,
        args.no_color,
        matches!(args.format, OutputFormat::Json),
    );
    console.banner(&networks, &config);

    // 2. Scan with a persistent or throwaway cache
    if args.no_cache {
        execute(MemoryCache::new(), keys, &config, &networks, args.format, &console)
    } else {
        let cache_dir = config.global.cache_dir.clone();
        let cache = FileCache::open(cache_dir.clone())
            .with_context(|| format!("Failed to open cache: {}", cache_dir.display()))?;
        execute(cache, keys, &config, &networks, args.format, &console)
    }
}

fn execute<C: SourceCache>(
    cache: C,
    keys: ApiKeys,
    config: &Config,
    networks: &[Network],
    format: OutputFormat,
    console: &output::text::Console,
) -> Result<()> {
    let mut fetcher = SourceFetcher::new(HttpTransport::new(), cache, keys);
    for &network in networks {
        fetcher = fetcher.with_api_url(network, config.api_url(network));
    }

    let classifier = LockReuseClassifier::default()
        .with_extra_safe_calls(config.classifier.extra_safe_calls.iter().cloned());
    let mut orchestrator = ScanOrchestrator::new(fetcher, &classifier, config);

    let report = orchestrator.run(networks, &mut |record, outcome| {
        console.outcome(record, outcome);
    })?;

    match format {
        OutputFormat::Json => output::json::print(&report)?,
        OutputFormat::Text => console.summary(&report),
    }
    Ok(())
}
