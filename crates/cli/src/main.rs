mod commands;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "vyper-guard")]
#[command(about = "Find verified Vyper contracts exposed to the nonreentrant lock bug")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, classify and save contracts listed in the explorer exports
    Scan(ScanArgs),
    /// Classify a local source file without touching the network
    Classify {
        /// Path to a .vy source file
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: .vyper-guard.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// List contracts currently flagged in the output directory
    List {
        /// Only these networks (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        network: Option<Vec<String>>,

        /// Flagged-contract directory (default from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Path to config file (default: .vyper-guard.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List supported networks with their explorer endpoints
    Networks,
    /// Generate a default .vyper-guard.toml config file
    Init,
    /// Manage the explorer response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Only these networks (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    network: Option<Vec<String>>,

    /// Path to config file (default: .vyper-guard.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding <network>.csv exports
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory for flagged contract sources
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory for cached explorer responses
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Keep explorer responses in memory only
    #[arg(long)]
    no_cache: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Suppress per-contract lines and summary
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Drop every cached response
    Clear {
        /// Cache directory (default from config)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Path to config file (default: .vyper-guard.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

const DEFAULT_CONFIG: &str = ".vyper-guard.toml";

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn init_tracing(verbose: bool) {
    let filter = default_filter(verbose);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan(args) => commands::scan::run(args),
        Commands::Classify {
            path,
            format,
            config,
            no_color,
        } => commands::classify::run(&path, format, config, no_color),
        Commands::List {
            network,
            output_dir,
            config,
        } => commands::list::run(network, output_dir, config),
        Commands::Networks => commands::networks::run(),
        Commands::Init => commands::init::run(),
        Commands::Cache {
            action: CacheAction::Clear { cache_dir, config },
        } => commands::cache::clear(cache_dir, config),
    }
}
