//! reg-watch main entry point
//!
//! This is the command-line interface for the reg-watch document monitor.

use anyhow::Context;
use clap::Parser;
use reg_watch::config::{StateStore, TomlStore, WatchConfig};
use reg_watch::monitor::{
    add_page_source, analyze_page, check_updates, discover_versions, HttpFetcher,
};
use reg_watch::notify::Notifier;
use reg_watch::output::{
    format_results_table, format_sources, format_summary, RunSummary, UNKNOWN_DATE,
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// reg-watch: a change monitor for regulatory documents
///
/// reg-watch fetches the tracked versions of each configured source,
/// fingerprints their main content, and reports what changed since the
/// previous run. Listing pages are scanned for newly published versions.
#[derive(Parser, Debug)]
#[command(name = "reg-watch")]
#[command(version)]
#[command(about = "A change monitor for regulatory documents", long_about = None)]
struct Cli {
    /// Path to the TOML configuration and state file
    #[arg(value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single check, print the results and exit
    #[arg(long, conflicts_with_all = ["discover", "analyze", "add_source", "list"])]
    once: bool,

    /// Look for new versions on listing pages without saving them
    #[arg(long, conflicts_with_all = ["once", "analyze", "add_source", "list"])]
    discover: bool,

    /// Suggest content selectors for a page and exit
    #[arg(long, value_name = "URL", conflicts_with_all = ["once", "discover", "add_source", "list"])]
    analyze: Option<String>,

    /// Add a single-page source after a test extraction
    #[arg(
        long,
        num_args = 3,
        value_names = ["NAME", "URL", "SELECTOR"],
        conflicts_with_all = ["once", "discover", "analyze", "list"]
    )]
    add_source: Option<Vec<String>>,

    /// List tracked sources and versions and exit
    #[arg(long, conflicts_with_all = ["once", "discover", "analyze", "add_source"])]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The log file location lives in the config, so load it first
    let store = TomlStore::new(&cli.config);
    let (mut config, seeded) = store
        .load_or_seed()
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, &config.log_file);
    if seeded {
        tracing::info!(
            config = %cli.config.display(),
            "Config file not found, wrote seed configuration"
        );
    }
    tracing::info!(
        config = %cli.config.display(),
        sources = config.sources.len(),
        versions = config.version_count(),
        "Configuration loaded"
    );

    let fetcher = HttpFetcher::new(&config.http).context("Failed to build HTTP client")?;

    // Handle different modes
    if cli.list {
        print!("{}", format_sources(&config));
    } else if let Some(url) = cli.analyze.as_deref() {
        handle_analyze(&fetcher, url).await?;
    } else if let Some(args) = cli.add_source.as_deref() {
        handle_add_source(&fetcher, &store, &mut config, args).await?;
    } else if cli.discover {
        handle_discover(&fetcher, &config).await;
    } else if cli.once {
        run_check(&fetcher, &store, &mut config).await?;
    } else {
        run_scheduled(&fetcher, &store, &mut config).await;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Output goes to stderr and is also appended, without colors, to `log_file`.
fn setup_logging(verbose: u8, quiet: bool, log_file: &str) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reg_watch=info,warn"),
            1 => EnvFilter::new("reg_watch=debug,info"),
            2 => EnvFilter::new("reg_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let (file_layer, file_error) =
        match OpenOptions::new().create(true).append(true).open(log_file) {
            Ok(file) => {
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false);
                (Some(layer), None)
            }
            Err(e) => (None, Some(e)),
        };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(log_file, error = %e, "Could not open log file, logging to stderr only");
    }
}

/// Runs one check, prints the report and sends notifications
async fn run_check(
    fetcher: &HttpFetcher,
    store: &TomlStore,
    config: &mut WatchConfig,
) -> anyhow::Result<()> {
    tracing::info!("Starting check run");

    let results = check_updates(fetcher, store, config)
        .await
        .context("Check run failed")?;

    let summary = RunSummary::from_results(&results);
    println!("{}", format_results_table(&results));
    print!("{}", format_summary(&summary));

    // SMTP delivery blocks; keep it off the async worker
    let notifier = Notifier::from_config(&config.notification.email);
    tokio::task::block_in_place(|| notifier.notify(&results));

    tracing::info!(
        checked = summary.total,
        changed = summary.changed(),
        failed = summary.failed(),
        "Check run completed"
    );
    Ok(())
}

/// Runs a check now and then every `check-interval-hours` until Ctrl-C
async fn run_scheduled(fetcher: &HttpFetcher, store: &TomlStore, config: &mut WatchConfig) {
    let period = config.check_interval();
    tracing::info!(interval_hours = period.as_secs() / 3600, "Monitoring started");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_check(fetcher, store, config).await {
                    tracing::error!("{:#}", e);
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupted, stopping monitor");
                break;
            }
        }
    }
}

/// Handles the --discover mode: prints candidates without saving them
async fn handle_discover(fetcher: &HttpFetcher, config: &WatchConfig) {
    println!("=== Version Discovery ===\n");

    for source in config.sources.iter().filter(|s| s.kind.supports_discovery()) {
        let found = discover_versions(fetcher, source).await;
        println!("{} ({} new):", source.name, found.len());
        for version in &found {
            println!(
                "  - {} ({}) {}",
                version.label,
                version.date.as_deref().unwrap_or(UNKNOWN_DATE),
                version.url
            );
        }
        println!();
    }
}

/// Handles the --analyze mode: prints selector suggestions for a page
async fn handle_analyze(fetcher: &HttpFetcher, url: &str) -> anyhow::Result<()> {
    let analysis = analyze_page(fetcher, url)
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    println!("=== Selector Analysis ===\n");
    println!("URL: {}\n", analysis.url);

    println!("Suggested selectors:");
    for selector in &analysis.suggested_selectors {
        println!("  {}", selector);
    }

    println!("\nLandmarks found ({}):", analysis.landmarks_found.len());
    for landmark in &analysis.landmarks_found {
        println!("  - {}", landmark);
    }

    Ok(())
}

/// Handles the --add-source mode: validates, appends and persists a page source
async fn handle_add_source(
    fetcher: &HttpFetcher,
    store: &TomlStore,
    config: &mut WatchConfig,
    args: &[String],
) -> anyhow::Result<()> {
    let [name, url, selector] = args else {
        anyhow::bail!("--add-source expects NAME URL SELECTOR");
    };

    add_page_source(fetcher, config, name, url, selector)
        .await
        .with_context(|| format!("Could not add source '{}'", name))?;

    store
        .save(config)
        .with_context(|| format!("Failed to save {}", store.path().display()))?;

    println!("✓ Added source '{}' ({})", name.trim(), url.trim());
    Ok(())
}
