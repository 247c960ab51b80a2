use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use module_versions::config::ReportConfig;
use module_versions::report::build_report;
use module_versions::version::registries::NpmRegistry;
use module_versions::version::registry::Registry;

#[derive(Parser, Debug)]
#[command(name = "module-versions")]
#[command(
    version,
    about = "Report the minimum supported and latest versions of instrumented modules"
)]
struct Cli {
    /// Versioned test trees to walk
    test_dirs: Vec<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the npm registry
    #[arg(long)]
    registry_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

/// Logs go to stderr; stdout only carries the report.
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "module_versions=debug"
        } else {
            "warn"
        })
    });

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    }
    .with_overrides(cli.registry_url, cli.test_dirs);

    if config.test_dirs.is_empty() {
        bail!("no test directories given");
    }

    tracing::debug!("Using registry {}", config.registry.base_url);
    let registry: Arc<dyn Registry> = Arc::new(NpmRegistry::with_user_agent(
        &config.registry.base_url,
        &config.registry.user_agent,
    ));

    let report = build_report(&config.test_dirs, registry).await;

    let output =
        serde_json::to_string_pretty(&report.releases).context("failed to serialize report")?;
    println!("{}", output);

    if report.has_walk_failures() {
        bail!("one or more test directories could not be read");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    tracing::debug!("module-versions starting with args: {:?}", cli);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}
