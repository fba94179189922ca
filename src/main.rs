//! peercheck - framework compatibility checker CLI tool
//!
//! Reads package.json, checks every dependency's release history against a
//! target framework major and prints a recommendation per package.

use clap::Parser;
use peercheck::cli::CliArgs;
use peercheck::config::{EngineConfig, FileConfig};
use peercheck::domain::DependencyEntry;
use peercheck::error::AppError;
use peercheck::manifest::{project_dir, read_manifest};
use peercheck::migration::MigrationLinks;
use peercheck::orchestrator::Engine;
use peercheck::output::{create_formatter, OutputConfig};
use peercheck::progress::{ProgressObserver, ProgressRenderer};
use peercheck::registry::{HttpClient, NpmRegistry};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter
const LOG_ENV: &str = "PEERCHECK_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Project inputs resolved before any registry call
struct Project {
    entries: Vec<DependencyEntry>,
    file: FileConfig,
    config: EngineConfig,
}

/// Read the manifest and config; every failure here is fatal
fn load_project(args: &CliArgs) -> Result<Project, AppError> {
    let mut entries = read_manifest(&args.path)?;
    if args.no_dev {
        entries.retain(|e| !e.is_dev);
    }

    let file = FileConfig::discover(&project_dir(&args.path), args.config.as_deref())?;
    let config = args.engine_config(&file);
    config.validate()?;

    let before = entries.len();
    let entries = args.exclusion_rules(&file).apply(entries);
    debug!(excluded = before - entries.len(), remaining = entries.len(), "applied exclusion rules");

    Ok(Project {
        entries,
        file,
        config,
    })
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    info!(version = env!("CARGO_PKG_VERSION"), path = %args.path.display(), "peercheck");

    let Project {
        entries,
        file,
        config,
    } = load_project(&args)?;

    let client = HttpClient::with_timeout(config.registry_timeout)?;
    let registry = NpmRegistry::with_base_url(client, &args.registry_url(&file));

    let output_config = OutputConfig::from_cli(
        args.json,
        args.csv,
        args.verbose,
        args.quiet,
        config.framework_package.clone(),
        config.target_major,
    );

    let engine = Arc::new(
        Engine::new(config, Arc::new(registry))
            .with_migration_links(MigrationLinks::new(file.migration)),
    );
    let observer: Arc<dyn ProgressObserver> = Arc::new(ProgressRenderer::new(args.show_progress()));
    let records = engine.run(entries, observer).await;

    // Output results
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&records, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
