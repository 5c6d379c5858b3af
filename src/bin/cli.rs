//! Quest Notifier CLI
//!
//! Runs the notifier loop, or a single cycle for manual checks.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use quest_notifier::{
    error::{AppError, Result},
    models::Config,
    notify::{Notifier, TelegramTransport},
    pipeline::Pipeline,
    scheduler::{JobKind, Scheduler},
    services::QuestboardFetcher,
    storage::LocalStorage,
    utils::logging,
};

/// Quest Notifier - announces new questboard quests on Telegram
#[derive(Parser, Debug)]
#[command(name = "quest-notifier", version, about = "Questboard change notifier")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check now, then keep checking on schedule and send daily summaries
    Run {
        /// Do not serve the health endpoint
        #[arg(long)]
        no_health: bool,
    },

    /// Run a single check cycle
    Check,

    /// Send the summary of the stored snapshot
    Summary,

    /// Validate configuration
    Validate,

    /// Show current snapshot info
    Info,
}

/// Wire storage, fetcher and notifier into a pipeline.
fn build_pipeline(config: Arc<Config>) -> Result<Pipeline> {
    let store = Arc::new(LocalStorage::new(&config.storage.snapshot_path));
    let source = Arc::new(QuestboardFetcher::new(Arc::clone(&config))?);
    let transport = Arc::new(TelegramTransport::new(&config.telegram)?);
    let notifier = Notifier::new(Arc::clone(&config), transport);
    Ok(Pipeline::new(config, store, source, notifier))
}

#[cfg(feature = "health")]
async fn start_health(config: &Config) -> Result<()> {
    quest_notifier::health::spawn(&config.health).await?;
    Ok(())
}

#[cfg(not(feature = "health"))]
async fn start_health(_config: &Config) -> Result<()> {
    log::warn!("Built without the `health` feature; no health endpoint.");
    Ok(())
}

/// Resolves on Ctrl-C; never resolves if the signal can't be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn run(config: Arc<Config>, no_health: bool) -> Result<()> {
    config.validate()?;
    let pipeline = build_pipeline(Arc::clone(&config))?;

    log::info!("🤖 Quest Notifier started...");
    log::info!("Tracking communities: {}", config.sources.join(", "));

    if config.health.enabled && !no_health {
        start_health(&config).await?;
    }

    // Initial run
    pipeline.run_check_cycle().await;

    let scheduler = Scheduler::from_config(&config.schedule, Local::now())?;
    if let Some(next) = scheduler.next_run(JobKind::Summary) {
        log::info!("Next daily summary at {}", next.format("%Y-%m-%d %H:%M"));
    }
    scheduler.run(Arc::new(pipeline), shutdown_signal()).await;

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let (config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let config = config.with_env_overrides();

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    logging::init(level, config.logging.file.as_deref())?;

    match load_error {
        Some(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults and environment.",
            cli.config.display(),
            e
        ),
        None => log::info!("Loaded configuration from {}", cli.config.display()),
    }

    let config = Arc::new(config);

    match cli.command {
        Command::Run { no_health } => run(config, no_health).await?,

        Command::Check => {
            config.validate()?;
            let report = build_pipeline(config)?.run_check_cycle().await;
            if !report.saved {
                return Err(AppError::cycle("Check cycle did not complete"));
            }
        }

        Command::Summary => {
            config.validate()?;
            if !build_pipeline(config)?.run_summary_cycle().await {
                return Err(AppError::cycle("Summary was not delivered"));
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} sources)", config.sources.len());
        }

        Command::Info => {
            let storage = LocalStorage::new(&config.storage.snapshot_path);
            log::info!("Snapshot file: {}", storage.path().display());
            log::info!("Tracked sources: {}", config.sources.join(", "));

            match storage.try_load().await {
                Ok(Some(snapshot)) => {
                    for (source, items) in snapshot.iter() {
                        log::info!("    {} → {} quests", source, items.len());
                    }
                    log::info!("Total quests: {}", snapshot.total_items());
                }
                Ok(None) => log::info!("No snapshot found yet."),
                Err(e) => log::warn!("Snapshot unreadable: {}", e),
            }
        }
    }

    Ok(())
}
