//! Focus CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: load `.focus/config.toml` (or `--config` /
//!    `FOCUS_CONFIG`) and validate it.
//! 2. **Wire observability**: configure `tracing-subscriber` with a pretty or
//!    JSON layer and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set, an
//!    OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: create the snapshot-backed
//!    [`github::SnapshotGateway`], the file-backed
//!    [`enrichment::FileEnrichmentStore`], and inject them into
//!    [`engine::FocusProvider`].
//! 4. **Run the subcommand**: `triage`, `pin`/`unpin`/`snooze`/`unsnooze`, or
//!    `watch`.

mod config;
mod locator;
mod observability;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use engine::{DiscoveryGate, FocusDependencies, FocusEvent, FocusProvider, RefreshScheduler};
use enrichment::FileEnrichmentStore;
use github::SnapshotGateway;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use triage::{EntityId, TriageError};

use crate::config::{FocusConfig, DEFAULT_CONFIG_PATH};
use crate::locator::DetachedLocator;
use crate::report::TriageReport;

#[derive(Debug, Parser)]
#[command(name = "focus", version, about = "Triage the pull requests that need you")]
struct Cli {
    /// Configuration file.
    #[arg(
        long,
        global = true,
        env = "FOCUS_CONFIG",
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch, classify, and list items by group.
    Triage {
        /// Bypass the caches.
        #[arg(long)]
        force: bool,
        /// Print the grouped set as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Pin an item so it sorts ahead of everything else.
    Pin(ItemArgs),
    Unpin(ItemArgs),
    /// Hide an item from every group until it is unsnoozed.
    Snooze(ItemArgs),
    Unsnooze(ItemArgs),
    /// Refresh every `refresh_rate_minutes` and print a summary after each pass.
    Watch,
}

#[derive(Debug, Args)]
struct ItemArgs {
    /// Provider node id of the item, as printed by `focus triage`.
    entity_id: String,
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Pin,
    Unpin,
    Snooze,
    Unsnooze,
}

impl Mutation {
    fn past_tense(self) -> &'static str {
        match self {
            Self::Pin => "Pinned",
            Self::Unpin => "Unpinned",
            Self::Snooze => "Snoozed",
            Self::Unsnooze => "Unsnoozed",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = FocusConfig::load(&cli.config)?;
    let _observability = observability::init(config.log_format)?;
    tracing::debug!(config = %cli.config.display(), "Configuration loaded");

    let provider = Arc::new(build_provider(&config)?);

    match cli.command {
        Command::Triage { force, json } => triage(&provider, &config, force, json).await,
        Command::Pin(args) => mutate(&provider, &config, &args, Mutation::Pin).await,
        Command::Unpin(args) => mutate(&provider, &config, &args, Mutation::Unpin).await,
        Command::Snooze(args) => mutate(&provider, &config, &args, Mutation::Snooze).await,
        Command::Unsnooze(args) => mutate(&provider, &config, &args, Mutation::Unsnooze).await,
        Command::Watch => watch(provider, &config).await,
    }
}

fn build_provider(config: &FocusConfig) -> Result<FocusProvider, TriageError> {
    let dependencies = FocusDependencies {
        gateway: Arc::new(SnapshotGateway::new(&config.snapshot_path)),
        enrichments: Arc::new(FileEnrichmentStore::new(&config.annotations_path)),
        locator: Arc::new(DetachedLocator),
        discovery: Arc::new(DiscoveryGate::new()),
    };
    FocusProvider::new(dependencies, config.engine_config())
}

/// A token cancelled by Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

async fn triage(
    provider: &FocusProvider,
    config: &FocusConfig,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    let set = provider
        .fetch_triage_set(config.triage_options(force), &cancel_on_ctrl_c())
        .await?;
    let report = TriageReport::new(&set);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

async fn mutate(
    provider: &FocusProvider,
    config: &FocusConfig,
    args: &ItemArgs,
    mutation: Mutation,
) -> anyhow::Result<()> {
    let entity_id = EntityId::new(args.entity_id.as_str()).context("entity id must not be empty")?;
    let set = provider
        .fetch_triage_set(config.triage_options(false), &cancel_on_ctrl_c())
        .await?;
    let item = set
        .find(&entity_id)
        .with_context(|| format!("No triaged item with id {entity_id}"))?;

    match mutation {
        Mutation::Pin => provider.pin(item).await?,
        Mutation::Unpin => provider.unpin(item).await?,
        Mutation::Snooze => provider.snooze(item).await?,
        Mutation::Unsnooze => provider.unsnooze(item).await?,
    }

    println!("{} {} #{} {}", mutation.past_tense(), item.repo_and_owner(), item.number, item.title);
    Ok(())
}

async fn watch(provider: Arc<FocusProvider>, config: &FocusConfig) -> anyhow::Result<()> {
    let mut events = provider.subscribe();
    let scheduler = RefreshScheduler::start(
        Arc::clone(&provider),
        config.refresh_rate_minutes,
        config.triage_options(true),
    )
    .context("watch requires refresh_rate_minutes greater than zero")?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(FocusEvent::Refreshed(set)) => {
                    println!("[{}]", set.refreshed_at);
                    for line in set.summary().lines() {
                        println!("  {line}");
                    }
                }
                Ok(FocusEvent::Changed) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed refresh notifications");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    scheduler.stop().await;
    Ok(())
}
