//! Catalog Indexer
//!
//! Entry point: syncs the relational sources into the search index and runs
//! ad-hoc queries over the structured and raw paths.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use catalog_indexer::config::{raw_search_client, structured_search_client};
use catalog_indexer::logging::init_logging;
use catalog_indexer::{AppConfig, AppEnv, Dependencies, ProfileConfig};
use catalog_indexer_pipeline::SyncReport;
use catalog_indexer_shared::{DocumentKind, SearchPage, SearchResultEnvelope};

#[derive(Parser)]
#[command(name = "catalog-indexer")]
#[command(about = "Index catalog, design and news records and query the search index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, env = "CONFIG_PATH", default_value = "config.toml", global = true)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, map and index documents (all kinds by default)
    Sync {
        /// Kind to sync: catalog, design, application or news
        #[arg(long = "kind")]
        kinds: Vec<DocumentKind>,
        /// Refresh the written indices once the sync is done
        #[arg(long)]
        refresh: bool,
    },
    /// Query with the structured path
    Search {
        #[arg(long)]
        kind: DocumentKind,
        /// Term that every hit must match; repeatable
        #[arg(long = "term")]
        terms: Vec<String>,
        #[arg(long, default_value_t = 0)]
        from: usize,
        #[arg(long, default_value_t = 10)]
        size: usize,
    },
    /// Query with the raw HTTP path
    RawSearch {
        #[arg(long)]
        kind: DocumentKind,
        /// Query string, e.g. `description:usb`
        #[arg(long)]
        q: String,
        #[arg(long, default_value_t = 0)]
        from: usize,
        #[arg(long, default_value_t = 10)]
        size: usize,
    },
}

fn load_profile(path: &Path) -> Result<ProfileConfig> {
    let app_env = AppEnv::resolve(env::var("APP_ENV").ok().as_deref())?;
    let profile = AppConfig::load(path)?
        .profile(app_env)?
        .with_search_url(env::var("OPENSEARCH_URL").ok());

    info!(app_env = %app_env, config = %path.display(), "Loaded configuration");
    Ok(profile)
}

fn print_report(report: &SyncReport) {
    for kind in &report.kinds {
        println!("{}", kind);
    }
    println!(
        "total: indexed={} failed={}",
        report.total_indexed(),
        report.total_failed()
    );
}

fn print_results(result: &SearchResultEnvelope) {
    println!(
        "total={} took={}ms returned={} skipped={}",
        result.total,
        result.took,
        result.hits.len(),
        result.skipped_hits
    );
    for hit in &result.hits {
        println!(
            "{:>10}  {:8.4}  {}",
            hit.document.id(),
            hit.score,
            hit.document.title()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let profile = load_profile(&cli.config)?;

    match cli.command {
        Commands::Sync { kinds, refresh } => {
            let kinds = if kinds.is_empty() {
                DocumentKind::ALL.to_vec()
            } else {
                kinds
            };

            let deps = Dependencies::new(&profile, &kinds).await?;
            let report = deps.orchestrator.run(&kinds).await;
            deps.connections.close().await;

            if refresh {
                deps.orchestrator.refresh(&kinds).await?;
            }

            if !report.failed_kinds().is_empty() {
                warn!(failed_kinds = ?report.failed_kinds(), "Some kinds failed to sync");
            }
            print_report(&report);
        }
        Commands::Search {
            kind,
            terms,
            from,
            size,
        } => {
            let client = structured_search_client(&profile).await;
            let result = client.query(kind, &terms, SearchPage::new(from, size)).await?;
            print_results(&result);
        }
        Commands::RawSearch {
            kind,
            q,
            from,
            size,
        } => {
            let client = raw_search_client(&profile)?;
            let result = client.search(kind, &q, SearchPage::new(from, size)).await?;
            print_results(&result);
        }
    }

    Ok(())
}
