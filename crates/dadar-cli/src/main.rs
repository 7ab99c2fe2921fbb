mod search;
mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dadar_core::{AppConfig, FailurePolicy, StoreConfig};
use dadar_search::{SearchAggregator, SessionOptions};
use dadar_store::{DocumentStore, FirestoreClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dadar")]
#[command(about = "Search the Dadar directory across hotels, shops, places, events, news and blogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one aggregated search and print the results
    Search {
        query: String,
        /// Keep results from the sources that answered when others fail
        #[arg(long)]
        partial: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive search: each stdin line is the current input text.
    /// Prefix a line with `:submit ` to submit it.
    Live,
    /// Resolve the detail route for a result type tag and id
    Route {
        #[arg(value_name = "TYPE")]
        type_tag: String,
        id: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Print the shareable link for a query
    Share { query: String },
    /// Load the seed file and write it to the document store
    Seed {
        /// Seed file (defaults to DADAR_SEED_PATH)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Validate and summarize without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Route and share work offline, so a missing project id only matters
    // to the commands that reach the store.
    let config = dadar_core::load_app_config();
    let log_level = config.as_ref().map_or("info", |c| c.log_level.as_str());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            query,
            partial,
            json,
        } => {
            let config = config?;
            let policy = if partial {
                FailurePolicy::Partial
            } else {
                config.search_failure_policy
            };
            search::run_search(&build_aggregator(&config)?, &query, policy, json).await?;
        }
        Commands::Live => {
            let config = config?;
            let aggregator = Arc::new(build_aggregator(&config)?);
            search::run_live(aggregator, SessionOptions::from_app_config(&config)).await?;
        }
        Commands::Route { type_tag, id, title } => search::run_route(&type_tag, &id, &title),
        Commands::Share { query } => println!("{}", dadar_search::share_link(&query)),
        Commands::Seed { path, dry_run } => {
            let config = config?;
            let path = path.unwrap_or_else(|| config.seed_path.clone());
            seed::run_seed(&config, &path, dry_run).await?;
        }
    }

    Ok(())
}

fn build_aggregator(config: &AppConfig) -> anyhow::Result<SearchAggregator> {
    let client = FirestoreClient::new(&StoreConfig::from_app_config(config))?;
    let store: Arc<dyn DocumentStore> = Arc::new(client);
    tracing::debug!(
        backend = store.backend_tag(),
        project = %config.firebase_project_id,
        "document store ready"
    );
    Ok(SearchAggregator::new(store))
}
