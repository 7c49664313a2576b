//! Gifteez engine CLI
//!
//! Ranks a JSON gift catalog for a JSON query and prints the results as JSON
//! on stdout. Logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gifteez_engine::{
    config, EngineConfig, FeedbackAdapter, FeedbackEntry, FileCatalog, GiftEngine, GiftQuery,
    SortBy, SubmitFeedbackParams,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gifteez-engine")]
#[command(about = "Gift recommendation scoring engine", version)]
struct Args {
    /// Engine config file (TOML); built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank a catalog for a query
    Search {
        /// Catalog JSON file or directory of gift JSON files
        #[arg(long)]
        catalog: PathBuf,

        /// Query JSON file
        #[arg(long)]
        query: PathBuf,

        /// Result order
        #[arg(long, value_enum, default_value_t = SortBy::Relevance)]
        sort: SortBy,

        /// Relevance feedback applied before ranking (repeatable)
        #[arg(long)]
        feedback: Vec<String>,

        /// Tag feedback with the query's recipient, occasion and interests,
        /// which also weights those keywords
        #[arg(long, requires = "feedback")]
        feedback_context: bool,
    },

    /// Print the JSON schemas of the request records
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("gifteez_engine={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Gifteez engine v{}", gifteez_engine::VERSION);

    let engine_config = match &args.config {
        Some(path) => config::load(path)?,
        None => EngineConfig::default(),
    };

    match args.command {
        Command::Search {
            catalog,
            query,
            sort,
            feedback,
            feedback_context,
        } => {
            run_search(
                engine_config,
                &catalog,
                &query,
                sort,
                feedback,
                feedback_context,
            )
            .await
        }
        Command::Schema => print_schemas(),
    }
}

async fn run_search(
    engine_config: EngineConfig,
    catalog: &Path,
    query_path: &Path,
    sort: SortBy,
    feedback: Vec<String>,
    feedback_context: bool,
) -> anyhow::Result<()> {
    let raw_query = tokio::fs::read_to_string(query_path)
        .await
        .with_context(|| format!("Failed to read query {}", query_path.display()))?;
    let query: GiftQuery = serde_json::from_str(&raw_query)
        .with_context(|| format!("Failed to parse query {}", query_path.display()))?;

    let engine = GiftEngine::new(engine_config, FeedbackAdapter::shared());
    for entry in feedback_entries(feedback, &query, feedback_context) {
        if let Err(e) = engine.submit_feedback(entry) {
            tracing::debug!("Skipped feedback entry: {}", e);
        }
    }

    let results = engine
        .search_source(&FileCatalog::new(catalog), &query, sort)
        .await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Build feedback entries; the query context is attached only on request
fn feedback_entries(comments: Vec<String>, query: &GiftQuery, with_context: bool) -> Vec<FeedbackEntry> {
    comments
        .into_iter()
        .map(|comment| {
            let entry = FeedbackEntry::new(comment);
            if with_context {
                entry.with_context(
                    non_empty(&query.recipient),
                    non_empty(&query.occasion),
                    query.interests.clone(),
                )
            } else {
                entry
            }
        })
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn print_schemas() -> anyhow::Result<()> {
    let schemas = serde_json::json!({
        "query": schemars::schema_for!(GiftQuery),
        "feedback": schemars::schema_for!(SubmitFeedbackParams),
    });
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}
