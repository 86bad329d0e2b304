use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use quarry_core::extract::collect_files;
use quarry_core::{BatchReport, Engine, EngineConfig, EngineStats, SearchHit, Strategy};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index a document directory and query it in one shot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory of documents to index
    #[arg(long)]
    docs: PathBuf,
    /// Also index files in subdirectories
    #[arg(long, default_value_t = false)]
    recursive: bool,
    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the corpus against a query and print the hits as JSON
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Free-text query
        #[arg(long)]
        query: String,
        /// Ranking strategy: frequency or discriminative
        #[arg(long, default_value_t = Strategy::Frequency)]
        strategy: Strategy,
        /// Print at most this many hits
        #[arg(long)]
        k: Option<usize>,
    },
    /// Print corpus statistics and the files that were skipped
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    strategy: Strategy,
    total_hits: usize,
    results: &'a [SearchHit],
}

#[derive(Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: EngineStats,
    #[serde(flatten)]
    report: BatchReport,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, query, strategy, k } => {
            let (engine, _) = load_corpus(&corpus)?;
            let mut hits = engine.search(&query, strategy);
            let total_hits = hits.len();
            if let Some(k) = k {
                hits.truncate(k);
            }
            let out = SearchOutput { query: &query, strategy, total_hits, results: &hits };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Stats { corpus } => {
            let (engine, report) = load_corpus(&corpus)?;
            let out = StatsOutput { stats: engine.stats(), report };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn load_corpus(args: &CorpusArgs) -> Result<(Engine, BatchReport)> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config)?;
    let files = collect_files(&args.docs, args.recursive)?;
    tracing::info!(files = files.len(), dir = %args.docs.display(), "indexing");
    let report = engine.index_batch(&files);
    Ok((engine, report))
}
