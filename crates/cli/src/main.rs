use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Dataset, LookupError};
use recommender::top_similar;
use server::{metadata_provider, AppConfig, ArtifactStore, MovieRecommendation, RecommendationOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// ReelRecs - Similar Movie Finder
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Find movies similar to one you already like", long_about = None)]
struct Cli {
    /// Directory holding the cached artifacts (overrides DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Exact title of the movie to start from
        #[arg(long)]
        title: String,

        /// Number of recommendations to return (default: RECOMMENDATION_COUNT)
        #[arg(long)]
        limit: Option<usize>,

        /// Skip poster lookups and show placeholders
        #[arg(long)]
        offline: bool,
    },

    /// List catalog titles, optionally filtered
    Titles {
        /// Case-insensitive substring to search for
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of titles to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Download any artifacts that are not cached yet
    Fetch,

    /// Run benchmark to test ranking performance
    Benchmark {
        /// Number of ranking calls to make
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Number of results per call
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Artifacts are fetched once and reused on every later run
    let store = ArtifactStore::new(&config.data_dir, config.download_timeout())?;
    store
        .ensure_all(&config.artifacts())
        .await
        .context("Failed to fetch recommendation artifacts")?;

    if let Commands::Fetch = cli.command {
        println!(
            "{} Artifacts ready in {}",
            "✓".green(),
            store.data_dir().display()
        );
        return Ok(());
    }

    println!("Loading dataset from {}...", config.data_dir.display());
    let start = Instant::now();
    let dataset = Arc::new(
        Dataset::load(&config.catalog_path(), &config.similarity_path())
            .context("Failed to load recommendation dataset")?,
    );
    info!(
        movies = dataset.catalog().len(),
        elapsed = ?start.elapsed(),
        "Dataset ready"
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        dataset.catalog().len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            limit,
            offline,
        } => {
            let limit = limit.unwrap_or(config.recommendation_count);
            handle_recommend(dataset, &config, &title, limit, offline).await?
        }
        Commands::Titles { filter, limit } => handle_titles(&dataset, filter.as_deref(), limit),
        Commands::Benchmark { requests, limit } => handle_benchmark(&dataset, requests, limit)?,
        Commands::Fetch => {}
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    dataset: Arc<Dataset>,
    config: &AppConfig,
    title: &str,
    limit: usize,
    offline: bool,
) -> Result<()> {
    let metadata = metadata_provider(config, offline)?;
    let orchestrator = RecommendationOrchestrator::new(dataset, metadata);

    println!("{} Selected movie: {}", "✓".green(), title.bold());

    match orchestrator.get_recommendations(title, limit).await {
        Ok(recommendations) if recommendations.is_empty() => {
            println!("{}", "No recommendations found. Try another movie.".yellow());
        }
        Ok(recommendations) => print_recommendations(&recommendations),
        Err(LookupError::NotFound { .. }) => {
            let suggestions = orchestrator.catalog().search(title);
            warn!(title = %title, suggestions = suggestions.len(), "Unknown title");
            println!("{}", "Movie not found in dataset. Try another movie.".yellow());
            if !suggestions.is_empty() {
                println!("Did you mean:");
                for item in suggestions.iter().take(5) {
                    println!("  - {}", item.title);
                }
            }
        }
        Err(e) => return Err(e).context("Failed to generate recommendations"),
    }

    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(dataset: &Dataset, filter: Option<&str>, limit: usize) {
    let catalog = dataset.catalog();

    let (heading, items): (String, Vec<_>) = match filter {
        Some(query) => (
            format!("Titles matching '{}':", query),
            catalog.search(query),
        ),
        None => ("Titles:".to_string(), catalog.iter().collect()),
    };

    println!("{}", heading.bold().blue());
    for item in items.iter().take(limit) {
        println!("{:>6}  {}", item.index.to_string().dimmed(), item.title);
    }
    if items.len() > limit {
        println!("  ... and {} more", items.len() - limit);
    }
}

/// Handle the 'benchmark' command
fn handle_benchmark(dataset: &Dataset, requests: usize, limit: usize) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    let items = dataset.catalog().len();
    let query_indices: Vec<usize> = (0..requests)
        .map(|_| rand::random_range(0..items))
        .collect();

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for query in query_indices {
        let start = Instant::now();
        let ranked = top_similar(query, dataset.similarity(), limit)?;
        timings.push(start.elapsed());
        std::hint::black_box(ranked);
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Catalog size: {}", items);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation]) {
    println!("{}", "Recommended Movies for You:".bold().blue());
    for rec in recommendations {
        println!(
            "{}. {} - Similarity: {:.3}",
            rec.rank.to_string().green(),
            rec.title.bold(),
            rec.score
        );
        println!("   Poster: {}", rec.poster_url);
        println!("   Link:   {}", rec.detail_url);
    }
}
