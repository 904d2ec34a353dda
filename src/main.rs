use anyhow::{Context, Result};
use campus_market::catalog::seed::seed_demo;
use campus_market::config::Config;
use campus_market::store::CatalogSnapshot;
use campus_market::{InMemoryStore, ListingCatalog, ScoredListing, SearchCriteria};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search the campus market catalog
#[derive(Debug, Parser)]
#[command(name = "campus-market", version)]
struct Cli {
    /// Keyword to fuzzy match against titles and descriptions
    keyword: Option<String>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    /// Condition label, repeatable (e.g. --condition "Like New")
    #[arg(long = "condition")]
    conditions: Vec<String>,

    /// Category label, repeatable
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Fuzzy match threshold, 0-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Order keyword results by score
    #[arg(long)]
    ranked: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    info!("🛒 Campus Market - Listing Search");
    info!("==================================");

    let catalog = load_catalog(&config).await?;

    let mut criteria =
        SearchCriteria::new().threshold(cli.threshold.unwrap_or(config.default_threshold));
    criteria.keyword = cli.keyword;
    criteria.min_price = cli.min_price;
    criteria.max_price = cli.max_price;
    criteria.conditions = cli.conditions;
    criteria.categories = cli.categories;

    let results = if cli.ranked {
        catalog.search_ranked(&criteria)?
    } else {
        catalog
            .browse(&criteria)?
            .into_iter()
            .map(|listing| ScoredListing { listing, score: None })
            .collect()
    };

    info!("✅ Found {} listings", results.len());

    for (i, result) in results.iter().enumerate() {
        let listing = &result.listing;
        let sold = if listing.is_sold { " [SOLD]" } else { "" };
        println!("{}. {} (${:.2}){}", i + 1, listing.title, listing.price, sold);
        println!("   {} · {}", listing.condition, listing.category);
        if let Some(score) = result.score {
            println!("   Score: {:.1}", score);
        }
        println!("   ID: {}", listing.id);
        println!("   Images: {}", listing.images.len());
        println!();
    }

    let json = serde_json::to_string_pretty(&results)?;
    tokio::fs::write(&config.results_path, json)
        .await
        .with_context(|| format!("Failed to write {}", config.results_path.display()))?;
    info!("💾 Saved results to {}", config.results_path.display());

    // Persist the catalog so a seeded demo survives the next run
    save_snapshot(&config, &catalog.store().snapshot()).await?;

    Ok(())
}

async fn load_catalog(config: &Config) -> Result<ListingCatalog<InMemoryStore>> {
    if tokio::fs::try_exists(&config.catalog_path).await? {
        let raw = tokio::fs::read_to_string(&config.catalog_path)
            .await
            .with_context(|| format!("Failed to read {}", config.catalog_path.display()))?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", config.catalog_path.display()))?;
        let store = InMemoryStore::from_snapshot(snapshot)?;
        info!("Loaded catalog from {}", config.catalog_path.display());
        return Ok(ListingCatalog::new(store));
    }

    info!(
        "No catalog at {}, seeding demo listings",
        config.catalog_path.display()
    );
    let mut catalog = ListingCatalog::new(InMemoryStore::new());
    seed_demo(&mut catalog)?;
    Ok(catalog)
}

async fn save_snapshot(config: &Config, snapshot: &CatalogSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    tokio::fs::write(&config.catalog_path, json)
        .await
        .with_context(|| format!("Failed to write {}", config.catalog_path.display()))?;
    info!(
        "💾 Saved {} listings to {}",
        snapshot.listings.len(),
        config.catalog_path.display()
    );
    Ok(())
}
