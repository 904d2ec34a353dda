use anyhow::{ensure, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::search::DEFAULT_THRESHOLD;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub results_path: PathBuf,
    pub default_threshold: u8,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let default_threshold = match lookup("MARKET_FUZZY_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .context("MARKET_FUZZY_THRESHOLD must be an integer between 0 and 100")?,
            None => DEFAULT_THRESHOLD,
        };
        ensure!(
            default_threshold <= 100,
            "MARKET_FUZZY_THRESHOLD must be between 0 and 100, got {}",
            default_threshold
        );

        Ok(Self {
            catalog_path: lookup("MARKET_CATALOG_PATH")
                .unwrap_or_else(|| "campus_market.json".to_string())
                .into(),
            results_path: lookup("MARKET_RESULTS_PATH")
                .unwrap_or_else(|| "search_results.json".to_string())
                .into(),
            default_threshold,
        })
    }
}
