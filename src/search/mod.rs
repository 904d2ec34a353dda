pub mod fuzzy;
pub mod types;

pub use fuzzy::token_sort_ratio;
pub use types::{ScoredListing, SearchCriteria, DEFAULT_THRESHOLD};

use crate::error::Result;
use crate::models::Listing;
use crate::store::ListingStore;
use tracing::debug;

/// Resolves search criteria against a listing store.
///
/// Structured filters (price bounds, condition and category membership) run in
/// the store first. The fuzzy keyword pass then keeps a listing when the better
/// of its title and description scores reaches the threshold.
pub struct ListingSearch<'a, S: ListingStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ListingStore + ?Sized> ListingSearch<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Matching listings in store order
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        Ok(self
            .scored(criteria)?
            .into_iter()
            .map(|scored| scored.listing)
            .collect())
    }

    /// Matching listings sorted by descending score, ties kept in store order
    pub fn search_ranked(&self, criteria: &SearchCriteria) -> Result<Vec<ScoredListing>> {
        let mut scored = self.scored(criteria)?;
        scored.sort_by(|a, b| {
            let a = a.score.unwrap_or_default();
            let b = b.score.unwrap_or_default();
            b.total_cmp(&a)
        });
        Ok(scored)
    }

    fn scored(&self, criteria: &SearchCriteria) -> Result<Vec<ScoredListing>> {
        let candidates = self.store.filter(&criteria.structured_filter())?;
        debug!(
            "Structured filters left {} candidates in {} store",
            candidates.len(),
            self.store.backend_name()
        );

        let Some(keyword) = criteria.effective_keyword() else {
            return Ok(candidates
                .into_iter()
                .map(|listing| ScoredListing { listing, score: None })
                .collect());
        };

        let threshold = criteria.effective_threshold();
        let matched: Vec<ScoredListing> = candidates
            .into_iter()
            .filter_map(|listing| {
                let score = keyword_score(keyword, &listing);
                (score >= threshold).then_some(ScoredListing {
                    listing,
                    score: Some(score),
                })
            })
            .collect();

        debug!(
            "Keyword {:?} at threshold {} kept {} listings",
            keyword,
            threshold,
            matched.len()
        );
        Ok(matched)
    }
}

/// Best of the title and description scores for a keyword
pub fn keyword_score(keyword: &str, listing: &Listing) -> f64 {
    let title = token_sort_ratio(keyword, &listing.title);
    let description = token_sort_ratio(keyword, &listing.description);
    title.max(description)
}
