use serde::{Deserialize, Serialize};

use crate::models::Listing;
use crate::store::StructuredFilter;

pub const DEFAULT_THRESHOLD: u8 = 60;
pub const MAX_THRESHOLD: u8 = 100;

/// Search parameters for the listing catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCriteria {
    /// Free-text keyword, fuzzy matched against title and description
    pub keyword: Option<String>,
    /// Minimum similarity score (0-100) a listing needs to stay in the result
    pub threshold: u8,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// Condition labels; empty means any condition
    pub conditions: Vec<String>,
    /// Category labels; empty means any category
    pub categories: Vec<String>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            keyword: None,
            threshold: DEFAULT_THRESHOLD,
            min_price: None,
            max_price: None,
            conditions: Vec::new(),
            categories: Vec::new(),
        }
    }
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Values above 100 are clamped
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold.min(MAX_THRESHOLD);
        self
    }

    pub fn min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Keyword after trimming, `None` when blank
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn effective_threshold(&self) -> f64 {
        f64::from(self.threshold.min(MAX_THRESHOLD))
    }

    /// Whether any criterion would narrow the catalog.
    ///
    /// A zero minimum and an infinite maximum count as absent, matching how the
    /// browse form fills unset price boxes.
    pub fn has_criteria(&self) -> bool {
        self.effective_keyword().is_some()
            || self.min_price.is_some_and(|min| min > 0.0)
            || self.max_price.is_some_and(|max| max.is_finite())
            || !self.conditions.is_empty()
            || !self.categories.is_empty()
    }

    pub fn structured_filter(&self) -> StructuredFilter {
        StructuredFilter {
            min_price: self.min_price,
            max_price: self.max_price,
            conditions: self.conditions.clone(),
            categories: self.categories.clone(),
        }
    }
}

/// A listing that survived the keyword pass, with its best score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredListing {
    pub listing: Listing,
    /// `max(title score, description score)`, absent when no keyword was given
    pub score: Option<f64>,
}
