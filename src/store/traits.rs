use crate::models::{Category, Condition, Image, ImageId, Listing, ListingId, UserId};
use anyhow::Result;

/// A fully validated listing ready to be inserted together with its images
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub condition: Condition,
    pub category: Category,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image_urls: Vec<String>,
}

/// A validated set of changes to one listing, applied in a single commit.
/// `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingChange {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub condition: Option<Condition>,
    pub category: Option<Category>,
    pub is_sold: Option<bool>,
    pub contact_email: Option<Option<String>>,
    pub contact_phone: Option<Option<String>>,
    pub add_image_urls: Vec<String>,
    pub remove_image_ids: Vec<ImageId>,
}

/// Exact predicates evaluated by the store before any fuzzy matching.
/// Condition and category values are compared literally against stored labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub conditions: Vec<String>,
    pub categories: Vec<String>,
}

impl StructuredFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        if self.min_price.is_some_and(|min| listing.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }
        if !self.conditions.is_empty()
            && !self.conditions.iter().any(|c| c == listing.condition.as_str())
        {
            return false;
        }
        if !self.categories.is_empty()
            && !self.categories.iter().any(|c| c == listing.category.as_str())
        {
            return false;
        }
        true
    }
}

/// Persistence contract for listings and their images.
///
/// Each mutating call is one transaction: it either applies completely or
/// leaves the store untouched. Reads return listings in store order with
/// their images attached.
pub trait ListingStore: Send + Sync {
    /// Insert a listing and one image row per url
    fn insert(&mut self, draft: ListingDraft) -> Result<Listing>;

    fn get(&self, id: ListingId) -> Result<Option<Listing>>;

    fn all(&self) -> Result<Vec<Listing>>;

    fn filter(&self, filter: &StructuredFilter) -> Result<Vec<Listing>>;

    /// Apply a change set. Image ids not attached to this listing are skipped.
    /// Returns `None` when the listing does not exist.
    fn apply(&mut self, id: ListingId, change: ListingChange) -> Result<Option<Listing>>;

    /// Remove a listing and every image attached to it
    fn remove(&mut self, id: ListingId) -> Result<bool>;

    fn images_for(&self, listing_id: ListingId) -> Result<Vec<Image>>;

    /// Name of the backend, used in log lines
    fn backend_name(&self) -> &'static str;
}
