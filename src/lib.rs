//! Listing catalog and search engine for a campus classifieds marketplace.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod validation;

pub use catalog::{ensure_owner, ListingCatalog, ListingPatch, NewListing, Patch};
pub use error::{CatalogError, Result};
pub use models::{Category, Condition, Image, Listing};
pub use search::{ScoredListing, SearchCriteria};
pub use store::{InMemoryStore, ListingStore};
