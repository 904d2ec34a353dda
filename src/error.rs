use thiserror::Error;

use crate::models::{ListingId, UserId};

/// Errors raised by the listing catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid condition: {0:?}")]
    InvalidCondition(String),

    #[error("Invalid category: {0:?}")]
    InvalidCategory(String),

    #[error("Listing not found")]
    NotFound,

    #[error("User {user_id} is not the owner of listing {listing_id}")]
    Forbidden {
        listing_id: ListingId,
        user_id: UserId,
    },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
