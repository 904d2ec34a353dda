use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ListingId = i64;
pub type ImageId = i64;
pub type UserId = i64;

/// Maximum title length in characters
pub const MAX_TITLE_LEN: usize = 100;

/// Physical condition of a listed item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Condition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
    #[serde(rename = "For Parts")]
    ForParts,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
        Condition::ForParts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::ForParts => "For Parts",
        }
    }

    /// Exact, case-sensitive lookup by display label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marketplace category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Books,
    Electronics,
    Furniture,
    Clothing,
    Hobby,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Books,
        Category::Electronics,
        Category::Furniture,
        Category::Clothing,
        Category::Hobby,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Books => "Books",
            Category::Electronics => "Electronics",
            Category::Furniture => "Furniture",
            Category::Clothing => "Clothing",
            Category::Hobby => "Hobby",
            Category::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image attached to a listing. The url is an opaque path owned by the upload storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub id: ImageId,
    pub listing_id: ListingId,
    pub url: String,
}

/// Core listing data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub condition: Condition,
    pub category: Category,
    #[serde(default)]
    pub is_sold: bool,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}
