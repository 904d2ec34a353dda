//! Field rules applied before any listing write reaches the store.
//!
//! Everything here is pure: no store access, no logging.

use crate::error::{CatalogError, Result};
use crate::models::{Category, Condition, MAX_TITLE_LEN};

/// Raw price as it arrives from a caller, either already numeric or typed text
#[derive(Debug, Clone, PartialEq)]
pub enum PriceInput {
    Amount(f64),
    Text(String),
}

impl From<f64> for PriceInput {
    fn from(value: f64) -> Self {
        PriceInput::Amount(value)
    }
}

impl From<i64> for PriceInput {
    fn from(value: i64) -> Self {
        PriceInput::Amount(value as f64)
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        PriceInput::Text(value.to_string())
    }
}

impl From<String> for PriceInput {
    fn from(value: String) -> Self {
        PriceInput::Text(value)
    }
}

pub fn normalize_condition(value: Option<&str>) -> Result<Condition> {
    let raw = value.unwrap_or_default();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidCondition(raw.to_string()));
    }
    Condition::from_label(trimmed).ok_or_else(|| CatalogError::InvalidCondition(raw.to_string()))
}

/// Absent input falls back to `Other`; present input must name a known category.
pub fn normalize_category(value: Option<&str>) -> Result<Category> {
    let Some(raw) = value else {
        return Ok(Category::Other);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidCategory(raw.to_string()));
    }
    Category::from_label(trimmed).ok_or_else(|| CatalogError::InvalidCategory(raw.to_string()))
}

pub fn normalize_price(value: impl Into<PriceInput>) -> Result<f64> {
    let price = match value.into() {
        PriceInput::Amount(amount) => amount,
        PriceInput::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| CatalogError::InvalidPrice(format!("{text:?} is not a number")))?,
    };

    if !price.is_finite() {
        return Err(CatalogError::InvalidPrice(format!("{price} is not a finite amount")));
    }
    if price < 0.0 {
        return Err(CatalogError::InvalidPrice(format!("{price} is negative")));
    }
    Ok(price)
}

/// Trims a required text field, rejecting blank values.
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub fn normalize_title(value: &str) -> Result<String> {
    let title = require_text("title", value)?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CatalogError::InvalidInput(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title)
}

pub fn normalize_image_urls(urls: &[String]) -> Result<Vec<String>> {
    urls.iter().map(|url| require_text("image url", url)).collect()
}

/// Blank contact values are stored as absent.
pub fn normalize_contact(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
