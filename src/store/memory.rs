use crate::models::{Image, ImageId, Listing, ListingId};
use crate::validation::{normalize_title, require_text};
use crate::store::traits::{ListingChange, ListingDraft, ListingStore, StructuredFilter};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Serializable copy of a whole catalog, images embedded in their listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub listings: Vec<Listing>,
}

/// In-process store keyed by id, so iteration order is insertion order.
///
/// Listing rows are kept without images; images live in their own table and
/// are joined back on every read.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    listings: BTreeMap<ListingId, Listing>,
    images: BTreeMap<ImageId, Image>,
    next_listing_id: ListingId,
    next_image_id: ImageId,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            listings: BTreeMap::new(),
            images: BTreeMap::new(),
            next_listing_id: 1,
            next_image_id: 1,
        }
    }

    /// Rebuild a store from a snapshot. Id counters resume after the highest id seen.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        let mut store = Self::new();

        for mut listing in snapshot.listings {
            if store.listings.contains_key(&listing.id) {
                bail!("duplicate listing id {} in snapshot", listing.id);
            }
            if !listing.price.is_finite() || listing.price < 0.0 {
                bail!("listing {} has invalid price {}", listing.id, listing.price);
            }
            normalize_title(&listing.title)
                .with_context(|| format!("listing {} has an invalid title", listing.id))?;
            require_text("description", &listing.description)
                .with_context(|| format!("listing {} has an invalid description", listing.id))?;

            for image in listing.images.drain(..) {
                if image.listing_id != listing.id {
                    bail!(
                        "image {} claims listing {} but is nested under listing {}",
                        image.id,
                        image.listing_id,
                        listing.id
                    );
                }
                if store.images.insert(image.id, image.clone()).is_some() {
                    bail!("duplicate image id {} in snapshot", image.id);
                }
                let after = image
                    .id
                    .checked_add(1)
                    .with_context(|| format!("image id {} leaves no room for new ids", image.id))?;
                store.next_image_id = store.next_image_id.max(after);
            }

            let after = listing
                .id
                .checked_add(1)
                .with_context(|| format!("listing id {} leaves no room for new ids", listing.id))?;
            store.next_listing_id = store.next_listing_id.max(after);
            store.listings.insert(listing.id, listing);
        }

        debug!(
            "Restored {} listings and {} images from snapshot",
            store.listings.len(),
            store.images.len()
        );
        Ok(store)
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            listings: self.listings.values().map(|row| self.hydrate(row)).collect(),
        }
    }

    fn hydrate(&self, row: &Listing) -> Listing {
        let mut listing = row.clone();
        listing.images = self.images_of(row.id);
        listing
    }

    fn images_of(&self, listing_id: ListingId) -> Vec<Image> {
        self.images
            .values()
            .filter(|image| image.listing_id == listing_id)
            .cloned()
            .collect()
    }

    fn attach(&mut self, listing_id: ListingId, urls: Vec<String>) {
        for url in urls {
            let id = self.next_image_id;
            self.next_image_id += 1;
            self.images.insert(id, Image { id, listing_id, url });
        }
    }
}

impl ListingStore for InMemoryStore {
    fn insert(&mut self, draft: ListingDraft) -> Result<Listing> {
        let id = self.next_listing_id;
        self.next_listing_id += 1;

        let row = Listing {
            id,
            owner_id: draft.owner_id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            condition: draft.condition,
            category: draft.category,
            is_sold: false,
            contact_email: draft.contact_email,
            contact_phone: draft.contact_phone,
            images: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.listings.insert(id, row);
        self.attach(id, draft.image_urls);

        Ok(self.hydrate(&self.listings[&id]))
    }

    fn get(&self, id: ListingId) -> Result<Option<Listing>> {
        Ok(self.listings.get(&id).map(|row| self.hydrate(row)))
    }

    fn all(&self) -> Result<Vec<Listing>> {
        Ok(self.listings.values().map(|row| self.hydrate(row)).collect())
    }

    fn filter(&self, filter: &StructuredFilter) -> Result<Vec<Listing>> {
        Ok(self
            .listings
            .values()
            .filter(|row| filter.matches(row))
            .map(|row| self.hydrate(row))
            .collect())
    }

    fn apply(&mut self, id: ListingId, change: ListingChange) -> Result<Option<Listing>> {
        let Some(current) = self.listings.get(&id) else {
            return Ok(None);
        };

        let mut row = current.clone();
        if let Some(title) = change.title {
            row.title = title;
        }
        if let Some(description) = change.description {
            row.description = description;
        }
        if let Some(price) = change.price {
            row.price = price;
        }
        if let Some(condition) = change.condition {
            row.condition = condition;
        }
        if let Some(category) = change.category {
            row.category = category;
        }
        if let Some(is_sold) = change.is_sold {
            row.is_sold = is_sold;
        }
        if let Some(email) = change.contact_email {
            row.contact_email = email;
        }
        if let Some(phone) = change.contact_phone {
            row.contact_phone = phone;
        }
        row.updated_at = Some(Utc::now());

        self.listings.insert(id, row);
        self.images.retain(|image_id, image| {
            !(image.listing_id == id && change.remove_image_ids.contains(image_id))
        });
        self.attach(id, change.add_image_urls);

        Ok(self.listings.get(&id).map(|row| self.hydrate(row)))
    }

    fn remove(&mut self, id: ListingId) -> Result<bool> {
        if self.listings.remove(&id).is_none() {
            return Ok(false);
        }
        self.images.retain(|_, image| image.listing_id != id);
        Ok(true)
    }

    fn images_for(&self, listing_id: ListingId) -> Result<Vec<Image>> {
        Ok(self.images_of(listing_id))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
