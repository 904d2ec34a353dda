pub mod patch;
pub mod seed;

pub use patch::{ListingPatch, NewListing, Patch};

use crate::error::{CatalogError, Result};
use crate::models::{Listing, ListingId, UserId};
use crate::search::{ListingSearch, ScoredListing, SearchCriteria};
use crate::store::{ListingChange, ListingDraft, ListingStore};
use crate::validation::{
    normalize_category, normalize_condition, normalize_contact, normalize_image_urls,
    normalize_price, normalize_title, require_text,
};
use tracing::{debug, info, warn};

/// Fails with `NotFound` for a missing listing and `Forbidden` when `user_id`
/// is not its owner.
pub fn ensure_owner(listing: Option<&Listing>, user_id: UserId) -> Result<&Listing> {
    let listing = listing.ok_or(CatalogError::NotFound)?;
    if !listing.is_owned_by(user_id) {
        return Err(CatalogError::Forbidden {
            listing_id: listing.id,
            user_id,
        });
    }
    Ok(listing)
}

/// Owns every write to listings and their images.
///
/// `update` and `delete` do not check ownership so moderation tooling can call
/// them directly; user-facing callers go through `ensure_owner` or the
/// `*_as_owner` wrappers.
pub struct ListingCatalog<S: ListingStore> {
    store: S,
}

impl<S: ListingStore> ListingCatalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create(&mut self, input: NewListing) -> Result<Listing> {
        let draft = ListingDraft {
            owner_id: input.owner_id,
            title: normalize_title(&input.title)?,
            description: require_text("description", &input.description)?,
            price: normalize_price(input.price)?,
            condition: normalize_condition(Some(&input.condition))?,
            category: normalize_category(input.category.as_deref())?,
            contact_email: normalize_contact(input.contact_email.as_deref()),
            contact_phone: normalize_contact(input.contact_phone.as_deref()),
            image_urls: normalize_image_urls(&input.image_urls)?,
        };

        let listing = self.store.insert(draft)?;
        info!(
            "Created listing {} for user {} with {} images",
            listing.id,
            listing.owner_id,
            listing.images.len()
        );
        Ok(listing)
    }

    pub fn get(&self, listing_id: ListingId) -> Result<Option<Listing>> {
        Ok(self.store.get(listing_id)?)
    }

    pub fn list_all(&self) -> Result<Vec<Listing>> {
        Ok(self.store.all()?)
    }

    pub fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Listing>> {
        Ok(self
            .store
            .all()?
            .into_iter()
            .filter(|listing| listing.is_owned_by(owner_id))
            .collect())
    }

    /// Apply a partial update. Every supplied field is validated before
    /// anything is written; `None` means the listing does not exist.
    pub fn update(&mut self, listing_id: ListingId, patch: ListingPatch) -> Result<Option<Listing>> {
        if patch.is_empty() {
            debug!("Empty patch for listing {}, nothing to commit", listing_id);
            return self.get(listing_id);
        }

        let change = ListingChange {
            title: patch.title.try_map(|t| normalize_title(&t))?,
            description: patch
                .description
                .try_map(|d| require_text("description", &d))?,
            price: patch.price.try_map(normalize_price)?,
            condition: patch.condition.try_map(|c| normalize_condition(Some(&c)))?,
            category: patch.category.try_map(|c| normalize_category(Some(&c)))?,
            is_sold: patch.is_sold.into_option(),
            contact_email: patch
                .contact_email
                .into_option()
                .map(|email| normalize_contact(email.as_deref())),
            contact_phone: patch
                .contact_phone
                .into_option()
                .map(|phone| normalize_contact(phone.as_deref())),
            add_image_urls: normalize_image_urls(&patch.add_image_urls)?,
            remove_image_ids: patch.remove_image_ids,
        };

        let updated = self.store.apply(listing_id, change)?;
        match &updated {
            Some(listing) => info!("Updated listing {}", listing.id),
            None => debug!("Update skipped, listing {} not found", listing_id),
        }
        Ok(updated)
    }

    /// Remove a listing and its images. Returns whether a row was removed.
    pub fn delete(&mut self, listing_id: ListingId) -> Result<bool> {
        let removed = self.store.remove(listing_id)?;
        if removed {
            info!("Deleted listing {}", listing_id);
        } else {
            debug!("Delete skipped, listing {} not found", listing_id);
        }
        Ok(removed)
    }

    /// Owner-only sale transition. Returns `false` when the listing does not exist.
    /// Marking an already sold listing is a no-op success.
    pub fn mark_sold(&mut self, listing_id: ListingId, user_id: UserId) -> Result<bool> {
        let Some(listing) = self.store.get(listing_id)? else {
            return Ok(false);
        };
        if let Err(err) = ensure_owner(Some(&listing), user_id) {
            warn!("User {} tried to mark listing {} sold", user_id, listing_id);
            return Err(err);
        }
        if listing.is_sold {
            debug!("Listing {} already sold", listing_id);
            return Ok(true);
        }

        let change = ListingChange {
            is_sold: Some(true),
            ..Default::default()
        };
        let marked = self.store.apply(listing_id, change)?.is_some();
        if marked {
            info!("Listing {} marked sold", listing_id);
        }
        Ok(marked)
    }

    pub fn update_as_owner(
        &mut self,
        listing_id: ListingId,
        user_id: UserId,
        patch: ListingPatch,
    ) -> Result<Listing> {
        self.require_owner(listing_id, user_id)?;
        self.update(listing_id, patch)?.ok_or(CatalogError::NotFound)
    }

    pub fn delete_as_owner(&mut self, listing_id: ListingId, user_id: UserId) -> Result<()> {
        self.require_owner(listing_id, user_id)?;
        if self.delete(listing_id)? {
            Ok(())
        } else {
            Err(CatalogError::NotFound)
        }
    }

    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        ListingSearch::new(&self.store).search(criteria)
    }

    pub fn search_ranked(&self, criteria: &SearchCriteria) -> Result<Vec<ScoredListing>> {
        ListingSearch::new(&self.store).search_ranked(criteria)
    }

    /// Search when any criterion is present, otherwise list everything
    pub fn browse(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        if criteria.has_criteria() {
            self.search(criteria)
        } else {
            self.list_all()
        }
    }

    fn require_owner(&self, listing_id: ListingId, user_id: UserId) -> Result<()> {
        let listing = self.store.get(listing_id)?;
        if let Err(err) = ensure_owner(listing.as_ref(), user_id) {
            warn!("Owner check failed for listing {}: {}", listing_id, err);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Condition};
    use crate::store::InMemoryStore;
    use rstest::{fixture, rstest};

    const OWNER: UserId = 1;
    const OTHER: UserId = 2;

    #[fixture]
    fn catalog() -> ListingCatalog<InMemoryStore> {
        ListingCatalog::new(InMemoryStore::new())
    }

    fn fridge() -> NewListing {
        NewListing::new(OWNER, "Mini Fridge", "Works well", 100.0, "Good")
            .category("Electronics")
            .images(["fridge1.jpg", "fridge2.jpg"])
    }

    #[rstest]
    fn create_persists_listing_with_images(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog
            .create(fridge().contact_email("owner@charlotte.edu"))
            .unwrap();

        assert_eq!(listing.title, "Mini Fridge");
        assert_eq!(listing.condition, Condition::Good);
        assert_eq!(listing.category, Category::Electronics);
        assert!(!listing.is_sold);
        assert_eq!(listing.images.len(), 2);
        assert_eq!(listing.contact_email.as_deref(), Some("owner@charlotte.edu"));
        assert_eq!(catalog.get(listing.id).unwrap(), Some(listing));
    }

    #[rstest]
    fn create_defaults_category_to_other(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog
            .create(NewListing::new(OWNER, "Lamp", "Desk lamp", "12.5", "Fair"))
            .unwrap();
        assert_eq!(listing.category, Category::Other);
        assert_eq!(listing.price, 12.5);
    }

    #[rstest]
    fn duplicate_entries_are_allowed(mut catalog: ListingCatalog<InMemoryStore>) {
        catalog.create(NewListing::new(OWNER, "Chair", "Nice chair", 20.0, "Good")).unwrap();
        catalog.create(NewListing::new(OWNER, "Chair", "Nice chair", 20.0, "Good")).unwrap();
        assert_eq!(catalog.list_all().unwrap().len(), 2);
    }

    #[rstest]
    #[case(NewListing::new(OWNER, "  ", "desc", 1.0, "Good"))]
    #[case(NewListing::new(OWNER, "title", "", 1.0, "Good"))]
    #[case(fridge().images(["ok.jpg", " "]))]
    fn create_rejects_blank_text(
        mut catalog: ListingCatalog<InMemoryStore>,
        #[case] input: NewListing,
    ) {
        assert!(matches!(catalog.create(input), Err(CatalogError::InvalidInput(_))));
        assert!(catalog.list_all().unwrap().is_empty());
    }

    #[rstest]
    fn create_rejects_invalid_values(mut catalog: ListingCatalog<InMemoryStore>) {
        let bad_price = NewListing::new(OWNER, "Broken", "Invalid price", -5.0, "Good");
        assert!(matches!(catalog.create(bad_price), Err(CatalogError::InvalidPrice(_))));

        let bad_condition = NewListing::new(OWNER, "Bad", "Desc", 5.0, "NotACondition");
        assert!(matches!(
            catalog.create(bad_condition),
            Err(CatalogError::InvalidCondition(_))
        ));

        let bad_category = fridge().category("Vehicles");
        assert!(matches!(
            catalog.create(bad_category),
            Err(CatalogError::InvalidCategory(_))
        ));

        assert!(catalog.list_all().unwrap().is_empty());
        assert!(catalog.store().images_for(1).unwrap().is_empty());
    }

    #[rstest]
    fn update_all_fields(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        let patch = ListingPatch::new()
            .title("Mini Fridge (Edited)")
            .description("Updated description")
            .price(75.0)
            .condition("New")
            .category("Furniture");

        let updated = catalog.update(listing.id, patch).unwrap().unwrap();
        assert_eq!(updated.title, "Mini Fridge (Edited)");
        assert_eq!(updated.description, "Updated description");
        assert_eq!(updated.price, 75.0);
        assert_eq!(updated.condition, Condition::New);
        assert_eq!(updated.category, Category::Furniture);
        assert_eq!(updated.owner_id, OWNER);
        assert_eq!(updated.created_at, listing.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[rstest]
    fn partial_update_keeps_other_fields(mut catalog: ListingCatalog<InMemoryStore>) {
        let before = catalog.create(fridge()).unwrap();
        let after = catalog
            .update(before.id, ListingPatch::new().price(75.0))
            .unwrap()
            .unwrap();

        assert_eq!(after.price, 75.0);
        assert_eq!(after.title, before.title);
        assert_eq!(after.description, before.description);
        assert_eq!(after.condition, before.condition);
        assert_eq!(after.category, before.category);
        assert_eq!(after.images, before.images);
    }

    #[rstest]
    fn failed_update_writes_nothing(mut catalog: ListingCatalog<InMemoryStore>) {
        let before = catalog.create(fridge()).unwrap();
        let patch = ListingPatch::new()
            .title("Should not land")
            .condition("NotAReal Condition")
            .add_images(["new.jpg"]);

        assert!(matches!(
            catalog.update(before.id, patch),
            Err(CatalogError::InvalidCondition(_))
        ));
        assert_eq!(catalog.get(before.id).unwrap(), Some(before.clone()));

        assert!(matches!(
            catalog.update(before.id, ListingPatch::new().price(-1.0)),
            Err(CatalogError::InvalidPrice(_))
        ));
        assert_eq!(catalog.get(before.id).unwrap().unwrap().price, 100.0);
    }

    #[rstest]
    fn update_images_add_and_remove(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        let other = catalog
            .create(NewListing::new(OTHER, "Lamp", "Desk lamp", 10.0, "Good").images(["lamp.jpg"]))
            .unwrap();
        let removed = listing.images[0].id;

        let patch = ListingPatch::new()
            .add_images(["fridge3.jpg"])
            .remove_images([removed, other.images[0].id, 9_999]);
        let updated = catalog.update(listing.id, patch).unwrap().unwrap();

        let urls: Vec<&str> = updated.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["fridge2.jpg", "fridge3.jpg"]);
        assert_eq!(catalog.get(other.id).unwrap().unwrap().images.len(), 1);
    }

    #[rstest]
    fn contact_fields_can_be_cleared(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog
            .create(fridge().contact_email("a@b.edu").contact_phone("555-0100"))
            .unwrap();

        let updated = catalog
            .update(listing.id, ListingPatch::new().contact_email(None))
            .unwrap()
            .unwrap();
        assert_eq!(updated.contact_email, None);
        assert_eq!(updated.contact_phone.as_deref(), Some("555-0100"));
    }

    #[rstest]
    fn update_missing_listing_is_none(mut catalog: ListingCatalog<InMemoryStore>) {
        assert!(catalog.update(404, ListingPatch::new().price(1.0)).unwrap().is_none());
        assert!(catalog.update(404, ListingPatch::new()).unwrap().is_none());
    }

    #[rstest]
    fn empty_patch_leaves_row_untouched(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        let unchanged = catalog.update(listing.id, ListingPatch::new()).unwrap().unwrap();

        assert_eq!(unchanged, listing);
        assert!(unchanged.updated_at.is_none());
    }

    #[rstest]
    fn delete_cascades_images(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        assert!(catalog.delete(listing.id).unwrap());
        assert!(catalog.get(listing.id).unwrap().is_none());
        assert!(catalog.store().images_for(listing.id).unwrap().is_empty());
        assert!(!catalog.delete(listing.id).unwrap());
    }

    #[rstest]
    fn mark_sold_by_owner_is_idempotent(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        assert!(catalog.mark_sold(listing.id, OWNER).unwrap());
        let first = catalog.get(listing.id).unwrap().unwrap();
        assert!(first.is_sold);

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(catalog.mark_sold(listing.id, OWNER).unwrap());
        let second = catalog.get(listing.id).unwrap().unwrap();
        assert_eq!(second, first);
    }

    #[rstest]
    fn mark_sold_by_other_user_is_forbidden(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        assert!(matches!(
            catalog.mark_sold(listing.id, OTHER),
            Err(CatalogError::Forbidden { user_id: OTHER, .. })
        ));
        assert!(!catalog.get(listing.id).unwrap().unwrap().is_sold);

        catalog.mark_sold(listing.id, OWNER).unwrap();
        assert!(matches!(
            catalog.mark_sold(listing.id, OTHER),
            Err(CatalogError::Forbidden { .. })
        ));
        assert!(catalog.get(listing.id).unwrap().unwrap().is_sold);
    }

    #[rstest]
    fn mark_sold_missing_returns_false(mut catalog: ListingCatalog<InMemoryStore>) {
        assert!(!catalog.mark_sold(123_456_789, OWNER).unwrap());
    }

    #[rstest]
    fn ensure_owner_distinguishes_missing_and_foreign(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        assert!(matches!(ensure_owner(None, OWNER), Err(CatalogError::NotFound)));
        assert!(matches!(
            ensure_owner(Some(&listing), OTHER),
            Err(CatalogError::Forbidden { .. })
        ));
        assert_eq!(ensure_owner(Some(&listing), OWNER).unwrap().id, listing.id);
    }

    #[rstest]
    fn owner_gated_wrappers(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();

        assert!(matches!(
            catalog.update_as_owner(listing.id, OTHER, ListingPatch::new().price(1.0)),
            Err(CatalogError::Forbidden { .. })
        ));
        assert!(matches!(
            catalog.delete_as_owner(listing.id, OTHER),
            Err(CatalogError::Forbidden { .. })
        ));
        assert!(matches!(
            catalog.delete_as_owner(999, OWNER),
            Err(CatalogError::NotFound)
        ));

        let updated = catalog
            .update_as_owner(listing.id, OWNER, ListingPatch::new().price(1.0))
            .unwrap();
        assert_eq!(updated.price, 1.0);
        catalog.delete_as_owner(listing.id, OWNER).unwrap();
        assert!(catalog.list_all().unwrap().is_empty());
    }

    #[rstest]
    fn generic_update_can_reactivate(mut catalog: ListingCatalog<InMemoryStore>) {
        let listing = catalog.create(fridge()).unwrap();
        catalog.mark_sold(listing.id, OWNER).unwrap();
        let reopened = catalog
            .update(listing.id, ListingPatch::new().sold(false))
            .unwrap()
            .unwrap();
        assert!(!reopened.is_sold);
    }

    #[rstest]
    fn list_by_owner_filters(mut catalog: ListingCatalog<InMemoryStore>) {
        catalog.create(fridge()).unwrap();
        catalog.create(NewListing::new(OTHER, "Lamp", "Desk lamp", 10.0, "Good")).unwrap();
        catalog.create(NewListing::new(OWNER, "Rug", "Blue rug", 30.0, "Fair")).unwrap();

        let mine: Vec<String> = catalog
            .list_by_owner(OWNER)
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(mine, vec!["Mini Fridge", "Rug"]);
    }

    #[rstest]
    fn browse_dispatches_on_criteria(mut catalog: ListingCatalog<InMemoryStore>) {
        catalog.create(fridge()).unwrap();
        catalog.create(NewListing::new(OWNER, "Lamp", "Desk lamp", 10.0, "Good")).unwrap();

        assert_eq!(catalog.browse(&SearchCriteria::new()).unwrap().len(), 2);
        let cheap = catalog
            .browse(&SearchCriteria::new().max_price(50.0))
            .unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].title, "Lamp");
    }
}
