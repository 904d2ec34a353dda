use crate::models::{ImageId, UserId};
use crate::validation::PriceInput;

/// A single field of a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    /// Leave the stored value unchanged
    Unset,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Unset => None,
            Patch::Set(value) => Some(value),
        }
    }

    /// Run a fallible conversion over a set value
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Option<U>, E> {
        match self {
            Patch::Unset => Ok(None),
            Patch::Set(value) => f(value).map(Some),
        }
    }
}

/// Input for creating a listing. Text fields are raw and validated on create.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub price: PriceInput,
    pub condition: String,
    /// `None` files the listing under `Other`
    pub category: Option<String>,
    pub image_urls: Vec<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl NewListing {
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<PriceInput>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            owner_id,
            title: title.into(),
            description: description.into(),
            price: price.into(),
            condition: condition.into(),
            category: None,
            image_urls: Vec::new(),
            contact_email: None,
            contact_phone: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    pub fn contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = Some(phone.into());
        self
    }
}

/// Partial update of a listing.
///
/// Required fields (title, description, price, condition, category) can only be
/// replaced. Contact fields can also be cleared with `Patch::Set(None)`.
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub price: Patch<PriceInput>,
    pub condition: Patch<String>,
    pub category: Patch<String>,
    pub is_sold: Patch<bool>,
    pub contact_email: Patch<Option<String>>,
    pub contact_phone: Patch<Option<String>>,
    pub add_image_urls: Vec<String>,
    pub remove_image_ids: Vec<ImageId>,
}

impl ListingPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Patch::Set(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Patch::Set(description.into());
        self
    }

    pub fn price(mut self, price: impl Into<PriceInput>) -> Self {
        self.price = Patch::Set(price.into());
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Patch::Set(condition.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Patch::Set(category.into());
        self
    }

    pub fn sold(mut self, is_sold: bool) -> Self {
        self.is_sold = Patch::Set(is_sold);
        self
    }

    pub fn contact_email(mut self, email: Option<String>) -> Self {
        self.contact_email = Patch::Set(email);
        self
    }

    pub fn contact_phone(mut self, phone: Option<String>) -> Self {
        self.contact_phone = Patch::Set(phone);
        self
    }

    pub fn add_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_image_urls.extend(urls.into_iter().map(Into::into));
        self
    }

    pub fn remove_images(mut self, ids: impl IntoIterator<Item = ImageId>) -> Self {
        self.remove_image_ids.extend(ids);
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.title.is_set()
            && !self.description.is_set()
            && !self.price.is_set()
            && !self.condition.is_set()
            && !self.category.is_set()
            && !self.is_sold.is_set()
            && !self.contact_email.is_set()
            && !self.contact_phone.is_set()
            && self.add_image_urls.is_empty()
            && self.remove_image_ids.is_empty()
    }
}
