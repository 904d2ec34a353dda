pub mod memory;
pub mod traits;

pub use memory::{CatalogSnapshot, InMemoryStore};
pub use traits::{ListingChange, ListingDraft, ListingStore, StructuredFilter};
