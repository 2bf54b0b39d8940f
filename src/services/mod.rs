pub mod booking_store;
pub mod catalog;
pub mod dates;
pub mod ui_store;
pub mod validation;

pub use booking_store::BookingStore;
pub use catalog::{CatalogSource, CatalogStore, SeedCatalog};
pub use ui_store::UiStore;
