pub mod engine;
pub mod providers;

pub use engine::WeeklySuggestionEngine;
pub use providers::{GooglePlacesFinder, RestaurantFinder, SearchTarget, StaticCatalogFinder};
