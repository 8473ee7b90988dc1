/// Restaurant data sources
///
/// The engine only sees the `RestaurantFinder` trait. `StaticCatalogFinder`
/// serves a fixed catalog (demo data and test double); `GooglePlacesFinder`
/// searches the Google Places API around a configured location.
use std::collections::{BTreeSet, HashSet};

use crate::{
    error::AppResult,
    models::{Cuisine, RestaurantCandidate},
};

pub mod google_places;
pub mod static_catalog;

pub use google_places::{GooglePlacesFinder, SearchTarget};
pub use static_catalog::StaticCatalogFinder;

/// Lowest rating a restaurant may have to be suggested
pub const MIN_RATING: f64 = 4.0;

/// Source of candidate restaurants
///
/// Implementations return only candidates whose cuisine is in `cuisines`,
/// whose rating is at least `MIN_RATING`, and whose id is not in
/// `exclude_ids`. The order must be deterministic for a given input; the
/// engine takes the first entry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RestaurantFinder: Send + Sync {
    async fn find(
        &self,
        cuisines: &BTreeSet<Cuisine>,
        exclude_ids: &HashSet<String>,
    ) -> AppResult<Vec<RestaurantCandidate>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Shared eligibility rule for finder implementations
pub fn is_eligible(
    candidate: &RestaurantCandidate,
    cuisines: &BTreeSet<Cuisine>,
    exclude_ids: &HashSet<String>,
) -> bool {
    cuisines.contains(&candidate.cuisine)
        && candidate.rating >= MIN_RATING
        && !exclude_ids.contains(&candidate.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, rating: f64, cuisine: Cuisine) -> RestaurantCandidate {
        RestaurantCandidate {
            id: id.to_string(),
            name: id.to_string(),
            rating,
            cuisine,
            address: String::new(),
            price_level: None,
            distance: 0.0,
        }
    }

    #[test]
    fn test_rating_threshold_is_inclusive() {
        let cuisines = BTreeSet::from([Cuisine::Thai]);
        let none = HashSet::new();
        assert!(is_eligible(&candidate("a", 4.0, Cuisine::Thai), &cuisines, &none));
        assert!(!is_eligible(&candidate("b", 3.9, Cuisine::Thai), &cuisines, &none));
    }

    #[test]
    fn test_cuisine_and_exclusion() {
        let cuisines = BTreeSet::from([Cuisine::Thai]);
        let excluded = HashSet::from(["a".to_string()]);
        assert!(!is_eligible(&candidate("a", 4.8, Cuisine::Thai), &cuisines, &excluded));
        assert!(!is_eligible(&candidate("c", 4.8, Cuisine::Greek), &cuisines, &excluded));
        assert!(is_eligible(&candidate("d", 4.8, Cuisine::Thai), &cuisines, &excluded));
    }
}
