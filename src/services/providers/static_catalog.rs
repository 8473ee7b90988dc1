use std::collections::{BTreeSet, HashSet};

use crate::{
    error::AppResult,
    models::{Cuisine, RestaurantCandidate},
    services::providers::{is_eligible, RestaurantFinder},
};

/// Finder over a fixed, in-memory restaurant list
///
/// Results keep catalog order.
#[derive(Debug, Clone)]
pub struct StaticCatalogFinder {
    restaurants: Vec<RestaurantCandidate>,
}

impl StaticCatalogFinder {
    pub fn new(restaurants: Vec<RestaurantCandidate>) -> Self {
        Self { restaurants }
    }

    pub fn restaurants(&self) -> &[RestaurantCandidate] {
        &self.restaurants
    }
}

impl Default for StaticCatalogFinder {
    /// Demo catalog around 787 7th Avenue
    fn default() -> Self {
        let entry = |id: &str, name: &str, rating, cuisine, address: &str, price, distance| {
            RestaurantCandidate {
                id: id.to_string(),
                name: name.to_string(),
                rating,
                cuisine,
                address: address.to_string(),
                price_level: Some(price),
                distance,
            }
        };

        Self::new(vec![
            entry("mock_1", "Tony's Italian Bistro", 4.5, Cuisine::Italian, "123 7th Ave, New York, NY", 2, 0.2),
            entry("mock_2", "Golden Dragon Chinese", 4.3, Cuisine::Chinese, "456 Broadway, New York, NY", 1, 0.3),
            entry("mock_3", "Sakura Sushi", 4.7, Cuisine::Japanese, "789 8th Ave, New York, NY", 3, 0.4),
            entry("mock_4", "Mediterranean Delight", 4.2, Cuisine::Mediterranean, "321 9th Ave, New York, NY", 2, 0.3),
            entry("mock_5", "Spice Garden Indian", 4.4, Cuisine::Indian, "654 10th Ave, New York, NY", 2, 0.5),
        ])
    }
}

#[async_trait::async_trait]
impl RestaurantFinder for StaticCatalogFinder {
    async fn find(
        &self,
        cuisines: &BTreeSet<Cuisine>,
        exclude_ids: &HashSet<String>,
    ) -> AppResult<Vec<RestaurantCandidate>> {
        let matches: Vec<RestaurantCandidate> = self
            .restaurants
            .iter()
            .filter(|r| is_eligible(r, cuisines, exclude_ids))
            .cloned()
            .collect();

        tracing::debug!(
            cuisines = cuisines.len(),
            excluded = exclude_ids.len(),
            results = matches.len(),
            provider = "static",
            "Catalog search completed"
        );

        Ok(matches)
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_catalog_filters_by_cuisine() {
        let finder = StaticCatalogFinder::default();
        let cuisines = BTreeSet::from([Cuisine::Italian, Cuisine::Chinese]);

        let results = finder.find(&cuisines, &HashSet::new()).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["mock_1", "mock_2"]);
    }

    #[tokio::test]
    async fn test_excluded_ids_are_skipped() {
        let finder = StaticCatalogFinder::default();
        let cuisines = BTreeSet::from([Cuisine::Italian, Cuisine::Chinese]);
        let excluded = HashSet::from(["mock_1".to_string()]);

        let results = finder.find(&cuisines, &excluded).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Golden Dragon Chinese");
    }

    #[tokio::test]
    async fn test_low_rated_restaurants_never_returned() {
        let mut restaurants = StaticCatalogFinder::default().restaurants().to_vec();
        restaurants[0].rating = 3.5;
        let finder = StaticCatalogFinder::new(restaurants);

        let results = finder
            .find(&BTreeSet::from([Cuisine::Italian]), &HashSet::new())
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_no_catalog_entry_for_cuisine() {
        let finder = StaticCatalogFinder::default();
        let results = finder
            .find(&BTreeSet::from([Cuisine::Seafood]), &HashSet::new())
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
