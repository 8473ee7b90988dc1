/// Google Places provider
///
/// Runs one Text Search per preferred cuisine around the search target,
/// caches each cuisine's raw candidates in Redis, then applies the shared
/// eligibility rule. Results are ordered by rating (desc), distance (asc),
/// then place id so the engine's first pick is stable.
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Cuisine, RestaurantCandidate},
    services::providers::{is_eligible, RestaurantFinder},
};

const PLACES_CACHE_TTL: u64 = 86400; // 1 day
const EARTH_RADIUS_MILES: f64 = 3958.8;
const METERS_PER_MILE: f64 = 1609.344;

/// Center and radius of the lunch search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTarget {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

impl SearchTarget {
    /// Great-circle distance from the target, in miles
    pub fn distance_miles(&self, latitude: f64, longitude: f64) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
    }

    pub fn radius_miles(&self) -> f64 {
        self.radius_meters / METERS_PER_MILE
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    price_level: Option<u8>,
    geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: PlaceLocation,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    lat: f64,
    lng: f64,
}

/// Converts a Text Search response into candidates tagged with `cuisine`
///
/// Unrated places and places outside the search radius are dropped.
fn candidates_from_response(
    response: TextSearchResponse,
    cuisine: Cuisine,
    target: &SearchTarget,
) -> AppResult<Vec<RestaurantCandidate>> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        status => {
            return Err(AppError::ExternalApi(format!(
                "Places API returned status {}: {}",
                status,
                response.error_message.unwrap_or_default()
            )))
        }
    }

    let radius_miles = target.radius_miles();
    let candidates = response
        .results
        .into_iter()
        .filter_map(|place| {
            let rating = place.rating?;
            let location = &place.geometry.location;
            let distance = target.distance_miles(location.lat, location.lng);
            if distance > radius_miles {
                return None;
            }

            Some(RestaurantCandidate {
                id: place.place_id,
                name: place.name,
                rating,
                cuisine,
                address: place.formatted_address.unwrap_or_default(),
                price_level: place.price_level,
                distance: (distance * 100.0).round() / 100.0,
            })
        })
        .collect();

    Ok(candidates)
}

fn rank(a: &RestaurantCandidate, b: &RestaurantCandidate) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| a.id.cmp(&b.id))
}

#[derive(Clone)]
pub struct GooglePlacesFinder {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    target: SearchTarget,
    cache: Option<Cache>,
}

impl GooglePlacesFinder {
    pub fn new(api_key: String, api_url: String, target: SearchTarget) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            target,
            cache: None,
        }
    }

    /// Caches each cuisine's search results in Redis
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// All rated places for one cuisine near the target, cached per cuisine
    /// when a cache is configured
    async fn search_cuisine(&self, cuisine: Cuisine) -> AppResult<Vec<RestaurantCandidate>> {
        let Some(cache) = &self.cache else {
            return self.fetch_cuisine(cuisine).await;
        };

        let key = CacheKey::PlacesSearch {
            cuisine,
            latitude: self.target.latitude,
            longitude: self.target.longitude,
            radius_meters: self.target.radius_meters,
        };

        cached!(cache, key, PLACES_CACHE_TTL, self.fetch_cuisine(cuisine))
    }

    async fn fetch_cuisine(&self, cuisine: Cuisine) -> AppResult<Vec<RestaurantCandidate>> {
        let url = format!("{}/textsearch/json", self.api_url);
        let location = format!("{},{}", self.target.latitude, self.target.longitude);
        let radius = self.target.radius_meters.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", cuisine.search_phrase().as_str()),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", "restaurant"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Places API returned status {}: {}",
                status, body
            )));
        }

        let body: TextSearchResponse = response.json().await?;
        let candidates = candidates_from_response(body, cuisine, &self.target)?;

        tracing::info!(
            cuisine = %cuisine,
            results = candidates.len(),
            provider = "google_places",
            "Places search completed"
        );

        Ok(candidates)
    }
}

#[async_trait::async_trait]
impl RestaurantFinder for GooglePlacesFinder {
    async fn find(
        &self,
        cuisines: &BTreeSet<Cuisine>,
        exclude_ids: &HashSet<String>,
    ) -> AppResult<Vec<RestaurantCandidate>> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for cuisine in cuisines {
            for candidate in self.search_cuisine(*cuisine).await? {
                if is_eligible(&candidate, cuisines, exclude_ids) && seen.insert(candidate.id.clone())
                {
                    matches.push(candidate);
                }
            }
        }

        matches.sort_by(rank);
        Ok(matches)
    }

    fn name(&self) -> &'static str {
        "google_places"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target() -> SearchTarget {
        SearchTarget {
            latitude: 40.7614,
            longitude: -73.9776,
            radius_meters: 804.67,
        }
    }

    fn parse(value: serde_json::Value) -> TextSearchResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let t = target();
        assert!(t.distance_miles(t.latitude, t.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_distance_one_hundredth_degree_north() {
        // 0.01 degrees of latitude is about 0.69 miles
        let t = target();
        let d = t.distance_miles(t.latitude + 0.01, t.longitude);
        assert!((d - 0.69).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_candidates_from_response() {
        let response = parse(json!({
            "status": "OK",
            "results": [
                {
                    "place_id": "near",
                    "name": "Near Thai",
                    "rating": 4.4,
                    "formatted_address": "1 W 55th St",
                    "price_level": 2,
                    "geometry": { "location": { "lat": 40.7620, "lng": -73.9770 } }
                },
                {
                    "place_id": "unrated",
                    "name": "Mystery Spot",
                    "geometry": { "location": { "lat": 40.7615, "lng": -73.9776 } }
                },
                {
                    "place_id": "far",
                    "name": "Far Thai",
                    "rating": 4.9,
                    "geometry": { "location": { "lat": 40.8000, "lng": -73.9776 } }
                }
            ]
        }));

        let candidates = candidates_from_response(response, Cuisine::Thai, &target()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "near");
        assert_eq!(candidates[0].cuisine, Cuisine::Thai);
        assert_eq!(candidates[0].price_level, Some(2));
        assert!(candidates[0].distance < 0.1);
    }

    #[test]
    fn test_zero_results_is_empty_not_error() {
        let response = parse(json!({ "status": "ZERO_RESULTS", "results": [] }));
        let candidates = candidates_from_response(response, Cuisine::Greek, &target()).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_denied_status_is_external_error() {
        let response = parse(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }));
        let result = candidates_from_response(response, Cuisine::Greek, &target());
        assert!(matches!(result, Err(AppError::ExternalApi(msg)) if msg.contains("REQUEST_DENIED")));
    }

    fn place(id: &str, rating: f64) -> serde_json::Value {
        json!({
            "place_id": id,
            "name": format!("Place {}", id),
            "rating": rating,
            "formatted_address": "1 W 55th St",
            "geometry": { "location": { "lat": 40.7620, "lng": -73.9770 } }
        })
    }

    /// Serves canned Text Search results keyed by the `query` parameter
    async fn spawn_places_stub() -> String {
        use std::collections::HashMap;

        use axum::{extract::Query, routing::get, Json, Router};

        async fn text_search(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
            let results = match params.get("query").map(String::as_str) {
                Some("italian restaurant") => {
                    vec![place("shared", 4.6), place("gone", 4.9), place("meh", 3.8)]
                }
                Some("pizza restaurant") => vec![place("shared", 4.6), place("slice", 4.2)],
                _ => Vec::new(),
            };
            Json(json!({ "status": "OK", "results": results }))
        }

        let app = Router::new().route("/textsearch/json", get(text_search));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_find_merges_cuisines_and_applies_exclusions() {
        let api_url = spawn_places_stub().await;
        let finder = GooglePlacesFinder::new("test-key".to_string(), api_url, target());

        let cuisines = BTreeSet::from([Cuisine::Italian, Cuisine::Pizza]);
        let exclude = HashSet::from(["gone".to_string()]);
        let matches = finder.find(&cuisines, &exclude).await.unwrap();

        let ids: Vec<&str> = matches.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["shared", "slice"]);
        // First cuisine searched wins the tag for a place found twice
        assert_eq!(matches[0].cuisine, Cuisine::Italian);
        assert_eq!(matches[1].cuisine, Cuisine::Pizza);
    }

    #[tokio::test]
    async fn test_find_surfaces_http_failure() {
        let finder = GooglePlacesFinder::new(
            "test-key".to_string(),
            spawn_places_stub().await + "/missing",
            target(),
        );

        let result = finder
            .find(&BTreeSet::from([Cuisine::Italian]), &HashSet::new())
            .await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_rank_orders_by_rating_then_distance_then_id() {
        let make = |id: &str, rating: f64, distance: f64| RestaurantCandidate {
            id: id.to_string(),
            name: id.to_string(),
            rating,
            cuisine: Cuisine::Pizza,
            address: String::new(),
            price_level: None,
            distance,
        };

        let mut list = vec![
            make("c", 4.2, 0.1),
            make("b", 4.8, 0.4),
            make("a", 4.8, 0.4),
            make("d", 4.8, 0.2),
        ];
        list.sort_by(rank);

        let ids: Vec<&str> = list.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "b", "c"]);
    }
}
