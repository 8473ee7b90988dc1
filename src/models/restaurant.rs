use serde::{Deserialize, Serialize};

use super::Cuisine;

/// A restaurant returned by a finder, not yet persisted
///
/// Field names on the wire follow the restaurant payload the frontend
/// already consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantCandidate {
    #[serde(rename = "place_id")]
    pub id: String,
    pub name: String,
    /// Rating on a 5-point scale
    pub rating: f64,
    #[serde(rename = "cuisine_type")]
    pub cuisine: Cuisine,
    pub address: String,
    /// Price tier, 0 (free) to 4 (very expensive)
    pub price_level: Option<u8>,
    /// Distance from the search target in miles
    pub distance: f64,
}
