use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Cuisine, DailySuggestion, RestaurantCandidate, WeekProgress},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub cuisines: Vec<Cuisine>,
}

/// Saved cuisines, listed in catalog order rather than the order they were sent
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub cuisines: Vec<Cuisine>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `GET /suggestion`: either today's restaurant or a notice
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuggestionResponse {
    Restaurant {
        restaurant: RestaurantCandidate,
        day: &'static str,
    },
    Notice {
        message: String,
    },
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    }))
}

/// Supported cuisines
pub async fn get_cuisines(State(state): State<AppState>) -> Json<&'static [Cuisine]> {
    Json(state.engine.cuisine_catalog())
}

/// Replace the saved cuisine preferences
pub async fn set_preferences(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<PreferencesRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    tracing::info!(
        request_id = %request_id,
        cuisines = request.cuisines.len(),
        "Saving preferences"
    );

    state.engine.set_preferences(request.cuisines).await?;

    Ok(Json(MessageResponse {
        message: "Preferences saved successfully".to_string(),
    }))
}

/// Currently saved cuisine preferences
pub async fn get_preferences(State(state): State<AppState>) -> AppResult<Json<PreferencesResponse>> {
    let cuisines = state.engine.preferences().await?.into_iter().collect();
    Ok(Json(PreferencesResponse { cuisines }))
}

/// Today's restaurant suggestion
pub async fn get_suggestion(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<SuggestionResponse>> {
    let now = state.now();
    tracing::info!(request_id = %request_id, now = %now, "Daily suggestion requested");

    let response = match state.engine.daily_suggestion(now).await? {
        DailySuggestion::Suggested(suggestion) => {
            let day = suggestion.slot().day_name();
            SuggestionResponse::Restaurant {
                restaurant: suggestion.restaurant,
                day,
            }
        }
        DailySuggestion::Weekend => SuggestionResponse::Notice {
            message: "No suggestions on weekends!".to_string(),
        },
    };

    Ok(Json(response))
}

/// This week's suggestions, keyed by day name
pub async fn get_week_progress(
    State(state): State<AppState>,
) -> AppResult<Json<WeekProgress<RestaurantCandidate>>> {
    let progress = state.engine.week_progress(state.now()).await?;
    Ok(Json(progress.map(|suggestion| suggestion.restaurant)))
}
