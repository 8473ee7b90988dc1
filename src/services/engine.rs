use chrono::NaiveDateTime;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    db::{InsertOutcome, SuggestionStore},
    error::{AppError, AppResult},
    models::{
        week_start, Cuisine, DailySuggestion, Preferences, RestaurantCandidate, Slot, WeekProgress,
        WeeklySuggestion,
    },
    services::providers::RestaurantFinder,
};

/// Picks one restaurant per weekday without repeats inside a week
///
/// The engine holds no state of its own; everything lives in the store, so
/// any number of engines may share one store. A slot is filled at most once,
/// and the store's insert-if-absent decides the winner of concurrent first
/// calls.
pub struct WeeklySuggestionEngine {
    store: Arc<dyn SuggestionStore>,
    finder: Arc<dyn RestaurantFinder>,
    finder_timeout: Duration,
}

impl WeeklySuggestionEngine {
    pub fn new(
        store: Arc<dyn SuggestionStore>,
        finder: Arc<dyn RestaurantFinder>,
        finder_timeout: Duration,
    ) -> Self {
        Self {
            store,
            finder,
            finder_timeout,
        }
    }

    /// Supported cuisines, in catalog order
    pub fn cuisine_catalog(&self) -> &'static [Cuisine] {
        &Cuisine::ALL
    }

    /// Replaces the saved preferences; an empty selection is rejected untouched
    pub async fn set_preferences(&self, cuisines: impl IntoIterator<Item = Cuisine>) -> AppResult<()> {
        let preferences = Preferences::new(cuisines)?;
        self.store.replace_preferences(&preferences).await?;

        tracing::info!(
            cuisines = ?preferences.cuisines,
            store = self.store.name(),
            "Preferences saved"
        );

        Ok(())
    }

    /// Saved cuisines, empty when none were ever saved
    pub async fn preferences(&self) -> AppResult<BTreeSet<Cuisine>> {
        Ok(self
            .store
            .load_preferences()
            .await?
            .map(|p| p.cuisines)
            .unwrap_or_default())
    }

    /// Today's suggestion for the local timestamp `now`
    ///
    /// Repeated calls on the same day return the stored suggestion. Weekends
    /// return `DailySuggestion::Weekend` without touching the store.
    pub async fn daily_suggestion(&self, now: NaiveDateTime) -> AppResult<DailySuggestion> {
        let Some(slot) = Slot::for_date(now.date()) else {
            tracing::debug!(date = %now.date(), "Weekend, no suggestion");
            return Ok(DailySuggestion::Weekend);
        };

        if let Some(existing) = self.store.find_suggestion(slot).await? {
            tracing::debug!(
                week_start = %slot.week_start,
                day = slot.day_name(),
                restaurant_id = %existing.restaurant_id,
                "Returning stored suggestion"
            );
            return Ok(DailySuggestion::Suggested(existing));
        }

        let preferences = self
            .store
            .load_preferences()
            .await?
            .ok_or(AppError::PreferencesRequired)?;

        let used_ids: HashSet<String> = self
            .store
            .suggestions_for_week(slot.week_start)
            .await?
            .into_iter()
            .map(|s| s.restaurant_id)
            .collect();

        let candidates = self.find_candidates(&preferences.cuisines, &used_ids).await?;
        let Some(selected) = candidates.into_iter().next() else {
            tracing::warn!(
                week_start = %slot.week_start,
                day = slot.day_name(),
                excluded = used_ids.len(),
                "No eligible restaurant left"
            );
            return Err(AppError::NoMatch);
        };

        let suggestion = WeeklySuggestion::new(slot, selected);
        match self.store.insert_suggestion(&suggestion).await? {
            InsertOutcome::Inserted => {
                tracing::info!(
                    week_start = %slot.week_start,
                    day = slot.day_name(),
                    restaurant_id = %suggestion.restaurant_id,
                    restaurant = %suggestion.restaurant_name,
                    "New suggestion saved"
                );
                Ok(DailySuggestion::Suggested(suggestion))
            }
            InsertOutcome::SlotTaken => {
                tracing::info!(
                    week_start = %slot.week_start,
                    day = slot.day_name(),
                    "Slot filled concurrently, returning the stored suggestion"
                );
                let winner = self.store.find_suggestion(slot).await?.ok_or_else(|| {
                    AppError::Internal(format!(
                        "Slot {} {} reported taken but is empty",
                        slot.week_start,
                        slot.day_name()
                    ))
                })?;
                Ok(DailySuggestion::Suggested(winner))
            }
        }
    }

    /// Suggestions of the week containing `now`, one entry per weekday
    pub async fn week_progress(&self, now: NaiveDateTime) -> AppResult<WeekProgress<WeeklySuggestion>> {
        let week_start = week_start(now.date());
        let suggestions = self.store.suggestions_for_week(week_start).await?;
        Ok(WeekProgress::from_suggestions(suggestions))
    }

    async fn find_candidates(
        &self,
        cuisines: &BTreeSet<Cuisine>,
        exclude_ids: &HashSet<String>,
    ) -> AppResult<Vec<RestaurantCandidate>> {
        let provider = self.finder.name();
        match tokio::time::timeout(self.finder_timeout, self.finder.find(cuisines, exclude_ids)).await {
            Ok(result) => result.inspect_err(|e| {
                tracing::error!(provider, error = %e, "Restaurant finder failed");
            }),
            Err(_) => {
                tracing::error!(
                    provider,
                    timeout_ms = self.finder_timeout.as_millis() as u64,
                    "Restaurant finder timed out"
                );
                Err(AppError::Timeout(format!("restaurant finder '{}'", provider)))
            }
        }
    }
}
