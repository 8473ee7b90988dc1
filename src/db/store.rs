use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{Preferences, Slot, WeeklySuggestion},
};

/// Outcome of an insert-if-absent on a suggestion slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another writer filled the slot first; nothing was written
    SlotTaken,
}

/// Durable storage for preferences and suggestion history
///
/// Implementations must make `insert_suggestion` atomic per slot: of any
/// number of concurrent inserts for the same slot, exactly one reports
/// `Inserted`.
#[async_trait::async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Returns the live preferences, if any were ever saved
    async fn load_preferences(&self) -> AppResult<Option<Preferences>>;

    /// Replaces the singleton preferences value
    async fn replace_preferences(&self, preferences: &Preferences) -> AppResult<()>;

    async fn find_suggestion(&self, slot: Slot) -> AppResult<Option<WeeklySuggestion>>;

    /// All suggestions of the week starting on `week_start`, ordered by weekday
    async fn suggestions_for_week(&self, week_start: NaiveDate)
        -> AppResult<Vec<WeeklySuggestion>>;

    async fn insert_suggestion(&self, suggestion: &WeeklySuggestion) -> AppResult<InsertOutcome>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
