use chrono::NaiveDate;
use std::collections::{btree_map::Entry, BTreeMap};
use tokio::sync::RwLock;

use crate::{
    db::store::{InsertOutcome, SuggestionStore},
    error::AppResult,
    models::{Preferences, Slot, WeeklySuggestion},
};

/// Process-local store, used for tests and single-instance runs
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    preferences: Option<Preferences>,
    suggestions: BTreeMap<Slot, WeeklySuggestion>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of persisted suggestions across all weeks
    pub async fn suggestion_count(&self) -> usize {
        self.inner.read().await.suggestions.len()
    }
}

#[async_trait::async_trait]
impl SuggestionStore for MemoryStore {
    async fn load_preferences(&self) -> AppResult<Option<Preferences>> {
        Ok(self.inner.read().await.preferences.clone())
    }

    async fn replace_preferences(&self, preferences: &Preferences) -> AppResult<()> {
        self.inner.write().await.preferences = Some(preferences.clone());
        Ok(())
    }

    async fn find_suggestion(&self, slot: Slot) -> AppResult<Option<WeeklySuggestion>> {
        Ok(self.inner.read().await.suggestions.get(&slot).cloned())
    }

    async fn suggestions_for_week(
        &self,
        week_start: NaiveDate,
    ) -> AppResult<Vec<WeeklySuggestion>> {
        let inner = self.inner.read().await;
        let suggestions = inner
            .suggestions
            .values()
            .filter(|s| s.week_start == week_start)
            .cloned()
            .collect();
        Ok(suggestions)
    }

    async fn insert_suggestion(&self, suggestion: &WeeklySuggestion) -> AppResult<InsertOutcome> {
        let mut inner = self.inner.write().await;
        match inner.suggestions.entry(suggestion.slot()) {
            Entry::Occupied(_) => Ok(InsertOutcome::SlotTaken),
            Entry::Vacant(entry) => {
                entry.insert(suggestion.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
