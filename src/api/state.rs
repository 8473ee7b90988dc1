use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

use crate::services::WeeklySuggestionEngine;

/// Source of the current local time
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<WeeklySuggestionEngine>,
    clock: Clock,
}

impl AppState {
    /// State reading the system's local clock
    pub fn new(engine: Arc<WeeklySuggestionEngine>) -> Self {
        Self::with_clock(engine, || Local::now().naive_local())
    }

    /// State with an injected clock, for tests
    pub fn with_clock(
        engine: Arc<WeeklySuggestionEngine>,
        clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static,
    ) -> Self {
        Self {
            engine,
            clock: Arc::new(clock),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}
