use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::store::{InsertOutcome, SuggestionStore},
    error::{AppError, AppResult},
    models::{Cuisine, Preferences, RestaurantCandidate, Slot, WeeklySuggestion},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct PreferencesRow {
    cuisines: Vec<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PreferencesRow> for Preferences {
    type Error = AppError;

    fn try_from(row: PreferencesRow) -> Result<Self, Self::Error> {
        let cuisines = row
            .cuisines
            .iter()
            .map(|tag| {
                tag.parse::<Cuisine>()
                    .map_err(|_| AppError::Internal(format!("Stored unknown cuisine: {}", tag)))
            })
            .collect::<AppResult<_>>()?;

        Ok(Preferences {
            cuisines,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SuggestionRow {
    week_start: NaiveDate,
    weekday: i16,
    restaurant_id: String,
    restaurant_name: String,
    restaurant_data: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SuggestionRow> for WeeklySuggestion {
    type Error = AppError;

    fn try_from(row: SuggestionRow) -> Result<Self, Self::Error> {
        let weekday = u8::try_from(row.weekday)
            .map_err(|_| AppError::Internal(format!("Stored invalid weekday: {}", row.weekday)))?;
        let restaurant: RestaurantCandidate = serde_json::from_str(&row.restaurant_data)
            .map_err(|e| AppError::Internal(format!("Suggestion snapshot error: {}", e)))?;

        Ok(WeeklySuggestion {
            week_start: row.week_start,
            weekday,
            restaurant_id: row.restaurant_id,
            restaurant_name: row.restaurant_name,
            restaurant,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL-backed suggestion store
///
/// Slot uniqueness is enforced by the `UNIQUE (week_start, weekday)`
/// constraint; inserts use `ON CONFLICT DO NOTHING` so a lost race is
/// reported as `InsertOutcome::SlotTaken` instead of an error.
#[derive(Clone)]
pub struct PgSuggestionStore {
    pool: PgPool,
}

impl PgSuggestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SuggestionStore for PgSuggestionStore {
    async fn load_preferences(&self) -> AppResult<Option<Preferences>> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            "SELECT cuisines, updated_at FROM user_preferences WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(Preferences::try_from).transpose()
    }

    async fn replace_preferences(&self, preferences: &Preferences) -> AppResult<()> {
        let cuisines: Vec<String> = preferences
            .cuisines
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO user_preferences (id, cuisines, updated_at)
            VALUES (1, $1, $2)
            ON CONFLICT (id) DO UPDATE
            SET cuisines = EXCLUDED.cuisines, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&cuisines)
        .bind(preferences.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(cuisines = ?cuisines, "Preferences replaced");

        Ok(())
    }

    async fn find_suggestion(&self, slot: Slot) -> AppResult<Option<WeeklySuggestion>> {
        let row = sqlx::query_as::<_, SuggestionRow>(
            r#"
            SELECT week_start, weekday, restaurant_id, restaurant_name, restaurant_data, created_at
            FROM weekly_suggestions
            WHERE week_start = $1 AND weekday = $2
            "#,
        )
        .bind(slot.week_start)
        .bind(i16::from(slot.weekday))
        .fetch_optional(&self.pool)
        .await?;

        row.map(WeeklySuggestion::try_from).transpose()
    }

    async fn suggestions_for_week(
        &self,
        week_start: NaiveDate,
    ) -> AppResult<Vec<WeeklySuggestion>> {
        let rows = sqlx::query_as::<_, SuggestionRow>(
            r#"
            SELECT week_start, weekday, restaurant_id, restaurant_name, restaurant_data, created_at
            FROM weekly_suggestions
            WHERE week_start = $1
            ORDER BY weekday
            "#,
        )
        .bind(week_start)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WeeklySuggestion::try_from).collect()
    }

    async fn insert_suggestion(&self, suggestion: &WeeklySuggestion) -> AppResult<InsertOutcome> {
        let restaurant_data = serde_json::to_string(&suggestion.restaurant)
            .map_err(|e| AppError::Internal(format!("Suggestion snapshot error: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO weekly_suggestions
                (week_start, weekday, restaurant_id, restaurant_name, restaurant_data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (week_start, weekday) DO NOTHING
            "#,
        )
        .bind(suggestion.week_start)
        .bind(i16::from(suggestion.weekday))
        .bind(&suggestion.restaurant_id)
        .bind(&suggestion.restaurant_name)
        .bind(&restaurant_data)
        .bind(suggestion.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::SlotTaken)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
