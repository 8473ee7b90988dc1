use chrono::{DateTime, Datelike, NaiveDate, SubsecRound, TimeDelta, Utc};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use super::RestaurantCandidate;

/// Names of the five suggestion days, indexed by weekday (Monday = 0)
pub const WEEKDAY_NAMES: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Monday on or before the given date
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The unit of suggestion persistence: one weekday of one week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Monday of the week this slot belongs to
    pub week_start: NaiveDate,
    /// 0 (Monday) to 4 (Friday)
    pub weekday: u8,
}

impl Slot {
    /// Returns the slot for a calendar date, or `None` on weekends
    pub fn for_date(date: NaiveDate) -> Option<Self> {
        let weekday = date.weekday().num_days_from_monday();
        if weekday >= 5 {
            return None;
        }

        Some(Self {
            week_start: week_start(date),
            weekday: weekday as u8,
        })
    }

    pub fn day_name(&self) -> &'static str {
        WEEKDAY_NAMES[usize::from(self.weekday)]
    }
}

/// A persisted suggestion for one slot
///
/// `restaurant` is a frozen copy of the candidate at selection time.
/// `created_at` is kept at microsecond precision, the resolution of the
/// `TIMESTAMPTZ` column, so a stored row reads back equal to the value
/// that was inserted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySuggestion {
    pub week_start: NaiveDate,
    pub weekday: u8,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub restaurant: RestaurantCandidate,
    pub created_at: DateTime<Utc>,
}

impl WeeklySuggestion {
    pub fn new(slot: Slot, restaurant: RestaurantCandidate) -> Self {
        Self {
            week_start: slot.week_start,
            weekday: slot.weekday,
            restaurant_id: restaurant.id.clone(),
            restaurant_name: restaurant.name.clone(),
            restaurant,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn slot(&self) -> Slot {
        Slot {
            week_start: self.week_start,
            weekday: self.weekday,
        }
    }
}

/// Result of asking for today's suggestion
#[derive(Debug, Clone, PartialEq)]
pub enum DailySuggestion {
    Suggested(WeeklySuggestion),
    Weekend,
}

/// One entry per weekday, Monday through Friday
///
/// Serializes as a map keyed by day name, in weekday order, with `null` for
/// days that have no suggestion yet.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekProgress<T> {
    days: [Option<T>; 5],
}

impl<T> Default for WeekProgress<T> {
    fn default() -> Self {
        Self {
            days: [None, None, None, None, None],
        }
    }
}

impl<T> WeekProgress<T> {
    pub fn get(&self, weekday: u8) -> Option<&T> {
        self.days.get(usize::from(weekday)).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&T>)> {
        WEEKDAY_NAMES
            .iter()
            .copied()
            .zip(self.days.iter().map(Option::as_ref))
    }

    pub fn filled(&self) -> usize {
        self.days.iter().filter(|day| day.is_some()).count()
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> WeekProgress<U> {
        WeekProgress {
            days: self.days.map(|day| day.map(&mut f)),
        }
    }
}

impl WeekProgress<WeeklySuggestion> {
    /// Places each suggestion into its weekday; entries outside Monday..Friday are ignored
    pub fn from_suggestions(suggestions: impl IntoIterator<Item = WeeklySuggestion>) -> Self {
        let mut progress = Self::default();
        for suggestion in suggestions {
            if let Some(day) = progress.days.get_mut(usize::from(suggestion.weekday)) {
                *day = Some(suggestion);
            }
        }
        progress
    }
}

impl<T: Serialize> Serialize for WeekProgress<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WEEKDAY_NAMES.len()))?;
        for (name, day) in self.iter() {
            map.serialize_entry(name, &day)?;
        }
        map.end()
    }
}
