pub mod cuisine;
pub mod preferences;
pub mod restaurant;
pub mod suggestion;

pub use cuisine::Cuisine;
pub use preferences::Preferences;
pub use restaurant::RestaurantCandidate;
pub use suggestion::{week_start, DailySuggestion, Slot, WeekProgress, WeeklySuggestion, WEEKDAY_NAMES};
