use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Supported cuisine categories
///
/// Declaration order is the catalog order, and `Ord` follows it, so a
/// `BTreeSet<Cuisine>` iterates in catalog order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    American,
    Italian,
    Chinese,
    Japanese,
    Mexican,
    Indian,
    Thai,
    French,
    Mediterranean,
    Greek,
    Korean,
    Vietnamese,
    Spanish,
    MiddleEastern,
    Pizza,
    Sandwich,
    Salad,
    Seafood,
}

impl Cuisine {
    /// Every supported cuisine, in catalog order
    pub const ALL: [Cuisine; 18] = [
        Cuisine::American,
        Cuisine::Italian,
        Cuisine::Chinese,
        Cuisine::Japanese,
        Cuisine::Mexican,
        Cuisine::Indian,
        Cuisine::Thai,
        Cuisine::French,
        Cuisine::Mediterranean,
        Cuisine::Greek,
        Cuisine::Korean,
        Cuisine::Vietnamese,
        Cuisine::Spanish,
        Cuisine::MiddleEastern,
        Cuisine::Pizza,
        Cuisine::Sandwich,
        Cuisine::Salad,
        Cuisine::Seafood,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::American => "american",
            Cuisine::Italian => "italian",
            Cuisine::Chinese => "chinese",
            Cuisine::Japanese => "japanese",
            Cuisine::Mexican => "mexican",
            Cuisine::Indian => "indian",
            Cuisine::Thai => "thai",
            Cuisine::French => "french",
            Cuisine::Mediterranean => "mediterranean",
            Cuisine::Greek => "greek",
            Cuisine::Korean => "korean",
            Cuisine::Vietnamese => "vietnamese",
            Cuisine::Spanish => "spanish",
            Cuisine::MiddleEastern => "middle_eastern",
            Cuisine::Pizza => "pizza",
            Cuisine::Sandwich => "sandwich",
            Cuisine::Salad => "salad",
            Cuisine::Seafood => "seafood",
        }
    }

    /// Search phrase used against place search providers
    pub fn search_phrase(&self) -> String {
        format!("{} restaurant", self.as_str().replace('_', " "))
    }
}

impl Display for Cuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cuisine::ALL
            .iter()
            .copied()
            .find(|cuisine| cuisine.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown cuisine: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_starts_with_american() {
        assert_eq!(Cuisine::ALL[0], Cuisine::American);
        assert_eq!(Cuisine::ALL[17], Cuisine::Seafood);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for cuisine in Cuisine::ALL {
            let json = serde_json::to_string(&cuisine).unwrap();
            assert_eq!(json, format!("\"{}\"", cuisine.as_str()));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("middle_eastern".parse::<Cuisine>().unwrap(), Cuisine::MiddleEastern);
        assert!(matches!(
            "klingon".parse::<Cuisine>(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_search_phrase() {
        assert_eq!(Cuisine::MiddleEastern.search_phrase(), "middle eastern restaurant");
    }
}
