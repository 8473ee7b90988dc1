use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Cuisine;
use crate::error::{AppError, AppResult};

/// The single user's cuisine preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    pub cuisines: BTreeSet<Cuisine>,
    pub updated_at: DateTime<Utc>,
}

impl Preferences {
    /// Builds a preferences value, rejecting an empty selection
    pub fn new(cuisines: impl IntoIterator<Item = Cuisine>) -> AppResult<Self> {
        let cuisines: BTreeSet<Cuisine> = cuisines.into_iter().collect();
        if cuisines.is_empty() {
            return Err(AppError::InvalidInput("No cuisines selected".to_string()));
        }

        Ok(Self {
            cuisines,
            updated_at: Utc::now().trunc_subsecs(6),
        })
    }
}
