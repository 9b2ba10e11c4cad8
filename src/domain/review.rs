//! Review records as they move through the extraction pipeline
//!
//! A `RawReview` is whatever text one card yielded; a `Review` is the
//! normalized row that lands in the output table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output header, in column order.
pub const CSV_COLUMNS: [&str; 9] = [
    "created_at",
    "username",
    "origin",
    "contribution",
    "rating",
    "condition",
    "title",
    "n_like",
    "review",
];

/// Logical fields looked up inside a review card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewField {
    CreatedAt,
    Username,
    /// Origin and contribution count, still combined as they appear on the page
    Origin,
    Rating,
    Condition,
    Title,
    NLike,
    Review,
}

impl ReviewField {
    pub const ALL: [Self; 8] = [
        Self::CreatedAt,
        Self::Username,
        Self::Origin,
        Self::Rating,
        Self::Condition,
        Self::Title,
        Self::NLike,
        Self::Review,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Username => "username",
            Self::Origin => "origin",
            Self::Rating => "rating",
            Self::Condition => "condition",
            Self::Title => "title",
            Self::NLike => "n_like",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for ReviewField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text pulled from one card before any type conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReview {
    pub created_at: Option<String>,
    pub username: Option<String>,
    pub origin: Option<String>,
    pub rating: Option<String>,
    pub condition: Option<String>,
    pub title: Option<String>,
    pub n_like: Option<String>,
    pub review: Option<String>,
}

impl RawReview {
    pub fn get(&self, field: ReviewField) -> Option<&str> {
        match field {
            ReviewField::CreatedAt => self.created_at.as_deref(),
            ReviewField::Username => self.username.as_deref(),
            ReviewField::Origin => self.origin.as_deref(),
            ReviewField::Rating => self.rating.as_deref(),
            ReviewField::Condition => self.condition.as_deref(),
            ReviewField::Title => self.title.as_deref(),
            ReviewField::NLike => self.n_like.as_deref(),
            ReviewField::Review => self.review.as_deref(),
        }
    }

    pub fn set(&mut self, field: ReviewField, value: Option<String>) {
        let slot = match field {
            ReviewField::CreatedAt => &mut self.created_at,
            ReviewField::Username => &mut self.username,
            ReviewField::Origin => &mut self.origin,
            ReviewField::Rating => &mut self.rating,
            ReviewField::Condition => &mut self.condition,
            ReviewField::Title => &mut self.title,
            ReviewField::NLike => &mut self.n_like,
            ReviewField::Review => &mut self.review,
        };
        *slot = value;
    }
}

/// Normalized review row.
///
/// `username` is always present; rows without one never get this far.
/// Field order matches [`CSV_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub created_at: Option<NaiveDate>,
    pub username: String,
    pub origin: Option<String>,
    pub contribution: Option<i64>,
    pub rating: Option<i64>,
    pub condition: Option<String>,
    pub title: Option<String>,
    pub n_like: Option<i64>,
    pub review: Option<String>,
}
