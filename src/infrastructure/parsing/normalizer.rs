//! Normalization of raw card text into typed review rows
//!
//! Row filter first (no username, no row), then per-column conversion. A
//! present value that does not fit its format is a `MalformedValue` error;
//! the caller decides whether that drops the record or aborts the job.

use super::{ParsingError, ParsingResult};
use crate::domain::{RawReview, Review, ReviewField};
use crate::infrastructure::config::review_markup;
use chrono::NaiveDate;
use regex::Regex;

pub struct ReviewNormalizer {
    contribution_regex: Regex,
}

impl ReviewNormalizer {
    pub fn new() -> ParsingResult<Self> {
        let pattern = review_markup::CONTRIBUTION_PATTERN;
        let contribution_regex = Regex::new(pattern).map_err(|e| ParsingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { contribution_regex })
    }

    /// Normalize one card.
    ///
    /// Returns `Ok(None)` when the card has no username; such cards are
    /// dropped before any other field is looked at.
    pub fn normalize(&self, raw: RawReview) -> ParsingResult<Option<Review>> {
        let Some(username) = raw.username else {
            return Ok(None);
        };

        let contribution = raw
            .origin
            .as_deref()
            .map(|origin| self.parse_contribution(origin))
            .transpose()?
            .flatten();
        let origin = raw
            .origin
            .as_deref()
            .and_then(|origin| self.strip_contribution(origin));

        Ok(Some(Review {
            created_at: raw.created_at.as_deref().map(parse_created_at).transpose()?,
            username,
            origin,
            contribution,
            rating: raw.rating.as_deref().map(parse_rating).transpose()?,
            condition: raw.condition,
            title: raw.title,
            n_like: raw
                .n_like
                .as_deref()
                .map(|text| parse_integer(ReviewField::NLike, text))
                .transpose()?,
            review: raw.review,
        }))
    }

    /// "United States12 contributions" → `Some(12)`; no count → `None`
    pub fn parse_contribution(&self, origin: &str) -> ParsingResult<Option<i64>> {
        self.contribution_regex
            .captures(origin)
            .and_then(|caps| caps.get(1))
            .map(|count| parse_integer(ReviewField::Origin, count.as_str()))
            .transpose()
    }

    /// Origin text with every contribution count removed, then trimmed;
    /// blank → `None`. "Paris, France 3 contributions" gives "Paris, France"
    /// with no trailing space.
    pub fn strip_contribution(&self, origin: &str) -> Option<String> {
        let stripped = self.contribution_regex.replace_all(origin, "");
        Some(stripped.trim().to_string()).filter(|s| !s.is_empty())
    }
}

/// "Written March 5, 2023" → 2023-03-05
pub fn parse_created_at(text: &str) -> ParsingResult<NaiveDate> {
    let date_text = text.replace(review_markup::DATE_PREFIX, "");
    NaiveDate::parse_from_str(date_text.trim(), review_markup::DATE_FORMAT)
        .map_err(|e| ParsingError::malformed(ReviewField::CreatedAt, text, e.to_string()))
}

/// "4.0 of 5 bubbles" → 4
pub fn parse_rating(text: &str) -> ParsingResult<i64> {
    let number = text.strip_suffix(review_markup::RATING_SUFFIX).unwrap_or(text);
    number
        .trim()
        .parse::<i64>()
        .map_err(|e| ParsingError::malformed(ReviewField::Rating, text, e.to_string()))
}

fn parse_integer(field: ReviewField, text: &str) -> ParsingResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|e| ParsingError::malformed(field, text, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn raw_with_username() -> RawReview {
        RawReview {
            username: Some("traveler_jane".to_string()),
            ..RawReview::default()
        }
    }

    #[test]
    fn test_full_record() {
        let normalizer = ReviewNormalizer::new().unwrap();
        let raw = RawReview {
            created_at: Some("Written March 5, 2023".to_string()),
            username: Some("traveler_jane".to_string()),
            origin: Some("United States12 contributions".to_string()),
            rating: Some("4.0 of 5 bubbles".to_string()),
            condition: Some("Mar 2023 • Couples".to_string()),
            title: Some("Lovely stay".to_string()),
            n_like: Some("3".to_string()),
            review: Some("Clean rooms.".to_string()),
        };

        let review = normalizer.normalize(raw).unwrap().unwrap();
        assert_eq!(review.created_at, NaiveDate::from_ymd_opt(2023, 3, 5));
        assert_eq!(review.username, "traveler_jane");
        assert_eq!(review.origin.as_deref(), Some("United States"));
        assert_eq!(review.contribution, Some(12));
        assert_eq!(review.rating, Some(4));
        assert_eq!(review.condition.as_deref(), Some("Mar 2023 • Couples"));
        assert_eq!(review.title.as_deref(), Some("Lovely stay"));
        assert_eq!(review.n_like, Some(3));
        assert_eq!(review.review.as_deref(), Some("Clean rooms."));
    }

    #[test]
    fn test_missing_username_drops_row_before_parsing() {
        let normalizer = ReviewNormalizer::new().unwrap();
        let raw = RawReview {
            rating: Some("not a rating".to_string()),
            ..RawReview::default()
        };
        assert_eq!(normalizer.normalize(raw).unwrap(), None);
    }

    #[test]
    fn test_only_username() {
        let normalizer = ReviewNormalizer::new().unwrap();
        let review = normalizer.normalize(raw_with_username()).unwrap().unwrap();
        assert_eq!(
            review,
            Review {
                created_at: None,
                username: "traveler_jane".to_string(),
                origin: None,
                contribution: None,
                rating: None,
                condition: None,
                title: None,
                n_like: None,
                review: None,
            }
        );
    }

    #[rstest]
    #[case("United States12 contributions", Some("United States"), Some(12))]
    #[case("Paris, France 3 contributions", Some("Paris, France"), Some(3))]
    #[case("Berlin", Some("Berlin"), None)]
    #[case("1 contribution", Some("1 contribution"), None)]
    #[case("45 contributions", None, Some(45))]
    fn test_origin_split(
        #[case] text: &str,
        #[case] origin: Option<&str>,
        #[case] contribution: Option<i64>,
    ) {
        let normalizer = ReviewNormalizer::new().unwrap();
        assert_eq!(normalizer.strip_contribution(text).as_deref(), origin);
        assert_eq!(normalizer.parse_contribution(text).unwrap(), contribution);
    }

    #[rstest]
    #[case("Written March 5, 2023", 2023, 3, 5)]
    #[case("Written December 31, 2019", 2019, 12, 31)]
    #[case("January 09, 2024", 2024, 1, 9)]
    fn test_created_at(#[case] text: &str, #[case] y: i32, #[case] m: u32, #[case] d: u32) {
        assert_eq!(parse_created_at(text).unwrap(), NaiveDate::from_ymd_opt(y, m, d).unwrap());
    }

    #[rstest]
    #[case("Written yesterday")]
    #[case("Written 2023-03-05")]
    #[case("Written February 30, 2023")]
    fn test_created_at_malformed(#[case] text: &str) {
        let err = parse_created_at(text).unwrap_err();
        assert!(matches!(
            err,
            ParsingError::MalformedValue {
                field: ReviewField::CreatedAt,
                ..
            }
        ));
    }

    #[rstest]
    #[case("5.0 of 5 bubbles", 5)]
    #[case("1.0 of 5 bubbles", 1)]
    fn test_rating(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(parse_rating(text).unwrap(), expected);
    }

    #[rstest]
    #[case("4.5 of 5 bubbles")]
    #[case("great")]
    fn test_rating_malformed(#[case] text: &str) {
        assert!(parse_rating(text).is_err());
    }

    #[test]
    fn test_malformed_like_count_is_an_error() {
        let normalizer = ReviewNormalizer::new().unwrap();
        let raw = RawReview {
            n_like: Some("a few".to_string()),
            ..raw_with_username()
        };
        let err = normalizer.normalize(raw).unwrap_err();
        assert_eq!(err, ParsingError::malformed(ReviewField::NLike, "a few", "invalid digit found in string"));
    }
}
