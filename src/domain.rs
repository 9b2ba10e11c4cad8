//! Domain types for review extraction

pub mod review;

pub use review::{CSV_COLUMNS, RawReview, Review, ReviewField};
