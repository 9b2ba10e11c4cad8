//! Review Extractor - saved review listing pages to a flat CSV table
//!
//! Walks a directory of saved HTML pages, pulls every review card out of each
//! page, normalizes the fields and writes one table for downstream analysis.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ExtractionJob, JobError, JobSummary, extract_reviews};
pub use domain::{RawReview, Review, ReviewField};
pub use infrastructure::{AppConfig, ConfigManager, MalformedPolicy, list_html_files};
