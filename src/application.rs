//! Application layer: the batch job that ties discovery, parsing and export together

pub mod extraction_job;

pub use extraction_job::{ExtractionJob, FileExtraction, JobError, JobSummary, extract_reviews};
