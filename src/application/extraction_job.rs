//! Extraction job: saved pages in, one CSV table out
//!
//! Discover files, extract and normalize every card in every file, keep file
//! order then card order, and replace the output table in one step. The run
//! is all-or-nothing: any error leaves the previous output untouched.

use crate::domain::Review;
use crate::infrastructure::config::{ExtractionConfig, MalformedPolicy};
use crate::infrastructure::csv_export::{self, ExportError};
use crate::infrastructure::file_discovery;
use crate::infrastructure::parsing::{
    ContextualParser, ParseContext, ParsingError, ParsingResult, ReviewCardParser, ReviewNormalizer,
};
use rayon::prelude::*;
use scraper::Html;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Cannot enumerate input directory {}: {source}", root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} (card {card_index}): {source}", path.display())]
    Parse {
        path: PathBuf,
        card_index: usize,
        #[source]
        source: ParsingError,
    },

    #[error("Invalid extraction configuration: {0}")]
    Config(#[source] ParsingError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Reviews pulled from one document, with drop counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    pub reviews: Vec<Review>,
    pub cards_found: usize,
    pub dropped_missing_username: usize,
    pub dropped_malformed: usize,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub files_scanned: usize,
    pub cards_found: usize,
    pub records_written: usize,
    pub dropped_missing_username: usize,
    pub dropped_malformed: usize,
    pub output_path: PathBuf,
}

pub struct ExtractionJob {
    card_parser: ReviewCardParser,
    normalizer: ReviewNormalizer,
    malformed_policy: MalformedPolicy,
    parallel: bool,
}

impl ExtractionJob {
    pub fn new(config: &ExtractionConfig) -> Result<Self, JobError> {
        Ok(Self {
            card_parser: ReviewCardParser::with_markers(&config.markers).map_err(JobError::Config)?,
            normalizer: ReviewNormalizer::new().map_err(JobError::Config)?,
            malformed_policy: config.malformed_policy,
            parallel: config.parallel,
        })
    }

    /// Run the whole job
    pub fn run(&self, input_dir: &Path, output_path: &Path) -> Result<JobSummary, JobError> {
        info!("Scanning {} for saved pages", input_dir.display());

        let files = file_discovery::list_html_files(input_dir).map_err(|source| {
            JobError::Discovery {
                root: input_dir.to_path_buf(),
                source,
            }
        })?;
        if files.is_empty() {
            warn!("No html files found under {}", input_dir.display());
        }

        let extractions: Vec<FileExtraction> = if self.parallel {
            files
                .par_iter()
                .map(|path| self.extract_file(path))
                .collect::<Result<_, _>>()?
        } else {
            files
                .iter()
                .map(|path| self.extract_file(path))
                .collect::<Result<_, _>>()?
        };

        let mut summary = JobSummary {
            files_scanned: files.len(),
            cards_found: 0,
            records_written: 0,
            dropped_missing_username: 0,
            dropped_malformed: 0,
            output_path: output_path.to_path_buf(),
        };
        let mut reviews = Vec::new();
        for extraction in extractions {
            summary.cards_found += extraction.cards_found;
            summary.dropped_missing_username += extraction.dropped_missing_username;
            summary.dropped_malformed += extraction.dropped_malformed;
            reviews.extend(extraction.reviews);
        }
        summary.records_written = reviews.len();

        csv_export::export_reviews(output_path, &reviews)?;

        info!(
            "Extracted {} reviews from {} files ({} cards, {} without username, {} malformed)",
            summary.records_written,
            summary.files_scanned,
            summary.cards_found,
            summary.dropped_missing_username,
            summary.dropped_malformed
        );
        Ok(summary)
    }

    /// Read one file fully, then extract from its content
    pub fn extract_file(&self, path: &Path) -> Result<FileExtraction, JobError> {
        let content = fs::read_to_string(path).map_err(|source| JobError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract_document(&content, &ParseContext::new(path))
    }

    /// Extract normalized reviews from one document's text
    pub fn extract_document(
        &self,
        content: &str,
        context: &ParseContext,
    ) -> Result<FileExtraction, JobError> {
        let html = Html::parse_document(content);
        let raw_reviews = self
            .card_parser
            .parse_with_context(&html, context)
            .map_err(JobError::Config)?;

        let mut extraction = FileExtraction {
            cards_found: raw_reviews.len(),
            ..FileExtraction::default()
        };

        for (card_index, raw) in raw_reviews.into_iter().enumerate() {
            match self.normalizer.normalize(raw) {
                Ok(Some(review)) => extraction.reviews.push(review),
                Ok(None) => extraction.dropped_missing_username += 1,
                Err(source)
                    if self.malformed_policy == MalformedPolicy::SkipRecord
                        && source.is_recoverable() =>
                {
                    warn!(
                        "Skipping card {} in {}: {}",
                        card_index,
                        context.source().display(),
                        source
                    );
                    extraction.dropped_malformed += 1;
                }
                Err(source) => {
                    return Err(JobError::Parse {
                        path: context.source().to_path_buf(),
                        card_index,
                        source,
                    });
                }
            }
        }

        debug!(
            "{}: {} cards, {} kept, {} without username, {} malformed",
            context.source().display(),
            extraction.cards_found,
            extraction.reviews.len(),
            extraction.dropped_missing_username,
            extraction.dropped_malformed
        );
        Ok(extraction)
    }
}

/// Extract normalized reviews from one document with the default markers,
/// failing on the first malformed value.
pub fn extract_reviews(content: &str) -> ParsingResult<Vec<Review>> {
    let card_parser = ReviewCardParser::new()?;
    let normalizer = ReviewNormalizer::new()?;

    let mut reviews = Vec::new();
    for raw in card_parser.parse_document(content) {
        if let Some(review) = normalizer.normalize(raw)? {
            reviews.push(review);
        }
    }
    Ok(reviews)
}
