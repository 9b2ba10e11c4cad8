//! HTML parsing infrastructure for saved review pages
//!
//! Card extraction (markup → raw text) and normalization (raw text → typed
//! rows) are separate stages so that each one is total over its input.

pub mod config;
pub mod context;
pub mod normalizer;
pub mod review_card_parser;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::{ElementMarker, FieldMarker, MarkerTable, ValueSource};
pub use context::ParseContext;
pub use normalizer::ReviewNormalizer;
pub use review_card_parser::ReviewCardParser;

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse an already-built document with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}
