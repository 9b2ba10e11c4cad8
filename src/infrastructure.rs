//! Infrastructure layer for file discovery, parsing, export and process setup

pub mod config;
pub mod csv_export;
pub mod file_discovery;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, ConfigSource, ExtractionConfig, LoggingConfig, MalformedPolicy, review_markup};
pub use csv_export::{ExportError, export_reviews};
pub use file_discovery::list_html_files;
pub use logging::init_logging_with_config;
pub use parsing::{MarkerTable, ParsingError, ParsingResult, ReviewCardParser, ReviewNormalizer};
