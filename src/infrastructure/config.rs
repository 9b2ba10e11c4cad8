//! Configuration infrastructure
//!
//! Contains configuration loading for the extraction job plus the constants
//! describing the saved review markup.
//!
//! Configuration is organized into two sections:
//! 1. Extraction settings (markers, malformed value policy, parallelism)
//! 2. Logging settings

use crate::infrastructure::parsing::config::MarkerTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory searched recursively for saved pages
    pub input_dir: PathBuf,

    /// Destination table, replaced on every successful run
    pub output_path: PathBuf,

    pub extraction: ExtractionConfig,

    pub logging: LoggingConfig,
}

/// What to do with a present value that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Abort the whole run on the first malformed value
    #[default]
    FailFast,
    /// Drop the offending record and keep going
    SkipRecord,
}

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub malformed_policy: MalformedPolicy,

    /// Extract files on the rayon pool; output order is unaffected
    pub parallel: bool,

    pub markers: MarkerTable,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console (stderr) output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file
    pub log_dir: PathBuf,

    pub file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(defaults::INPUT_DIR),
            output_path: PathBuf::from(defaults::OUTPUT_PATH),
            extraction: ExtractionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            malformed_policy: MalformedPolicy::default(),
            parallel: defaults::PARALLEL,
            markers: MarkerTable::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at this path; built-in defaults apply
    Defaults(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "loaded from {}", path.display()),
            Self::Defaults(path) => write!(f, "defaults ({} not found)", path.display()),
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, falling back to defaults if it doesn't exist.
    ///
    /// A file that exists but does not parse is an error; the job should not
    /// silently run with settings the operator did not ask for.
    ///
    /// Nothing is logged here: this runs before the subscriber exists, so the
    /// returned source is for the caller to report once logging is up.
    pub fn load_or_default(&self) -> Result<(AppConfig, ConfigSource)> {
        if !self.config_path.exists() {
            return Ok((
                AppConfig::default(),
                ConfigSource::Defaults(self.config_path.clone()),
            ));
        }

        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {:?}", self.config_path))?;

        Ok((config, ConfigSource::File(self.config_path.clone())))
    }

    /// Save configuration to file
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = non_empty_parent(&self.config_path) {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content).context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

pub(crate) fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Structure of the saved review listing markup.
///
/// These class strings are copied verbatim from the third-party page and mean
/// nothing on their own. When the site changes its markup, update them here
/// (or override `extraction.markers` in the config file).
pub mod review_markup {
    use crate::domain::ReviewField;

    /// Container for one review
    pub const CARD: (&str, &str) = ("div", "_c");

    /// (field, tag, exact class attribute)
    pub const FIELDS: [(ReviewField, &str, &str); 8] = [
        (ReviewField::CreatedAt, "div", "biGQs _P pZUbB ncFvv osNWb"),
        (ReviewField::Username, "span", "biGQs _P fiohW fOtGX"),
        (ReviewField::Origin, "div", "biGQs _P pZUbB osNWb"),
        (ReviewField::Rating, "svg", "UctUV d H0"),
        (ReviewField::Condition, "div", "RpeCd"),
        (ReviewField::Title, "span", "yCeTE"),
        (ReviewField::NLike, "span", "biGQs _P FwFXZ"),
        (ReviewField::Review, "span", "JguWG"),
    ];

    /// Rating is carried by this attribute on the bubble graphic
    pub const ATTR_RATING: &str = "aria-label";

    /// Literal prefix in front of the review date
    pub const DATE_PREFIX: &str = "Written ";

    /// chrono format of the date once the prefix is gone, e.g. "March 5, 2023"
    pub const DATE_FORMAT: &str = "%B %d, %Y";

    /// Contribution count embedded in the origin text
    pub const CONTRIBUTION_PATTERN: &str = r"(\d+)\s*contributions";

    /// Literal suffix after the rating number, e.g. "4.0 of 5 bubbles"
    pub const RATING_SUFFIX: &str = ".0 of 5 bubbles";
}

/// Default configuration values
pub mod defaults {
    pub const INPUT_DIR: &str = "data/html";

    pub const OUTPUT_PATH: &str = "data/review.csv";

    /// Saved pages are matched on this extension, case-insensitively
    pub const HTML_EXTENSION: &str = ".html";

    pub const PARALLEL: bool = false;

    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = false;

    pub const LOG_DIR: &str = "logs";

    pub const LOG_FILE_NAME: &str = "review-extractor.log";
}
