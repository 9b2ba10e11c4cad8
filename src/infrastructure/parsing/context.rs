//! Parsing context for one saved page

use std::path::{Path, PathBuf};

/// Context information for parsing operations
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// File the document was read from, used in diagnostics only
    pub source: PathBuf,
}

impl ParseContext {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new("<inline>")
    }
}
