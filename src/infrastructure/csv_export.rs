//! CSV export of normalized reviews
//!
//! Rows go to a temporary file next to the target, which is renamed over the
//! target only once every row has been written and flushed.

use crate::domain::{CSV_COLUMNS, Review};
use crate::infrastructure::config::non_empty_parent;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Write the header plus one row per review to `writer`
pub fn write_reviews<W: Write>(writer: W, reviews: &[Review]) -> csv::Result<()> {
    // Headers are written by hand so an empty table still gets one.
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_COLUMNS)?;
    for review in reviews {
        csv_writer.serialize(review)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Atomically replace `output` with the serialized reviews
pub fn export_reviews(output: &Path, reviews: &[Review]) -> Result<(), ExportError> {
    let path_str = output.display().to_string();
    let io_err = |source: io::Error| ExportError::Io {
        path: path_str.clone(),
        source,
    };

    let dir = non_empty_parent(output).unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    debug!("Writing {} rows via {}", reviews.len(), temp.path().display());

    write_reviews(temp.as_file_mut(), reviews).map_err(|source| ExportError::Csv {
        path: path_str.clone(),
        source,
    })?;
    temp.as_file().sync_all().map_err(io_err)?;

    temp.persist(output).map_err(|e| io_err(e.error))?;

    info!("Wrote {} reviews to {}", reviews.len(), output.display());
    Ok(())
}
