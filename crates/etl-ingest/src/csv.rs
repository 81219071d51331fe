//! CSV file reading.
//!
//! Every column is read as text. Type decisions belong to standardization,
//! which coerces cell by cell, so a malformed value never fails the read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Returns the header line, or `EmptyCsv` when the file holds nothing but whitespace.
fn read_header_line(path: &Path) -> Result<String> {
    let reader = BufReader::new(open(path)?);
    for line in reader.lines() {
        let line = line.map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let cleaned = line.strip_prefix('\u{feff}').unwrap_or(&line);
        if !cleaned.trim().is_empty() {
            return Ok(cleaned.to_string());
        }
    }
    Err(IngestError::EmptyCsv {
        path: path.to_path_buf(),
    })
}

/// Reads a CSV file with a single header row into a DataFrame of string columns.
///
/// Empty cells are read as missing. A file with a header but no data rows
/// yields an empty frame; a file without a header is `EmptyCsv`.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let header = read_header_line(path)?;
    debug!(path = %path.display(), header = %header, "header detected");

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "successfully loaded"
    );
    Ok(df)
}
