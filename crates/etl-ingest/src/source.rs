//! Source loading: read, validate, standardize.

use std::path::PathBuf;

use polars::prelude::DataFrame;
use tracing::info_span;

use etl_model::{PipelineConfig, SourceKind};

use crate::csv::read_csv_table;
use crate::error::{IngestError, Result};
use crate::schema::validate_columns;
use crate::standardize::{CoercionReport, standardize};

/// A source that passed schema validation and standardization.
#[derive(Debug, Clone)]
pub struct IngestedSource {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub frame: DataFrame,
    pub coercion: CoercionReport,
}

/// Reads the configured file for `kind`, validates its columns and standardizes its types.
///
/// # Errors
///
/// Missing or empty files, parse failures and missing required columns are
/// all fatal for the source.
pub fn load_source(config: &PipelineConfig, kind: SourceKind) -> Result<IngestedSource> {
    let path = config.source(kind).file_path.clone();
    let span = info_span!("ingest", source = %kind, path = %path.display());
    let _guard = span.enter();

    let raw = read_csv_table(&path)?;

    let required = config.required_columns(kind);
    let report = validate_columns(&raw, &required, &path);
    if !report.is_valid() {
        return Err(IngestError::MissingColumns {
            path,
            missing: report.missing,
        });
    }

    let standardized = info_span!("standardize")
        .in_scope(|| standardize(raw, kind.date_columns(), kind.identifier_columns()))?;

    Ok(IngestedSource {
        kind,
        path,
        frame: standardized.frame,
        coercion: standardized.coercion,
    })
}
