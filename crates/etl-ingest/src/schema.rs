//! Required-column validation.

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{error, info};

/// Outcome of checking a table against its required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    /// Required columns absent from the table, sorted.
    pub missing: Vec<String>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Required columns that `df` does not carry.
pub fn missing_columns(df: &DataFrame, required: &BTreeSet<String>) -> Vec<String> {
    let present: BTreeSet<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    required
        .iter()
        .filter(|name| !present.contains(name.as_str()))
        .cloned()
        .collect()
}

/// Checks that the columns of `df` superset `required`.
///
/// Reports the outcome through logging and the returned report; never fails.
pub fn validate_columns(df: &DataFrame, required: &BTreeSet<String>, source: &Path) -> SchemaReport {
    let missing = missing_columns(df, required);
    if missing.is_empty() {
        info!(path = %source.display(), "all required columns are present");
    } else {
        error!(
            path = %source.display(),
            missing = %missing.join(", "),
            "source is missing required columns"
        );
    }
    SchemaReport { missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame(names: &[&str]) -> DataFrame {
        let columns: Vec<Column> = names
            .iter()
            .map(|name| Column::new((*name).into(), vec!["x"]))
            .collect();
        DataFrame::new(columns).unwrap()
    }

    fn required(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn superset_passes() {
        let df = frame(&["customer_id", "signup_date", "extra"]);
        let report = validate_columns(
            &df,
            &required(&["customer_id", "signup_date"]),
            Path::new("customers.csv"),
        );
        assert!(report.is_valid());
    }

    #[test]
    fn reports_each_missing_column() {
        let df = frame(&["customer_id"]);
        let report = validate_columns(
            &df,
            &required(&["email", "customer_id", "signup_date"]),
            Path::new("customers.csv"),
        );
        assert!(!report.is_valid());
        assert_eq!(report.missing, vec!["email", "signup_date"]);
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let df = frame(&["Customer_ID"]);
        assert_eq!(
            missing_columns(&df, &required(&["customer_id"])),
            vec!["customer_id"]
        );
    }
}
