//! Pipeline configuration.
//!
//! The configuration is a JSON document naming both source files, the columns
//! each must carry, and optional load tuning. It is read once at startup and
//! handed to the pipeline inside a [`PipelineContext`](crate::PipelineContext).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, Result};
use crate::schema::SourceKind;

/// Default number of rows per insert batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Location and required columns of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub file_path: PathBuf,
    #[serde(default)]
    pub required_columns: Vec<String>,
}

/// Load tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Fully resolved pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub customer_data: SourceConfig,
    pub sales_data: SourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

impl PipelineConfig {
    /// Parses a configuration document. Relative file paths stay as written.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration of one source.
    pub fn source(&self, kind: SourceKind) -> &SourceConfig {
        match kind {
            SourceKind::Customers => &self.customer_data,
            SourceKind::Sales => &self.sales_data,
        }
    }

    /// Configured required columns plus the built-in minimum for `kind`.
    pub fn required_columns(&self, kind: SourceKind) -> BTreeSet<String> {
        let mut required: BTreeSet<String> = self
            .source(kind)
            .required_columns
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        required.extend(kind.minimum_columns().iter().map(|name| (*name).to_string()));
        required
    }

    /// Overrides the insert batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.load.batch_size = batch_size;
        self
    }

    /// Resolves relative source paths against `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        for source in [&mut self.customer_data, &mut self.sales_data] {
            if source.file_path.is_relative() {
                source.file_path = base.join(&source.file_path);
            }
        }
        self
    }

    fn validate(&self) -> Result<()> {
        for kind in [SourceKind::Customers, SourceKind::Sales] {
            if self.source(kind).file_path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("{}.file_path", kind.config_key()),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if self.load.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "load.batch_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads the configuration file at `path`.
///
/// Relative source paths are resolved against the directory containing the
/// configuration file.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let config = PipelineConfig::from_json_str(&contents, path)?.resolve_paths(base);
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}
