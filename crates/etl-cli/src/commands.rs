use anyhow::{Context, Result};
use tracing::info;

use etl_cli::pipeline::{PipelineOutput, load_pipeline_output, open_database, run_pipeline};
use etl_load::TableLoadReport;
use etl_model::{PipelineContext, load_config};

use crate::cli::{PreviewArgs, RunArgs};

/// Outcome of `run`: what was produced and how each table load went.
#[derive(Debug)]
pub struct RunResult {
    pub output: Option<PipelineOutput>,
    pub reports: Vec<TableLoadReport>,
}

impl RunResult {
    /// True when no data was produced or any table load failed.
    pub fn has_errors(&self) -> bool {
        self.output.is_none() || self.reports.iter().any(|report| !report.succeeded())
    }
}

pub fn run_etl(args: &RunArgs) -> Result<RunResult> {
    let mut config = load_config(&args.config).context("load configuration")?;
    if let Some(batch_size) = args.batch_size {
        config = config.with_batch_size(batch_size.get());
    }
    let ctx = PipelineContext::new(config);

    let Some(output) = run_pipeline(&ctx) else {
        return Ok(RunResult {
            output: None,
            reports: Vec::new(),
        });
    };

    let mut conn = open_database(&args.database)?;
    let reports = load_pipeline_output(&ctx, &mut conn, &output);
    info!(
        database = %args.database.display(),
        failed = reports.iter().filter(|report| !report.succeeded()).count(),
        "load finished"
    );
    Ok(RunResult {
        output: Some(output),
        reports,
    })
}

pub fn run_preview(args: &PreviewArgs) -> Result<Option<PipelineOutput>> {
    let config = load_config(&args.config).context("load configuration")?;
    let ctx = PipelineContext::new(config);
    Ok(run_pipeline(&ctx))
}
