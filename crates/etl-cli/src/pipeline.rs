//! Pipeline orchestration: ingest, transform, load.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{error, info};

use etl_ingest::{CoercionReport, load_source};
use etl_load::{TableLoadReport, load_outputs};
use etl_model::{PipelineContext, SourceKind};
use etl_transform::{TransformedTables, transform};

/// Everything one successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub tables: TransformedTables,
    /// Cells per source that could not be coerced and became missing.
    pub coercion: Vec<(SourceKind, CoercionReport)>,
}

impl PipelineOutput {
    pub fn coercion_failures(&self) -> usize {
        self.coercion
            .iter()
            .map(|(_, report)| report.total_failures())
            .sum()
    }
}

/// Runs ingest through aggregation.
///
/// Any fatal problem (missing or empty source, missing columns, a failed
/// transformation) is logged and turns into `None`: no data produced.
pub fn run_pipeline(ctx: &PipelineContext) -> Option<PipelineOutput> {
    let _guard = ctx.span.enter();
    match produce(ctx) {
        Ok(output) => Some(output),
        Err(err) => {
            error!("pipeline aborted, no data produced: {err:#}");
            None
        }
    }
}

fn produce(ctx: &PipelineContext) -> Result<PipelineOutput> {
    let customers =
        load_source(&ctx.config, SourceKind::Customers).context("load customer data")?;
    let sales = load_source(&ctx.config, SourceKind::Sales).context("load sales data")?;

    let tables = transform(&customers.frame, &sales.frame, ctx.run_time)
        .context("transform sources")?;
    info!(
        customers = tables.customers.height(),
        sales = tables.sales.height(),
        products = tables.summary.height(),
        "pipeline produced output"
    );

    Ok(PipelineOutput {
        tables,
        coercion: vec![
            (SourceKind::Customers, customers.coercion),
            (SourceKind::Sales, sales.coercion),
        ],
    })
}

/// Loads the three output tables; failures are isolated per table.
pub fn load_pipeline_output(
    ctx: &PipelineContext,
    conn: &mut Connection,
    output: &PipelineOutput,
) -> Vec<TableLoadReport> {
    let _guard = ctx.span.enter();
    load_outputs(conn, &output.tables, ctx.batch_size())
}

/// Opens (creating when missing) the SQLite database at `path`.
pub fn open_database(path: &Path) -> Result<Connection> {
    Connection::open(path).with_context(|| format!("open database {}", path.display()))
}
