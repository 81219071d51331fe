//! Run context threaded through every pipeline stage.
//!
//! The [`PipelineContext`] is built once at process entry and bundles:
//!
//! - **Configuration**: the resolved [`PipelineConfig`]
//! - **Run time**: the instant derived fields (customer tenure) are computed against
//! - **Span**: the tracing span all stage spans are parented to

use chrono::{NaiveDateTime, Utc};
use tracing::{Span, info_span};

use crate::config::PipelineConfig;

#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub config: PipelineConfig,
    /// Reference instant for tenure; fixed for the whole run.
    pub run_time: NaiveDateTime,
    /// Parent span for every stage of this run.
    pub span: Span,
}

impl PipelineContext {
    /// Creates a context for a run starting now, on the UTC clock that
    /// parsed timestamps are normalized to.
    pub fn new(config: PipelineConfig) -> Self {
        let run_time = Utc::now().naive_utc();
        Self {
            span: info_span!("pipeline_run", run_time = %run_time),
            config,
            run_time,
        }
    }

    /// Pins the reference instant (tests, replays).
    #[must_use]
    pub fn with_run_time(mut self, run_time: NaiveDateTime) -> Self {
        self.run_time = run_time;
        self.span = info_span!("pipeline_run", run_time = %run_time);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.config.load.batch_size
    }
}
