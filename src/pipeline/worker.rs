//! Runs one full pipeline pass: parse, optional crop, aggregate, export.

use std::path::PathBuf;

use log::info;
use tokio_util::sync::CancellationToken;

use crate::dataloader::{parser, Timestamp};
use crate::error::PipelineError;
use crate::processing::config::{MagnitudePolicy, ProcessorConfig};
use crate::processing::engine::{self, EnrichmentResult};
use crate::processing::export;

/// Everything one pipeline run needs. Runs share no state; abandoning one
/// and starting another is always safe.
#[derive(Debug, Clone)]
pub struct PipelineJob {
    pub input: PathBuf,
    /// Open-interval crop bounds applied before aggregation.
    pub crop: Option<(Timestamp, Timestamp)>,
    pub config: ProcessorConfig,
    pub export: Option<ExportTarget>,
    /// Also write the per-sample activity series next to the enrichment CSV.
    pub export_raw_activity: bool,
}

#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub output_dir: PathBuf,
    pub data_name: String,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub result: EnrichmentResult,
    pub first_timestamp: Timestamp,
    pub last_timestamp: Timestamp,
    pub exported_to: Option<PathBuf>,
}

/// Execute the job synchronously. Returns `Ok(None)` when the cancellation
/// token fired before the run completed; cancellation is only observed at
/// stage boundaries.
pub fn run_job(
    job: &PipelineJob,
    cancel: &CancellationToken,
) -> Result<Option<PipelineOutcome>, PipelineError> {
    let table = parser::read_file(&job.input)?;
    if cancel.is_cancelled() {
        return Ok(None);
    }

    let table = match job.crop {
        Some((start, end)) => {
            let cropped = table.crop(start, end)?;
            info!("cropped to {} rows in ({start}, {end})", cropped.len());
            cropped
        }
        None => table,
    };
    if cancel.is_cancelled() {
        return Ok(None);
    }

    let first_timestamp = table.first_timestamp()?;
    let last_timestamp = table.last_timestamp()?;

    let result = engine::process_table(&table, &job.config)?;
    info!(
        "aggregated {} rows into {} hourly buckets",
        table.len(),
        result.hourly.len()
    );
    if cancel.is_cancelled() {
        return Ok(None);
    }

    let exported_to = match &job.export {
        Some(target) => {
            if job.export_raw_activity {
                let series = engine::activity_series(&table, MagnitudePolicy::Absolute)?;
                export::write_raw_activity_csv(&series, &target.output_dir, &target.data_name)?;
            }
            Some(export::write_enrichment_csv(
                &result,
                &target.output_dir,
                &target.data_name,
            )?)
        }
        None => None,
    };

    Ok(Some(PipelineOutcome {
        result,
        first_timestamp,
        last_timestamp,
        exported_to,
    }))
}
