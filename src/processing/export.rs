//! Writes aggregation results as CSV.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::PipelineError;
use crate::processing::engine::EnrichmentResult;

/// Header expected by the downstream spreadsheet template.
const ENRICHMENT_HEADER: &str = "Year,Month,Day,Hour,Minutes of Interaction";

/// Write the hourly rows to `{output_dir}/{data_name}_enrichment_data.csv`
/// and return the written path.
pub fn write_enrichment_csv(
    result: &EnrichmentResult,
    output_dir: &Path,
    data_name: &str,
) -> Result<PathBuf, PipelineError> {
    let path = output_dir.join(format!("{data_name}_enrichment_data.csv"));

    let mut contents = String::from(ENRICHMENT_HEADER);
    contents.push('\n');
    for row in &result.hourly {
        let _ = writeln!(
            contents,
            "{},{},{},{},{}",
            row.year, row.month, row.day, row.hour, row.minutes_of_interaction
        );
    }

    fs::write(&path, contents).map_err(|source| PipelineError::Io {
        path: path.clone(),
        source,
    })?;

    info!("wrote enrichment results to {}", path.display());
    Ok(path)
}

/// Write the per-sample activity series to
/// `{output_dir}/{data_name}_raw_activity.csv`.
pub fn write_raw_activity_csv(
    series: &[f64],
    output_dir: &Path,
    data_name: &str,
) -> Result<PathBuf, PipelineError> {
    let path = output_dir.join(format!("{data_name}_raw_activity.csv"));

    let mut contents = String::from("Index,Activity\n");
    for (index, value) in series.iter().enumerate() {
        let _ = writeln!(contents, "{index},{value}");
    }

    fs::write(&path, contents).map_err(|source| PipelineError::Io {
        path: path.clone(),
        source,
    })?;

    info!("wrote raw activity series to {}", path.display());
    Ok(path)
}
