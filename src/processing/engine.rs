//! Aggregation engine: counts minutes of interaction per observed hour.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataloader::{TimeSeriesTable, Timestamp};
use crate::error::PipelineError;
use crate::processing::config::{MagnitudePolicy, ProcessorConfig};

/// One output row: minutes of interaction within a single calendar hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyInteraction {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minutes_of_interaction: u32,
}

/// Mean magnitude across all rows sharing an exact timestamp. The device
/// may emit several samples within the same wall-clock second; this is the
/// deduplicated view, kept as a diagnostic output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampAverage {
    pub timestamp: Timestamp,
    pub magnitude: f64,
}

/// Output of one aggregation pass. Immutable once produced; a new run
/// builds a new result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// One row per distinct (year, month, day, hour) in the input, sorted
    /// by hour. Hours with zero qualifying minutes still appear.
    pub hourly: Vec<HourlyInteraction>,
    pub timestamp_averages: Vec<TimestampAverage>,
}

/// Aggregate a table into minutes of interaction per hour.
///
/// Steps: per-row magnitude (mean of the three trailing axis fields, under
/// the configured policy), per-timestamp deduplicated averages, then per
/// hour count the distinct minutes containing at least one sample with
/// magnitude strictly above the threshold.
pub fn process_table(
    table: &TimeSeriesTable,
    config: &ProcessorConfig,
) -> Result<EnrichmentResult, PipelineError> {
    if !config.threshold.is_finite() {
        return Err(PipelineError::InvalidThreshold(config.threshold));
    }
    if table.is_empty() {
        return Err(PipelineError::EmptyTable);
    }

    // Step 1: collapse each row to (timestamp, magnitude).
    let mut samples = Vec::with_capacity(table.len());
    for (index, row) in table.rows().iter().enumerate() {
        let timestamp = Timestamp::from_fields(row).ok_or_else(|| {
            PipelineError::Parse(format!("row {}: fewer than 6 time fields", index + 1))
        })?;
        samples.push((timestamp, row_magnitude(row, config.magnitude_policy)?));
    }

    // Step 2: deduplicate by exact timestamp and average the magnitudes.
    // Not consumed by the minute counting below, which evaluates raw
    // per-row magnitudes.
    let mut by_timestamp: BTreeMap<Timestamp, Vec<f64>> = BTreeMap::new();
    for (timestamp, magnitude) in &samples {
        by_timestamp.entry(*timestamp).or_default().push(*magnitude);
    }
    let timestamp_averages = by_timestamp
        .into_iter()
        .map(|(timestamp, values)| TimestampAverage {
            timestamp,
            magnitude: values.iter().sum::<f64>() / values.len() as f64,
        })
        .collect();

    // Steps 3-4: group by hour, then flag each distinct minute that holds
    // at least one sample strictly above the threshold.
    let mut hours: BTreeMap<(i32, u32, u32, u32), BTreeMap<u32, bool>> = BTreeMap::new();
    for (timestamp, magnitude) in &samples {
        let key = (timestamp.year, timestamp.month, timestamp.day, timestamp.hour);
        let above = hours
            .entry(key)
            .or_default()
            .entry(timestamp.minute)
            .or_insert(false);
        if *magnitude > config.threshold {
            *above = true;
        }
    }

    // Step 5: one row per hour, in sorted hour order.
    let hourly = hours
        .into_iter()
        .map(|((year, month, day, hour), minutes)| HourlyInteraction {
            year,
            month,
            day,
            hour,
            minutes_of_interaction: minutes.values().filter(|above| **above).count() as u32,
        })
        .collect();

    Ok(EnrichmentResult {
        hourly,
        timestamp_averages,
    })
}

/// Per-row magnitude series over the whole table, in row order. This is
/// what raw-activity displays plot (with the `Absolute` policy).
pub fn activity_series(
    table: &TimeSeriesTable,
    policy: MagnitudePolicy,
) -> Result<Vec<f64>, PipelineError> {
    if table.is_empty() {
        return Err(PipelineError::EmptyTable);
    }
    table
        .rows()
        .iter()
        .map(|row| row_magnitude(row, policy))
        .collect()
}

fn row_magnitude(row: &[f64], policy: MagnitudePolicy) -> Result<f64, PipelineError> {
    if row.len() < 3 {
        return Err(PipelineError::Parse(format!(
            "row has {} fields, need at least 3 axis readings",
            row.len()
        )));
    }
    let axes = &row[row.len() - 3..];
    Ok(policy.apply(axes.iter().sum::<f64>() / axes.len() as f64))
}
