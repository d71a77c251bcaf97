//! In-memory time-series table and the crop operation.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Calendar timestamp taken from a row's six leading time fields.
///
/// The device writes the components as floats; they are truncated to
/// integers here. Equality is exact across all six components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Timestamp {
    /// Extract a timestamp from a row's leading fields.
    /// Returns `None` when the row has fewer than six fields.
    pub fn from_fields(fields: &[f64]) -> Option<Self> {
        if fields.len() < 6 {
            return None;
        }
        Some(Self {
            year: fields[0] as i32,
            month: fields[1] as u32,
            day: fields[2] as u32,
            hour: fields[3] as u32,
            minute: fields[4] as u32,
            second: fields[5] as u32,
        })
    }

    /// Resolve to a calendar datetime. `None` when the components are not a
    /// real date or time of day (month 13, minute 72, ...).
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// A parsed recording: column labels from the file header plus numeric rows
/// in the order they were read. Rows are never re-sorted, and every
/// operation that derives a table builds a new one instead of mutating in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesTable {
    metadata: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TimeSeriesTable {
    pub fn new(metadata: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { metadata, rows }
    }

    /// Column labels from the source file's header line.
    pub fn metadata(&self) -> &[String] {
        &self.metadata
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_timestamp(&self) -> Result<Timestamp, PipelineError> {
        let row = self.rows.first().ok_or(PipelineError::EmptyTable)?;
        Timestamp::from_fields(row)
            .ok_or_else(|| PipelineError::Parse("first row has fewer than 6 time fields".into()))
    }

    pub fn last_timestamp(&self) -> Result<Timestamp, PipelineError> {
        let row = self.rows.last().ok_or(PipelineError::EmptyTable)?;
        Timestamp::from_fields(row)
            .ok_or_else(|| PipelineError::Parse("last row has fewer than 6 time fields".into()))
    }

    /// Return a new table restricted to rows strictly inside the open
    /// interval `(start, end)`. Rows whose timestamp equals either bound are
    /// excluded. Row order and column metadata carry through unchanged.
    pub fn crop(&self, start: Timestamp, end: Timestamp) -> Result<Self, PipelineError> {
        let start_dt = start.to_datetime().ok_or_else(|| {
            PipelineError::InvalidRange(format!("start bound {start} is not a valid datetime"))
        })?;
        let end_dt = end.to_datetime().ok_or_else(|| {
            PipelineError::InvalidRange(format!("end bound {end} is not a valid datetime"))
        })?;

        let mut rows = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            let timestamp = Timestamp::from_fields(row).ok_or_else(|| {
                PipelineError::Parse(format!("row {}: fewer than 6 time fields", index + 1))
            })?;
            let datetime = timestamp.to_datetime().ok_or_else(|| {
                PipelineError::InvalidRange(format!(
                    "row {}: {timestamp} is not a valid datetime",
                    index + 1
                ))
            })?;
            if datetime > start_dt && datetime < end_dt {
                rows.push(row.clone());
            }
        }

        Ok(Self {
            metadata: self.metadata.clone(),
            rows,
        })
    }
}
