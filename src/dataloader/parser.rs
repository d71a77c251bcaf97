//! Reads a raw tracking-data file into column labels and numeric rows.
//!
//! The device writes a text file whose first line names a single combined
//! coordinate column; every following line carries whitespace-separated
//! floating-point tokens: `year month day hour minute second ax ay az`.

use std::fs;
use std::path::Path;

use log::info;

use crate::dataloader::table::TimeSeriesTable;
use crate::error::PipelineError;

/// Read and parse a recording file.
pub fn read_file(path: &Path) -> Result<TimeSeriesTable, PipelineError> {
    let contents = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_contents(&contents)?;
    info!("loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

fn parse_contents(contents: &str) -> Result<TimeSeriesTable, PipelineError> {
    let mut lines = contents.lines();

    // First line is the header; kept verbatim as column metadata.
    let metadata: Vec<String> = match lines.next() {
        Some(header) => header.split(',').map(|label| label.trim().to_string()).collect(),
        None => Vec::new(),
    };

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (index, line) in lines.enumerate() {
        let line_number = index + 2; // 1-based, counting the header
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::with_capacity(9);
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| {
                PipelineError::Parse(format!(
                    "line {line_number}: cannot parse token {token:?} as a number"
                ))
            })?;
            row.push(value);
        }

        // Every row must match the width of the first data row.
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(PipelineError::Parse(format!(
                    "line {line_number}: expected {} fields, found {}",
                    first.len(),
                    row.len()
                )));
            }
        }

        rows.push(row);
    }

    Ok(TimeSeriesTable::new(metadata, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_header_and_rows() {
        let file = write_temp(
            "coordinates\n\
             2024 1 1 9 0 0 0.1 0.2 0.3\n\
             2024 1 1 9 0 30 1.0 1.0 10.0\n",
        );
        let table = read_file(file.path()).unwrap();
        assert_eq!(table.metadata(), &["coordinates".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].len(), 9);
        assert_eq!(table.rows()[1][8], 10.0);
    }

    #[test]
    fn keeps_row_order_from_file() {
        let file = write_temp(
            "coordinates\n\
             2024 1 1 10 0 0 0 0 0\n\
             2024 1 1 9 0 0 0 0 0\n",
        );
        let table = read_file(file.path()).unwrap();
        // Rows are not re-sorted on read.
        assert_eq!(table.rows()[0][3], 10.0);
        assert_eq!(table.rows()[1][3], 9.0);
    }

    #[test]
    fn rejects_non_numeric_token() {
        let file = write_temp("coordinates\n2024 1 1 9 0 0 0.1 oops 0.3\n");
        let err = read_file(file.path()).unwrap_err();
        match err {
            PipelineError::Parse(message) => {
                assert!(message.contains("line 2"));
                assert!(message.contains("oops"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inconsistent_field_count() {
        let file = write_temp(
            "coordinates\n\
             2024 1 1 9 0 0 0.1 0.2 0.3\n\
             2024 1 1 9 0 30 0.1 0.2\n",
        );
        let err = read_file(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_file(Path::new("/nonexistent/recording.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn header_only_file_yields_empty_table() {
        let file = write_temp("coordinates\n");
        let table = read_file(file.path()).unwrap();
        assert!(table.is_empty());
    }
}
