pub mod config;
pub mod engine;
pub mod export;

pub use config::{MagnitudePolicy, ProcessorConfig};
pub use engine::{
    activity_series, process_table, EnrichmentResult, HourlyInteraction, TimestampAverage,
};
pub use export::{write_enrichment_csv, write_raw_activity_csv};
