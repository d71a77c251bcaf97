pub mod dataloader;
pub mod error;
pub mod pipeline;
pub mod processing;
pub mod settings;

pub use dataloader::{read_file, TimeSeriesTable, Timestamp};
pub use error::PipelineError;
pub use pipeline::{ExportTarget, PipelineController, PipelineJob, PipelineOutcome};
pub use processing::{
    process_table, EnrichmentResult, HourlyInteraction, MagnitudePolicy, ProcessorConfig,
};
pub use settings::{ProcessingSettings, SettingsStore};
