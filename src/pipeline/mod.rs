pub mod controller;
pub mod worker;

pub use controller::PipelineController;
pub use worker::{run_job, ExportTarget, PipelineJob, PipelineOutcome};
