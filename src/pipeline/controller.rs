use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;

use super::worker::{run_job, PipelineJob, PipelineOutcome};

/// Drives pipeline runs on a background blocking task so a foreground loop
/// stays responsive. One run at a time; the outcome is delivered exactly
/// once through `finish`.
pub struct PipelineController {
    handle: Option<JoinHandle<Result<Option<PipelineOutcome>, PipelineError>>>,
    cancel_token: Option<CancellationToken>,
}

impl PipelineController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(&mut self, job: PipelineJob) -> Result<()> {
        if self.handle.is_some() {
            bail!("a pipeline run is already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        info!("starting pipeline run for {}", job.input.display());
        let handle = tokio::task::spawn_blocking(move || run_job(&job, &token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Wait for the active run and take its outcome. `Ok(None)` means the
    /// run was cancelled before it completed.
    pub async fn finish(&mut self) -> Result<Option<PipelineOutcome>> {
        let handle = self.handle.take().context("no pipeline run active")?;
        self.cancel_token = None;

        let outcome = handle
            .await
            .context("pipeline task failed to join")??;
        Ok(outcome)
    }

    /// Abandon the active run; the worker stops at its next stage boundary.
    pub async fn cancel(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
            info!("pipeline run abandoned");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Default for PipelineController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::config::{MagnitudePolicy, ProcessorConfig};
    use std::io::Write;

    fn sample_job(dir: &tempfile::TempDir) -> PipelineJob {
        let path = dir.path().join("recording.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "coordinates\n\
             2024 1 1 9 0 0 1 1 1\n\
             2024 1 1 9 0 30 1 1 10\n"
        )
        .unwrap();

        PipelineJob {
            input: path,
            crop: None,
            config: ProcessorConfig {
                threshold: 3.0,
                magnitude_policy: MagnitudePolicy::Signed,
            },
            export: None,
            export_raw_activity: false,
        }
    }

    #[tokio::test]
    async fn start_then_finish_delivers_the_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = PipelineController::new();
        controller.start(sample_job(&dir)).unwrap();
        assert!(controller.is_running());

        let outcome = controller.finish().await.unwrap().unwrap();
        assert_eq!(outcome.result.hourly[0].minutes_of_interaction, 1);
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn second_start_while_running_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = PipelineController::new();
        controller.start(sample_job(&dir)).unwrap();
        assert!(controller.start(sample_job(&dir)).is_err());
        let _ = controller.finish().await;
    }

    #[tokio::test]
    async fn finish_without_start_is_an_error() {
        let mut controller = PipelineController::new();
        assert!(controller.finish().await.is_err());
    }

    #[tokio::test]
    async fn cancel_clears_the_active_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = PipelineController::new();
        controller.start(sample_job(&dir)).unwrap();
        controller.cancel().await.unwrap();
        assert!(!controller.is_running());
    }
}
