//! Fan-out orchestrator.
//!
//! Runs one transform-and-upload task per configured resolution against a
//! single frozen staged artifact. All tasks launch together and every one
//! runs to completion; a failing target never cancels its siblings. The
//! aggregate result carries the individual outcome of each target.

use crate::image::{TransformError, VariantTransformer};
use bytes::Bytes;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use vario_core::StagedArtifact;
use vario_storage::{StagingError, StagingStore, StorageError, Uploader};

/// Failure cause for one fan-out target.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("staged artifact read failed: {0}")]
    Read(#[from] StagingError),

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("task aborted: {0}")]
    Aborted(String),
}

/// Outcome of one transform-and-upload task.
#[derive(Debug)]
pub struct VariantOutcome {
    pub resolution: u32,
    pub destination: String,
    /// Location URL on success, failure cause otherwise.
    pub result: Result<String, TaskError>,
}

/// Joint result of a fan-out run: exactly one outcome per resolution.
#[derive(Debug)]
pub struct PipelineResult {
    pub outcomes: Vec<VariantOutcome>,
}

impl PipelineResult {
    /// Overall success: every target produced a location.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Run transform-and-upload concurrently for every resolution.
///
/// Each task reads the staged artifact fresh (the file is frozen by the
/// time fan-out starts), resizes on a blocking thread, and uploads to
/// `<artifact_id>_<r>x<r>.<ext>`. Waits for every task before returning.
pub async fn fan_out(
    staging: &StagingStore,
    artifact: &StagedArtifact,
    resolutions: &[u32],
    uploader: Arc<dyn Uploader>,
) -> PipelineResult {
    let handles: Vec<_> = resolutions
        .iter()
        .map(|&resolution| {
            let staging = staging.clone();
            let uploader = uploader.clone();
            let file_name = artifact.file_name();
            let extension = artifact.extension().to_string();
            let destination = artifact.variant_path(resolution);

            let handle = tokio::spawn({
                let destination = destination.clone();
                async move {
                    run_variant(staging, file_name, extension, resolution, destination, uploader)
                        .await
                }
            });

            (resolution, destination, handle)
        })
        .collect();

    let outcomes = join_all(handles.into_iter().map(
        |(resolution, destination, handle)| async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(TaskError::Aborted(e.to_string())),
            };
            VariantOutcome {
                resolution,
                destination,
                result,
            }
        },
    ))
    .await;

    PipelineResult { outcomes }
}

async fn run_variant(
    staging: StagingStore,
    file_name: String,
    extension: String,
    resolution: u32,
    destination: String,
    uploader: Arc<dyn Uploader>,
) -> Result<String, TaskError> {
    let data = staging.read(&file_name).await?;
    let format = VariantTransformer::format_for_extension(&extension)?;

    let transformed: Bytes = tokio::task::spawn_blocking(move || {
        VariantTransformer::transform(&data, resolution, format)
    })
    .await
    .map_err(|e| TaskError::Aborted(e.to_string()))??;

    let location = uploader.upload(&destination, transformed).await?;

    tracing::info!(
        destination = %destination,
        location = %location,
        resolution,
        "variant uploaded"
    );

    Ok(location)
}
