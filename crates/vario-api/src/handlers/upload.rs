//! Upload pipeline handler.
//!
//! One request walks Validating → Ingesting → FanningOut → Finalizing.
//! Validation rejects before any body byte is read; ingestion streams the
//! body into staging under the byte cap; fan-out derives and uploads every
//! configured variant; finalization deletes the staged artifact on every
//! exit path and maps the joint outcome to a status code.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use std::sync::Arc;
use vario_core::{extension_for, AppError, Config, StagedArtifact};
use vario_processing::{fan_out, PipelineResult};

/// Upload handler: accepts the raw resource bytes under any HTTP method.
#[tracing::instrument(skip(state, request), fields(operation = "upload"))]
pub async fn upload(State(state): State<Arc<AppState>>, request: Request) -> Response {
    match run_pipeline(&state, request).await {
        Ok(result) => {
            tracing::info!(variants = result.total(), "upload complete");
            StatusCode::OK.into_response()
        }
        Err(err) => HttpAppError::from(err).into_response(),
    }
}

async fn run_pipeline(state: &AppState, request: Request) -> Result<PipelineResult, AppError> {
    // Validating: header checks only, the body is untouched on rejection.
    let extension = validate_headers(&state.config, request.headers())?;
    let artifact = StagedArtifact::generate(&extension);

    // Ingesting: stream the body into staging under the byte cap.
    let ingested = ingest_body(state, &artifact, request.into_body()).await;

    // FanningOut: one task per configured resolution, all run to completion.
    let outcome = match ingested {
        Ok(bytes_written) => {
            tracing::debug!(
                artifact = %artifact.file_name(),
                bytes_written,
                "upload staged"
            );
            Ok(fan_out(
                &state.staging,
                &artifact,
                &state.config.resize_resolutions,
                state.uploader.clone(),
            )
            .await)
        }
        Err(err) => Err(err),
    };

    // Finalizing: the staged artifact is removed on every exit path,
    // whether ingestion failed, fan-out failed, or everything succeeded.
    state.staging.delete(&artifact.file_name()).await;

    let result = outcome?;

    for failure in result.outcomes.iter().filter(|o| o.result.is_err()) {
        if let Err(cause) = &failure.result {
            tracing::error!(
                destination = %failure.destination,
                resolution = failure.resolution,
                error = %cause,
                "variant failed"
            );
        }
    }

    if result.is_success() {
        Ok(result)
    } else {
        Err(AppError::VariantsFailed {
            failed: result.failed(),
            total: result.total(),
        })
    }
}

/// Header validation. Returns the file extension derived from the content
/// type; any rejection here is client-class and happens before a staged
/// artifact exists.
fn validate_headers(config: &Config, headers: &HeaderMap) -> Result<String, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");

    if !config.is_content_type_allowed(content_type) {
        return Err(AppError::Validation(format!(
            "Content type not allowed: '{}'",
            content_type
        )));
    }

    if let Some(declared) = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        if declared > config.max_upload_size {
            return Err(AppError::Validation(format!(
                "Declared resource size {} exceeds limit {}",
                declared, config.max_upload_size
            )));
        }
    }

    let extension = extension_for(content_type).ok_or_else(|| {
        AppError::Validation(format!(
            "No file extension for content type '{}'",
            content_type
        ))
    })?;

    Ok(extension.to_lowercase())
}

/// Stream body chunks into a bounded staging sink. Chunks are consumed in
/// arrival order; a read error (including client disconnect) or crossing
/// the byte cap aborts ingestion.
async fn ingest_body(
    state: &AppState,
    artifact: &StagedArtifact,
    body: Body,
) -> Result<u64, AppError> {
    let mut sink = state
        .staging
        .begin(&artifact.file_name(), state.config.max_upload_size)
        .await?;

    let mut stream = body.into_data_stream();
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| AppError::Internal(format!("request body read failed: {}", e)))?;
        sink.write(&chunk).await?;
    }

    Ok(sink.finalize().await?)
}
