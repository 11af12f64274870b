//! Request handlers

use super::errors::ApiError;
use super::AppState;
use crate::adapters::identity::{bearer_token, TenantPrincipal};
use crate::core::export::WorkbookArtifact;
use crate::domain::{ExportStage, StageError};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderName};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

const CHECKSUM_HEADER: HeaderName = HeaderName::from_static("x-content-sha256");

/// Query string of the movement export
#[derive(Debug, Deserialize)]
pub struct MovementParams {
    pub date: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn full_backup(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let artifact = state.orchestrator.full_backup(&principal.tenant_id).await?;
    Ok(attachment(artifact))
}

pub async fn daily_movement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<MovementParams>,
) -> Result<Response, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let artifact = state
        .orchestrator
        .daily_movement(&principal.tenant_id, params.date.as_deref())
        .await?;
    Ok(attachment(artifact))
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<TenantPrincipal, StageError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    state.identity.authenticate(token).map_err(|error| {
        let failure = StageError::new(ExportStage::Authorization, error);
        crate::log_stage_failure!(&failure);
        failure
    })
}

fn attachment(artifact: WorkbookArtifact) -> Response {
    let headers = [
        (header::CONTENT_TYPE, artifact.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        ),
        (CHECKSUM_HEADER, artifact.summary.checksum),
    ];
    (headers, artifact.bytes).into_response()
}
