// ============================================================================
// Pool API - Reading Handlers
// File: crates/pool-api/src/handlers/readings.rs
// ============================================================================
//! Submit, view, revise and move pool readings through their lifecycle.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use pool_core::domain::{Reading, ReadingData};
use pool_core::error::DomainError;
use pool_core::services::{ReadingView, SubmissionOutcome};
use pool_shared::messages;

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub reference_id: String,
    pub message: String,
    pub reading: Reading,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadingViewResponse {
    pub reading: Reading,
    pub status_label: String,
    pub is_readonly: bool,
    pub can_submit: bool,
    pub can_change_status: bool,
}

impl From<ReadingView> for ReadingViewResponse {
    fn from(view: ReadingView) -> Self {
        Self {
            status_label: view.reading.status.label().to_string(),
            reading: view.reading,
            is_readonly: view.is_readonly,
            can_submit: view.can_submit,
            can_change_status: view.can_change_status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub reference_id: String,
    pub status: String,
    pub status_label: String,
    pub message: String,
}

fn into_result(outcome: SubmissionOutcome) -> Result<SubmissionResponse, ApiError> {
    match outcome {
        SubmissionOutcome::Accepted { reference_id, message, reading } => Ok(SubmissionResponse {
            reference_id,
            message,
            reading,
        }),
        SubmissionOutcome::Rejected { error, message } => Err(ApiError::from_domain(&error, message)),
    }
}

/// Submit - POST /api/v1/readings
pub async fn submit(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(data): ApiJson<ReadingData>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponse>>), ApiError> {
    let outcome = state.readings.submit(&data, &current.user).await;
    let response = into_result(outcome)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// View - GET /api/v1/readings/{reference_id}
pub async fn view(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(reference_id): Path<String>,
) -> Result<Json<ApiResponse<ReadingViewResponse>>, ApiError> {
    let view = state
        .readings
        .try_view(&reference_id, &current.user)
        .await
        .map_err(|e| ApiError::from_domain(&e, load_message(&e)))?;

    Ok(Json(ApiResponse::success(view.into())))
}

/// Revise - PUT /api/v1/readings/{reference_id}
pub async fn revise(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(reference_id): Path<String>,
    ApiJson(data): ApiJson<ReadingData>,
) -> Result<Json<ApiResponse<SubmissionResponse>>, ApiError> {
    let outcome = state.readings.revise(&reference_id, &data, &current.user).await;
    Ok(Json(ApiResponse::success(into_result(outcome)?)))
}

/// Status change - PUT /api/v1/readings/{reference_id}/status
pub async fn update_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(reference_id): Path<String>,
    ApiJson(payload): ApiJson<StatusRequest>,
) -> Result<Json<ApiResponse<StatusResponse>>, ApiError> {
    let mut reading = state
        .readings
        .try_view(&reference_id, &current.user)
        .await
        .map_err(|e| ApiError::from_domain(&e, load_message(&e)))?
        .reading;

    let status = state
        .readings
        .try_update_status(&mut reading, &payload.status, &current.user)
        .await
        .map_err(|e| ApiError::from_domain(&e, status_message(&e)))?;

    Ok(Json(ApiResponse::success(StatusResponse {
        reference_id: reading.reference_id,
        status: status.as_str().to_string(),
        status_label: status.label().to_string(),
        message: messages::STATUS_UPDATED.to_string(),
    })))
}

fn load_message(error: &DomainError) -> &'static str {
    match error {
        DomainError::ReadingNotFound(_) => messages::READING_NOT_FOUND,
        _ => messages::READING_LOAD_FAILED,
    }
}

fn status_message(error: &DomainError) -> &'static str {
    match error {
        DomainError::InvalidStatus(_) => messages::STATUS_INVALID,
        DomainError::Unauthorized(_) => messages::STATUS_FORBIDDEN,
        DomainError::StatusChanged { .. } => messages::READING_CHANGED,
        _ => messages::STATUS_UPDATE_FAILED,
    }
}
