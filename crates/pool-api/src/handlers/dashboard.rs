use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use pool_core::services::SubmissionRow;
use pool_shared::messages;

use crate::error::ApiError;
use crate::extract::{ApiQuery, CurrentUser};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub count: usize,
    pub rows: Vec<SubmissionRow>,
}

/// Dashboard - GET /api/v1/dashboard?refresh=true
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let rows = state
        .dashboard
        .load(&current.user, query.refresh)
        .await
        .map_err(|e| ApiError::from_domain(&e, messages::DASHBOARD_FAILURE))?;

    Ok(Json(ApiResponse::success(DashboardResponse {
        count: rows.len(),
        rows: rows.as_ref().clone(),
    })))
}
