//! HTTP handlers for dashboard endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::dashboard::GetKpisQuery;

use super::dto::KpisResponse;

/// GET /api/dashboard/kpis
pub async fn get_kpis(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let kpis = state
        .kpis_handler()
        .handle(GetKpisQuery { user_id: user.id })
        .await?;

    Ok(Json(KpisResponse::from(kpis)))
}
