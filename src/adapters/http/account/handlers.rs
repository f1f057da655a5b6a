//! HTTP handlers for account endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::account::{
    GetAccountQuery, ProvisionAccountCommand, UpdateThemeCommand,
};
use crate::application::AccountSummary;
use crate::domain::account::ThemePreference;
use crate::domain::foundation::Timestamp;

use super::dto::{AccountResponse, UpdateThemeRequest};

/// POST /api/account - Called by the client right after sign-in or sign-up
pub async fn provision_account(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .provision_account_handler()
        .handle(ProvisionAccountCommand { user })
        .await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(AccountResponse::from(result.summary))))
}

/// GET /api/account
pub async fn get_account(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .get_account_handler()
        .handle(GetAccountQuery { user_id: user.id })
        .await?;

    Ok(Json(AccountResponse::from(summary)))
}

/// PUT /api/account/theme
pub async fn update_theme(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateThemeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let theme: ThemePreference = request.theme.parse()?;

    let account = state
        .update_theme_handler()
        .handle(UpdateThemeCommand {
            user_id: user.id,
            theme,
        })
        .await?;

    let summary = AccountSummary::at(account, &Timestamp::now());
    Ok(Json(AccountResponse::from(summary)))
}
