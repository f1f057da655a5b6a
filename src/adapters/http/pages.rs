//! Locale-prefixed page routes.
//!
//! The web client lives under `/es/...` and `/en/...`. Anything else that is
//! not an API path is redirected to the Spanish root; locale paths answer
//! with the labels the client renders for that locale.

use std::collections::BTreeMap;

use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::locale::{resolve_page_path, Locale, PageRoute};
use crate::domain::subscription::SubscriptionStatus;

use super::error::ErrorResponse;

#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub locale: Locale,
    pub path: String,
    /// Badge label per subscription status.
    pub status_labels: BTreeMap<&'static str, &'static str>,
}

impl PageResponse {
    pub fn new(locale: Locale, path: &str) -> Self {
        let status_labels = SubscriptionStatus::ALL
            .into_iter()
            .map(|status| (status.as_str(), locale.status_label(status)))
            .collect();
        Self {
            locale,
            path: path.to_string(),
            status_labels,
        }
    }
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/") || path == "/health"
}

/// Fallback for every path no other route matched.
pub async fn page(OriginalUri(uri): OriginalUri) -> Response {
    let path = uri.path();

    if is_api_path(path) {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", format!("No route for {}", path))),
        )
            .into_response();
    }

    match resolve_page_path(path) {
        PageRoute::Continue(locale) => Json(PageResponse::new(locale, path)).into_response(),
        PageRoute::Redirect(target) => Redirect::temporary(&target).into_response(),
    }
}
