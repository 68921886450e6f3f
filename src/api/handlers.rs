//! HTTP API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::metrics;
use crate::switch::KillSwitch;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The render flag and its store.
    pub switch: KillSwitch,
    /// Secret the toggle endpoint compares against.
    pub api_key: Arc<str>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(switch: KillSwitch, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            switch,
            api_key: api_key.into(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` is served.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Exact comparison against the configured secret. A missing key never matches.
    pub fn authorize(&self, api_key: Option<&str>) -> bool {
        api_key == Some(self.api_key.as_ref())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("switch", &self.switch)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    #[schema(example = "ok")]
    pub status: &'static str,
}

/// Current flag value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Whether the client application should render.
    pub status: bool,
}

/// Flag value after a toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleResponse {
    /// The value now stored.
    #[serde(rename = "newStatus")]
    pub new_status: bool,
    /// Human-readable summary.
    #[schema(example = "App status updated to true")]
    pub message: String,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short description.
    #[schema(example = "Invalid API Key")]
    pub error: String,
    /// Underlying cause, for store failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Toggle query parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ToggleParams {
    /// Shared secret.
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is alive", body = HealthResponse)),
    tag = "Observability"
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Report whether the client application should render.
#[utoipa::path(
    get,
    path = "/api/check-app-status",
    responses(
        (status = 200, description = "Current flag", body = StatusResponse),
        (status = 500, description = "Status store unavailable", body = ErrorResponse)
    ),
    tag = "Kill Switch"
)]
pub async fn check_app_status(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, ApiError> {
    let start = Instant::now();
    metrics::inc_status_checks();

    let result = state.switch.status().await;
    metrics::record_http_latency(start, "/api/check-app-status");

    let status = result.map_err(ApiError::ReadFailed)?;
    debug!(status, "App status checked");
    Ok(Json(StatusResponse { status }))
}

/// Flip the flag. Requires `apiKey`.
#[utoipa::path(
    post,
    path = "/api/toggle-app-status",
    params(ToggleParams),
    responses(
        (status = 200, description = "Flag toggled", body = ToggleResponse),
        (status = 403, description = "Invalid API key", body = ErrorResponse),
        (status = 500, description = "Status store unavailable", body = ErrorResponse)
    ),
    security(("api_key" = [])),
    tag = "Kill Switch"
)]
pub async fn toggle_app_status(
    State(state): State<AppState>,
    query: Result<Query<ToggleParams>, QueryRejection>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let start = Instant::now();

    // A query that does not parse (e.g. a repeated apiKey) carries no usable key.
    let api_key = query.ok().and_then(|Query(params)| params.api_key);

    if !state.authorize(api_key.as_deref()) {
        metrics::inc_toggle_rejections();
        metrics::record_http_latency(start, "/api/toggle-app-status");
        warn!(
            key_present = api_key.is_some(),
            "Rejected toggle with invalid API key"
        );
        return Err(ApiError::Unauthorized);
    }

    let result = state.switch.toggle().await;
    metrics::record_http_latency(start, "/api/toggle-app-status");

    let new_status = result.map_err(ApiError::UpdateFailed)?;
    metrics::inc_status_toggles();

    Ok(Json(ToggleResponse {
        new_status,
        message: format!("App status updated to {}", new_status),
    }))
}

/// Prometheus exposition.
pub async fn prometheus(handle: PrometheusHandle) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn state() -> AppState {
        AppState::new(KillSwitch::new(Arc::new(MemoryStore::new(false))), "admin")
    }

    #[test]
    fn authorize_requires_exact_match() {
        let state = state();
        assert!(state.authorize(Some("admin")));
        assert!(!state.authorize(Some("Admin")));
        assert!(!state.authorize(Some("admin ")));
        assert!(!state.authorize(Some("")));
        assert!(!state.authorize(None));
    }

    #[test]
    fn toggle_response_uses_camel_case_field() {
        let body = serde_json::to_value(ToggleResponse {
            new_status: true,
            message: "App status updated to true".to_string(),
        })
        .unwrap();
        assert_eq!(body["newStatus"], true);
    }

    #[test]
    fn error_response_omits_empty_details() {
        let body = serde_json::to_value(ErrorResponse {
            error: "Invalid API Key".to_string(),
            details: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Invalid API Key" }));
    }
}
