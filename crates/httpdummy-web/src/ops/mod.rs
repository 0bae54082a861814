//! Operational HTTP endpoints.
//!
//! - `/_status/health`  : liveness, `<STATE>\n` with 200
//! - `/_status/metrics` : `<name> <value>` lines, or JSON with `?format=json`

use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use httpdummy_core::error::HttpDummyError;

use crate::app_state::AppState;
use crate::error::HttpError;
use crate::stream::TEXT_PLAIN;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!("{}\n", state.registry().status().state().as_str());
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], body)
}

#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    pub format: Option<String>,
}

pub async fn metrics(State(state): State<AppState>, Query(q): Query<MetricsQuery>) -> Response {
    if q.format.as_deref() == Some("json") {
        return match serde_json::to_string(&state.registry().snapshot()) {
            Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => HttpError(HttpDummyError::Internal(format!("metrics json: {e}"))).into_response(),
        };
    }

    (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], state.registry().scrape()).into_response()
}
