//! HTTP rendering of [`HttpDummyError`] for non-HTML endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use httpdummy_core::error::HttpDummyError;
use serde_json::json;

#[derive(Debug)]
pub struct HttpError(pub HttpDummyError);

impl From<HttpDummyError> for HttpError {
    fn from(e: HttpDummyError) -> Self {
        Self(e)
    }
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code().as_str(), error = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": self.0.code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
