//! Template-rendered pages: index, routes, 404 and the error page.

use axum::{
    extract::{Request, State},
    http::{header::CONTENT_TYPE, header::HOST, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use httpdummy_core::error::{HttpDummyError, Result};
use minijinja::context;

use crate::app_state::AppState;
use crate::context::client;
use crate::error::HttpError;
use crate::stream::TEXT_HTML;

const TITLE: &str = "dummy http backend";

fn html(status: StatusCode, page: Result<String>) -> Response {
    match page {
        Ok(body) => (status, [(CONTENT_TYPE, TEXT_HTML)], body).into_response(),
        Err(e) => HttpError(e).into_response(),
    }
}

/// Render `err` with the error template: 400 for client mistakes, 500 otherwise.
pub fn error_page(state: &AppState, err: &HttpDummyError) -> Response {
    let status = if err.is_client_error() {
        tracing::debug!(error = %err, "rejecting request");
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(code = err.code().as_str(), error = %err, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let msg = err.to_string();
    html(status, state.templates().render("error", context! { msg }))
}

pub async fn index(State(state): State<AppState>, req: Request) -> Response {
    let peer = client::peer_addr(req.extensions());
    let remote = peer.map(|p| p.to_string()).unwrap_or_default();
    let ip = client::client_ip(req.headers(), peer);
    let host = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or_default()
        .to_owned();

    html(
        StatusCode::OK,
        state.templates().render(
            "index",
            context! { title => TITLE, remote_addr => remote, ip, host },
        ),
    )
}

pub async fn routes(State(state): State<AppState>) -> Response {
    html(
        StatusCode::OK,
        state.templates().render("routes", context! { routes => state.routes() }),
    )
}

pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    if state.cfg().code_404_as_200 {
        html(
            StatusCode::OK,
            state.templates().render(
                "404",
                context! { notfound => path, msg => "pretending 404 is 200" },
            ),
        )
    } else {
        html(StatusCode::NOT_FOUND, state.templates().render("404", context! { notfound => path }))
    }
}
