//! Request middleware: rate tick, request log, panic recovery.

use std::panic::AssertUnwindSafe;
use std::time::{Instant, SystemTime};

use axum::{
    extract::{Request, State},
    http::{header::USER_AGENT, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::app_state::AppState;
use crate::context::client;
use crate::logging::panic_message;

/// Count every accepted request in `conn.rate`, before routing.
pub async fn tick_rate(State(app): State<AppState>, req: Request, next: Next) -> Response {
    app.conn().rate.update(1);
    next.run(req).await
}

/// One structured record per request, emitted after the handler returns.
pub async fn log_request(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().unwrap_or_default().to_owned();
    let ip = client::client_ip(req.headers(), client::peer_addr(req.extensions()));
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let resp = next.run(req).await;

    let status = resp.status().as_u16();
    let latency = started.elapsed();
    let time = humantime::format_rfc3339_seconds(SystemTime::now());

    macro_rules! request_event {
        ($lvl:expr) => {
            tracing::event!(
                $lvl,
                %time, %method, %path, %query, status, ?latency, %ip, %user_agent,
                "{}",
                path
            )
        };
    }
    if resp.status().is_server_error() {
        request_event!(tracing::Level::ERROR);
    } else if resp.status().is_client_error() {
        request_event!(tracing::Level::WARN);
    } else {
        request_event!(tracing::Level::INFO);
    }
    resp
}

/// Turn a panicking handler into an empty 500 instead of a dropped connection.
pub async fn recover_panic(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(resp) => resp,
        Err(payload) => {
            tracing::error!(%path, panic = %panic_message(payload.as_ref()), "handler panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
