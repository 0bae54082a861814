//! `POST /post` and `POST /post/:duration`
//!
//! Drains the request body in reads of at most [`READ_CHUNK`] bytes and
//! answers `received <n> bytes\n`. With a positive duration every read is
//! followed by a sleep, and roughly ten `progress <read>/<content-length>`
//! lines are streamed while the body comes in.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header::CONTENT_LENGTH, header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::time::sleep;

use httpdummy_core::duration::Interval;
use httpdummy_core::error::HttpDummyError;

use crate::app_state::AppState;
use crate::pages::error_page;
use crate::stream::{streaming_response, ChunkReader, ResponseWriter, TEXT_PLAIN};

pub const READ_CHUNK: usize = 1024;

/// Aim for this many progress lines per body.
const PROGRESS_REPORTS: u64 = 10;

pub async fn post_sink(headers: HeaderMap, body: Body) -> Response {
    sink(Interval::ZERO, &headers, body).await
}

pub async fn post_sink_paced(
    State(state): State<AppState>,
    Path(duration): Path<String>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    match Interval::parse(&duration) {
        Ok(interval) => sink(interval, &headers, body).await,
        Err(e) => error_page(&state, &HttpDummyError::from(e)),
    }
}

async fn sink(interval: Interval, headers: &HeaderMap, body: Body) -> Response {
    let size = content_length(headers);
    let mut reader = ChunkReader::new(body, READ_CHUNK);

    if !interval.is_positive() {
        let received = drain(&mut reader).await;
        return (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], summary(received)).into_response();
    }

    let (out, response) = streaming_response(StatusCode::OK, TEXT_PLAIN);
    tokio::spawn(drain_paced(reader, out, interval, size));
    response
}

/// `Content-Length` as declared by the client, 0 when absent or unparseable.
pub fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Report progress on every `n`-th read.
///
/// With an unknown size this is 1, so every read reports against a total of 0.
pub fn progress_divider(size: u64) -> u64 {
    (size / (PROGRESS_REPORTS * READ_CHUNK as u64)).max(1)
}

fn summary(received: u64) -> String {
    format!("received {received} bytes\n")
}

async fn drain(reader: &mut ChunkReader) -> u64 {
    let mut received = 0u64;
    loop {
        match reader.read().await {
            Ok(0) => break,
            Ok(n) => received += n as u64,
            Err(e) => {
                tracing::debug!(error = %e, received, "post body read failed");
                break;
            }
        }
    }
    received
}

async fn drain_paced(mut reader: ChunkReader, out: ResponseWriter, interval: Interval, size: u64) {
    let divider = progress_divider(size);
    let pause = interval.to_std();
    let mut received = 0u64;
    let mut reads = 0u64;

    loop {
        reads += 1;
        match reader.read().await {
            Ok(0) => break,
            Ok(n) => received += n as u64,
            Err(e) => {
                tracing::debug!(error = %e, received, "post body read failed");
                break;
            }
        }
        if reads % divider == 0 {
            // a failed write just means nobody is listening any more
            let _ = out.write(format!("progress {received}/{size}\n")).await;
        }
        sleep(pause).await;
    }

    let _ = out.write(summary(received)).await;
}
