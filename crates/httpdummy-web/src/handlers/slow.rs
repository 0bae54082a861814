//! `GET /slow/:duration`
//!
//! Streams the `slow_pre` page, then `!\n` every pacing interval until the
//! requested duration has passed, then `slow_post`. The newline makes
//! line-buffered clients show each chunk as it arrives.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use bytes::Bytes;
use minijinja::context;
use tokio::time::{sleep, Instant};

use httpdummy_core::duration::{pacing_interval, Interval};
use httpdummy_core::error::HttpDummyError;
use httpdummy_core::metrics::GaugeGuard;

use crate::app_state::AppState;
use crate::obs::metrics::ConnMetrics;
use crate::pages::error_page;
use crate::stream::{streaming_response, ResponseWriter, TEXT_HTML};

const KEEPALIVE: &[u8] = b"!\n";

pub async fn slow_request(State(state): State<AppState>, Path(duration): Path<String>) -> Response {
    let interval = match Interval::parse(&duration) {
        Ok(i) => i,
        Err(e) => return error_page(&state, &HttpDummyError::from(e)),
    };
    let wait = pacing_interval(interval);

    let pre = state.templates().render(
        "slow_pre",
        context! { duration => interval.to_string(), interval => wait.to_string() },
    );
    let post = state.templates().render("slow_post", context! {});
    let (pre, post) = match (pre, post) {
        (Ok(pre), Ok(post)) => (pre, post),
        (Err(e), _) | (_, Err(e)) => return error_page(&state, &e),
    };

    let inflight = state.conn().inflight.track();
    let (out, response) = streaming_response(StatusCode::OK, TEXT_HTML);
    let plan = SlowPlan {
        interval,
        wait,
        pre: Bytes::from(pre),
        post: Bytes::from(post),
    };
    tokio::spawn(stream_slow(out, state.conn().clone(), plan, inflight));
    response
}

struct SlowPlan {
    interval: Interval,
    wait: Interval,
    pre: Bytes,
    post: Bytes,
}

/// Drive one slow response. `_inflight` is released on every return path,
/// including the task being torn down mid-sleep.
async fn stream_slow(out: ResponseWriter, conn: ConnMetrics, plan: SlowPlan, _inflight: GaugeGuard) {
    if out.write(plan.pre).await.is_err() {
        conn.errors.update(1);
        return;
    }

    let deadline = Instant::now() + plan.interval.to_std();
    loop {
        if Instant::now() >= deadline {
            let _ = out.write(plan.post).await;
            return;
        }
        sleep(plan.wait.to_std()).await;
        if out.write(Bytes::from_static(KEEPALIVE)).await.is_err() {
            conn.errors.update(1);
            tracing::debug!(duration = %plan.interval, "slow client went away");
            return;
        }
    }
}
