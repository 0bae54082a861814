//! `/slow/:duration` streaming and its bookkeeping.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use futures_util::StreamExt;

use common::{app, body_string, content_type, eventually};

#[tokio::test]
async fn streams_pre_keepalives_then_post() {
    let app = app();
    let started = Instant::now();
    let resp = app.get("/slow/100ms").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("text/html"));

    let body = body_string(resp).await;
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(100), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "{elapsed:?}");

    let pre = body.find("responding in 100ms, one chunk every 10ms").expect("pre");
    let first_bang = body.find("!\n").expect("keep-alive");
    let post = body.find("<p>done</p>").expect("post");
    assert!(pre < first_bang && first_bang < post);
    let bangs = body.matches("!\n").count();
    assert!((1..=11).contains(&bangs), "{bangs} keep-alives");
}

#[tokio::test]
async fn composite_duration_is_echoed_normalized() {
    let app = app();
    // long enough to see the header, then hang up
    let resp = app.get("/slow/0h0m1.5s").await;
    let mut chunks = resp.into_body().into_data_stream();
    let first = chunks.next().await.unwrap().unwrap();
    let text = String::from_utf8(first.to_vec()).unwrap();
    assert!(text.contains("responding in 1.5s, one chunk every 150ms"), "{text}");
}

#[tokio::test]
async fn bad_duration_is_400_without_metrics() {
    let app = app();
    let resp = app.get("/slow/bogus").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(content_type(&resp).starts_with("text/html"));
    let body = body_string(resp).await;
    assert!(body.contains("bad time:"), "{body}");
    assert_eq!(app.inflight(), 0);
    assert_eq!(app.errors(), 0);

    let resp = app.get("/slow/10").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(resp).await.contains("missing unit"));
}

#[tokio::test]
async fn non_positive_duration_skips_keepalives() {
    let app = app();
    for d in ["0", "0s", "-1s"] {
        let started = Instant::now();
        let resp = app.get(&format!("/slow/{d}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(!body.contains("!\n"), "{d}: {body}");
        assert!(body.contains("<p>done</p>"));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}

#[tokio::test]
async fn inflight_returns_to_baseline_after_completion() {
    let app = app();
    let before = app.inflight();

    let resp = app.get("/slow/50ms").await;
    assert_eq!(app.inflight(), before + 1);
    let _ = body_string(resp).await;

    assert!(eventually(Duration::from_secs(1), || app.inflight() == before).await);
    assert_eq!(app.errors(), 0);
}

#[tokio::test]
async fn concurrent_slow_requests_are_tracked() {
    let app = app();
    let a = app.get("/slow/80ms").await;
    let b = app.get("/slow/80ms").await;
    assert_eq!(app.inflight(), 2);

    let (a, b) = tokio::join!(body_string(a), body_string(b));
    assert!(a.contains("<p>done</p>") && b.contains("<p>done</p>"));
    assert!(eventually(Duration::from_secs(1), || app.inflight() == 0).await);
}

#[tokio::test]
async fn client_disconnect_counts_error_and_releases_inflight() {
    let app = app();
    let resp = app.get("/slow/2s").await;
    let mut chunks = resp.into_body().into_data_stream();
    let pre = chunks.next().await.unwrap().unwrap();
    assert!(String::from_utf8_lossy(&pre).contains("responding in 2s"));
    assert_eq!(app.inflight(), 1);

    // hang up mid-response; the next keep-alive write (200ms pacing) fails
    drop(chunks);

    assert!(eventually(Duration::from_secs(2), || app.errors() == 1).await);
    assert!(eventually(Duration::from_secs(1), || app.inflight() == 0).await);
}
