//! Rate tick, request log and panic recovery.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, StatusCode},
    middleware::from_fn,
    routing::get,
    Router,
};
use httpdummy_web::{config::Config, logging, middleware::recover_panic};
use tower::ServiceExt;

use common::{app, body_string, request, LogCapture, TestApp};

async fn boom() -> &'static str {
    panic!("boom")
}

#[tokio::test]
async fn panics_become_empty_500() {
    let router = Router::new()
        .route("/boom", get(boom))
        .route("/ok", get(|| async { "ok" }))
        .layer(from_fn(recover_panic));

    let resp = router.clone().oneshot(request(Method::GET, "/boom", Body::empty())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(resp).await, "");

    let resp = router.oneshot(request(Method::GET, "/ok", Body::empty())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn every_request_ticks_the_rate() {
    let app = app();
    assert_eq!(app.rate(), 0.0);

    app.get("/_status/health").await;
    app.get("/nonexistent").await;
    app.get("/slow/nope").await;
    app.send(request(Method::DELETE, "/routes", Body::empty())).await;
    app.get("/s/css/style.css").await;

    // five events over a 10s window, read back within milliseconds
    let rate = app.rate();
    assert!((rate - 0.5).abs() < 0.01, "rate {rate}");
}

#[tokio::test]
async fn request_log_layer_passes_responses_through() {
    let app = TestApp::new(Config {
        log_http_requests: true,
        ..Config::default()
    });
    let resp = app.get("/_status/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "OK\n");

    let resp = app.get("/missing").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

/// Value of `key=` in a formatted record, up to the next space.
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let start = line.find(&format!(" {key}="))? + key.len() + 2;
    line[start..].split(' ').next()
}

#[tokio::test]
async fn request_log_records_request_fields() {
    let app = TestApp::new(Config {
        log_http_requests: true,
        ..Config::default()
    });
    let (logs, _guard) = LogCapture::install();

    let mut req = request(Method::GET, "/missing?x=1", Body::empty());
    req.headers_mut().insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
    req.headers_mut().insert("user-agent", "curl/8.0".parse().unwrap());
    req.extensions_mut()
        .insert(ConnectInfo("192.0.2.10:40000".parse::<SocketAddr>().unwrap()));
    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let out = logs.contents();
    let line = out
        .lines()
        .find(|l| l.contains("status=404"))
        .unwrap_or_else(|| panic!("no request record in {out:?}"));
    assert!(line.contains("WARN"), "{line}");
    assert_eq!(field(line, "method"), Some("GET"));
    assert_eq!(field(line, "path"), Some("/missing"));
    assert_eq!(field(line, "query"), Some("x=1"));
    assert_eq!(field(line, "ip"), Some("203.0.113.9"));
    assert_eq!(field(line, "user_agent"), Some("curl/8.0"));
    assert!(field(line, "latency").is_some_and(|v| !v.is_empty()), "{line}");
    let time = field(line, "time").unwrap();
    assert!(humantime::parse_rfc3339(time).is_ok(), "time={time}");
}

#[tokio::test]
async fn request_log_levels_follow_status() {
    let app = TestApp::new(Config {
        log_http_requests: true,
        ..Config::default()
    });
    let (logs, _guard) = LogCapture::install();

    app.get("/_status/health").await;
    let out = logs.contents();
    let line = out.lines().find(|l| l.contains("status=200")).unwrap();
    assert!(line.contains("INFO"), "{line}");
    assert_eq!(field(line, "ip"), Some(""));
}

#[tokio::test]
async fn no_request_records_when_logging_is_off() {
    let app = app();
    let (logs, _guard) = LogCapture::install();

    app.get("/missing").await;
    app.get("/_status/health").await;
    let out = logs.contents();
    assert!(!out.contains("status="), "{out}");
}

#[tokio::test]
async fn panics_are_logged_with_location_and_backtrace() {
    logging::install_panic_hook();
    let (logs, _guard) = LogCapture::install();

    let router = Router::new()
        .route("/boom", get(boom))
        .layer(from_fn(recover_panic));
    let resp = router.oneshot(request(Method::GET, "/boom", Body::empty())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let out = logs.contents();
    assert!(out.contains("panicked: boom"), "{out}");
    assert!(out.contains("middleware_chain.rs:"), "{out}");
    assert!(out.contains("backtrace="), "{out}");
    assert!(out.contains("handler panicked"), "{out}");
}
