//! In-process harness shared by the HTTP tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use httpdummy_core::metrics::{MetricValue, Registry};
use httpdummy_web::{app_state::AppState, config::Config, router::build_router};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub registry: Arc<Registry>,
}

impl TestApp {
    pub fn new(cfg: Config) -> Self {
        let registry = Arc::new(Registry::new());
        let state = AppState::new(cfg, Arc::clone(&registry)).expect("state");
        Self {
            router: build_router(state),
            registry,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(request(Method::GET, uri, Body::empty())).await
    }

    pub fn metric(&self, name: &str) -> MetricValue {
        self.registry.get(name).expect("metric registered").value()
    }

    pub fn inflight(&self) -> i64 {
        match self.metric("conn.inflight") {
            MetricValue::Gauge(v) => v,
            other => panic!("unexpected {other:?}"),
        }
    }

    pub fn errors(&self) -> u64 {
        match self.metric("conn.err") {
            MetricValue::Counter(v) => v,
            other => panic!("unexpected {other:?}"),
        }
    }

    pub fn rate(&self) -> f64 {
        match self.metric("conn.rate") {
            MetricValue::Rate(v) => v,
            other => panic!("unexpected {other:?}"),
        }
    }
}

pub fn app() -> TestApp {
    TestApp::new(Config::default())
}

pub fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(body).unwrap()
}

pub async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Page body with the HTML-escaped slashes turned back into `/`.
pub async fn page_text(resp: Response) -> String {
    body_string(resp).await.replace("&#x2f;", "/")
}

pub fn content_type(resp: &Response) -> String {
    resp.headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Poll `cond` until it holds or `timeout` elapses.
pub async fn eventually(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

/// In-memory sink for a thread-scoped `tracing` subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Capture records on the current thread until the guard is dropped.
    /// Tests using this must run on the current-thread runtime.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        (capture, tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
