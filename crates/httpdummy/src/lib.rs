//! httpdummy: a dummy HTTP backend for poking at proxies and load balancers.
//!
//! It serves slow streamed responses, body sinks and health/metrics
//! endpoints. Embedders usually only need [`WebBackend`] plus a [`Config`]:
//!
//! ```no_run
//! # async fn run() -> httpdummy::Result<()> {
//! use httpdummy::{metrics::Registry, Config, WebBackend};
//!
//! let cfg = Config { listen_addr: "127.0.0.1:3001".into(), ..Config::default() };
//! WebBackend::new(cfg, Registry::global())?.run().await
//! # }
//! ```
//!
//! The `core` and `web` modules expose everything else.

pub mod core {
    pub use httpdummy_core::*;
}

pub mod web {
    pub use httpdummy_web::*;
}

pub use httpdummy_core::{metrics, HttpDummyError, Interval, Result};
pub use httpdummy_web::{config::Config, WebBackend};
