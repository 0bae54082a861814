//! Handles to the `conn.*` instruments.
//!
//! The instruments live in a [`Registry`]; the binary passes the process-wide
//! one, tests pass a fresh registry so their readings stay isolated.

use std::sync::Arc;
use std::time::Duration;

use httpdummy_core::error::Result;
use httpdummy_core::metrics::{Counter, EwmaRate, Registry, RelativeGauge};

pub const INFLIGHT: &str = "conn.inflight";
pub const ERRORS: &str = "conn.err";
pub const RATE: &str = "conn.rate";

pub const RATE_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ConnMetrics {
    /// Slow responses currently streaming.
    pub inflight: Arc<RelativeGauge>,
    /// Writes that failed because the client went away.
    pub errors: Arc<Counter>,
    /// Accepted requests per second.
    pub rate: Arc<EwmaRate>,
}

impl ConnMetrics {
    pub fn register(registry: &Registry) -> Result<Self> {
        Ok(Self {
            inflight: registry.gauge(INFLIGHT)?,
            errors: registry.counter(ERRORS)?,
            rate: registry.ewma_rate(RATE, RATE_WINDOW)?,
        })
    }
}
