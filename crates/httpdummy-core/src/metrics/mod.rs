//! Process-wide metrics registry.
//!
//! Instruments are registered once by unique name and shared as `Arc`s with
//! whichever handlers update them. The registry renders a sorted
//! `<name> <value>` text dump for the scrape endpoint and a serializable
//! snapshot for JSON consumers.

pub mod instruments;
pub mod status;

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use crate::error::{HttpDummyError, Result};

pub use instruments::{Counter, EwmaRate, GaugeGuard, RelativeGauge};
pub use status::{HealthStatus, State};

/// Kind requested at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Gauge,
    Counter,
    EwmaRate(Duration),
}

/// A registered instrument.
#[derive(Debug, Clone)]
pub enum Instrument {
    Gauge(Arc<RelativeGauge>),
    Counter(Arc<Counter>),
    EwmaRate(Arc<EwmaRate>),
}

impl Instrument {
    fn new(kind: InstrumentKind) -> Self {
        match kind {
            InstrumentKind::Gauge => Instrument::Gauge(Arc::new(RelativeGauge::new())),
            InstrumentKind::Counter => Instrument::Counter(Arc::new(Counter::new())),
            InstrumentKind::EwmaRate(window) => Instrument::EwmaRate(Arc::new(EwmaRate::new(window))),
        }
    }

    pub fn value(&self) -> MetricValue {
        match self {
            Instrument::Gauge(g) => MetricValue::Gauge(g.value()),
            Instrument::Counter(c) => MetricValue::Counter(c.value()),
            Instrument::EwmaRate(r) => MetricValue::Rate(r.rate()),
        }
    }
}

/// Point-in-time reading of one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Gauge(i64),
    Counter(u64),
    Rate(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Gauge(v) => write!(f, "{v}"),
            MetricValue::Counter(v) => write!(f, "{v}"),
            MetricValue::Rate(v) => write!(f, "{v:.3}"),
        }
    }
}

/// Serializable view of status plus every instrument.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub status: State,
    pub message: String,
    pub metrics: BTreeMap<String, MetricValue>,
}

#[derive(Debug, Default)]
pub struct Registry {
    instruments: DashMap<String, Instrument>,
    status: HealthStatus,
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> Arc<Registry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Registry::new())))
    }

    /// Register a new instrument. Names are unique; a second registration
    /// under the same name fails with `DuplicateMetric`.
    pub fn register(&self, name: &str, kind: InstrumentKind) -> Result<Instrument> {
        match self.instruments.entry(name.to_string()) {
            Entry::Occupied(_) => Err(HttpDummyError::DuplicateMetric(name.to_string())),
            Entry::Vacant(slot) => {
                let inst = Instrument::new(kind);
                slot.insert(inst.clone());
                tracing::debug!(metric = %name, ?kind, "metric registered");
                Ok(inst)
            }
        }
    }

    pub fn gauge(&self, name: &str) -> Result<Arc<RelativeGauge>> {
        match self.register(name, InstrumentKind::Gauge)? {
            Instrument::Gauge(g) => Ok(g),
            _ => Err(HttpDummyError::Internal(format!("{name}: expected gauge"))),
        }
    }

    pub fn counter(&self, name: &str) -> Result<Arc<Counter>> {
        match self.register(name, InstrumentKind::Counter)? {
            Instrument::Counter(c) => Ok(c),
            _ => Err(HttpDummyError::Internal(format!("{name}: expected counter"))),
        }
    }

    pub fn ewma_rate(&self, name: &str, window: Duration) -> Result<Arc<EwmaRate>> {
        match self.register(name, InstrumentKind::EwmaRate(window))? {
            Instrument::EwmaRate(r) => Ok(r),
            _ => Err(HttpDummyError::Internal(format!("{name}: expected rate"))),
        }
    }

    pub fn get(&self, name: &str) -> Option<Instrument> {
        self.instruments.get(name).map(|r| r.value().clone())
    }

    pub fn status(&self) -> &HealthStatus {
        &self.status
    }

    /// Read every instrument, sorted by name.
    pub fn snapshot(&self) -> Snapshot {
        let metrics = self
            .instruments
            .iter()
            .map(|r| (r.key().clone(), r.value().value()))
            .collect();
        Snapshot {
            status: self.status.state(),
            message: self.status.message(),
            metrics,
        }
    }

    /// Render one `<name> <value>` line per instrument, sorted by name.
    pub fn scrape(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.snapshot().metrics {
            let _ = writeln!(out, "{name} {value}");
        }
        out
    }
}
