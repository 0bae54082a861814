//! Instrument types held by the registry.
//!
//! Gauges and counters are single atomics. The EWMA rate keeps a decaying
//! estimate behind a small mutex; updates are O(1) and never block on I/O.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Signed gauge updated by relative deltas (`+1` on enter, `-1` on leave).
#[derive(Debug, Default)]
pub struct RelativeGauge {
    value: AtomicI64,
}

impl RelativeGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary signed delta.
    pub fn update(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Increment now and decrement when the returned guard is dropped.
    ///
    /// The guard fires on every exit path of the owning scope, including
    /// early returns and unwinding.
    pub fn track(self: &Arc<Self>) -> GaugeGuard {
        self.update(1);
        GaugeGuard {
            gauge: Arc::clone(self),
        }
    }
}

/// Scoped decrement for a [`RelativeGauge`].
#[must_use = "dropping the guard immediately undoes the increment"]
#[derive(Debug)]
pub struct GaugeGuard {
    gauge: Arc<RelativeGauge>,
}

impl Drop for GaugeGuard {
    fn drop(&mut self) {
        self.gauge.update(-1);
    }
}

/// Monotonic event counter.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by an arbitrary value.
    pub fn update(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Exponentially-weighted moving average of events per second.
///
/// Each event adds `1/window` to the estimate, and the estimate decays by
/// `exp(-dt/window)` between observations. The time-integral of the rate
/// therefore equals the number of events, so over long spans the average
/// converges to `events / elapsed`. With no updates the rate trends to zero.
#[derive(Debug)]
pub struct EwmaRate {
    window: Duration,
    state: Mutex<EwmaState>,
}

#[derive(Debug)]
struct EwmaState {
    rate: f64,
    last: Instant,
}

impl EwmaState {
    fn decayed(&self, now: Instant, window: f64) -> f64 {
        let dt = now.saturating_duration_since(self.last).as_secs_f64();
        self.rate * (-dt / window).exp()
    }
}

impl EwmaRate {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(Duration::from_millis(1)),
            state: Mutex::new(EwmaState {
                rate: 0.0,
                last: Instant::now(),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record `events` occurring now.
    pub fn update(&self, events: u64) {
        self.update_at(events, Instant::now());
    }

    /// Current events-per-second estimate.
    pub fn rate(&self) -> f64 {
        self.rate_at(Instant::now())
    }

    pub(crate) fn update_at(&self, events: u64, now: Instant) {
        let window = self.window.as_secs_f64();
        let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.rate = st.decayed(now, window) + events as f64 / window;
        if now > st.last {
            st.last = now;
        }
    }

    pub(crate) fn rate_at(&self, now: Instant) -> f64 {
        let st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.decayed(now, self.window.as_secs_f64())
    }
}
