//! Connection-level instruments registered by the web backend.

pub mod metrics;
