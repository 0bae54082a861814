//! httpdummy core: transport-agnostic primitives shared by the web surface.
//!
//! This crate defines the error surface, the human duration grammar used by
//! the `/slow` and `/post` routes, and the process-wide metrics registry. It
//! carries no HTTP or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed durations and duplicate registrations surface as
//! `HttpDummyError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod duration;
pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{Result, HttpDummyError};
pub use duration::{pacing_interval, DurationError, Interval};
