//! Per-request context derived from headers and the connection.

pub mod client;
