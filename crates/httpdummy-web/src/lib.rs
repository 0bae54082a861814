//! httpdummy web library entry.
//!
//! This crate wires config, router, middleware and the diagnostic handlers
//! into a runnable backend. It is consumed by the binary (`main.rs`) and by
//! integration tests, which drive [`router::build_router`] in-process.

pub mod app_state;
pub mod assets;
pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod obs;
pub mod ops;
pub mod pages;
pub mod rlimit;
pub mod router;
pub mod stream;
pub mod templates;

pub use backend::WebBackend;
