//! Diagnostic request handlers.
//!
//! - `slow` : hold a response open for a given duration, streaming keep-alive bytes
//! - `post` : drain a request body, optionally paced, and report its size

pub mod post;
pub mod slow;
