//! Shared utilities for coinbot
//!
//! This crate provides the ambient pieces used across the workspace:
//! tracing subscriber setup and a generic retry-with-backoff decorator.

pub mod logging;
pub mod retry;

pub use logging::{LogFormat, init_tracing, init_tracing_with};
pub use retry::{RetryPolicy, Retryable};
