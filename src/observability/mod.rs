//! Observability
//!
//! Structured logging for the CLI. Library code only emits `tracing`
//! events; installing a subscriber is left to the binary or the embedder.

pub mod logging;

pub use logging::{LogFormat, LoggingConfig, init_logging};
