//! # abidecode-observability
//!
//! Structured logging for abidecode.
//!
//! The decoding crates only emit `tracing` events; this crate installs the
//! subscriber. JSON output is compatible with ELK, Loki, CloudWatch.
//! Log levels configurable per component.

pub mod tracing_setup;

pub use tracing_setup::{directives, env_filter, init_tracing, LogConfig};
