//! # aw-observability
//!
//! Logging and metrics infrastructure for Asset Warden.
//!
//! This crate provides structured logging with tracing and compliance
//! metrics collection over sweep reports.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
pub use metrics::{ComplianceKpis, SweepMetricsCollector};
