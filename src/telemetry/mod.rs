// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry, tracing, and metrics infrastructure.
//!
//! - **Tracing**: structured logging through `tracing`, initialized once by
//!   [`init_telemetry`]
//! - **Metrics**: per-operation latency, per-tool success rates and a tally of
//!   completion outcomes in [`GLOBAL_METRICS`]
//!
//! Metric recording is compiled in only with the `telemetry` feature (on by
//! default); log macros are always available and filtered at runtime.

mod init;
pub mod metrics;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
pub use metrics::{
    CompletionOutcome, Histogram, Metrics, MetricsSnapshot, OperationMetrics, ToolMetrics,
    GLOBAL_METRICS,
};
