// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Metrics collection for performance monitoring.
//!
//! Lightweight, in-process counters for an interactive CLI: per-operation
//! latency histograms, per-tool success rates, and a tally of tab-completion
//! outcomes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// Global metrics instance.
pub static GLOBAL_METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

/// Kind of result produced by one tab press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    NoMatches,
    SingleMatch,
    CommonPrefix,
    ShowAll,
}

/// Central metrics collection.
#[derive(Debug)]
pub struct Metrics {
    tools: RwLock<HashMap<String, ToolMetrics>>,
    operations: RwLock<HashMap<String, OperationMetrics>>,
    completions: CompletionCounters,
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            operations: RwLock::new(HashMap::new()),
            completions: CompletionCounters::default(),
            start_time: Instant::now(),
        }
    }

    /// Record a tool execution.
    pub fn record_tool(&self, name: &str, duration: Duration, success: bool) {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        tools
            .entry(name.to_string())
            .or_insert_with(ToolMetrics::new)
            .record(duration, success);
    }

    /// Record a generic operation.
    pub fn record_operation(&self, name: &str, duration: Duration) {
        let mut ops = self.operations.write().unwrap_or_else(PoisonError::into_inner);
        ops.entry(name.to_string())
            .or_insert_with(OperationMetrics::new)
            .record(duration);
    }

    /// Count one tab-completion outcome.
    pub fn record_completion(&self, outcome: CompletionOutcome) {
        self.completions.counter(outcome).fetch_add(1, Ordering::Relaxed);
    }

    /// Get metrics for a specific tool.
    pub fn tool_metrics(&self, name: &str) -> Option<ToolMetrics> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Get metrics for a specific operation.
    pub fn operation_metrics(&self, name: &str) -> Option<OperationMetrics> {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Number of tab presses that ended with `outcome`.
    pub fn completion_count(&self, outcome: CompletionOutcome) -> u64 {
        self.completions.counter(outcome).load(Ordering::Relaxed)
    }

    /// Get uptime since metrics were initialized.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Take a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        let operations = self.operations.read().unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            tools: tools.clone(),
            operations: operations.clone(),
            completions: [
                CompletionOutcome::NoMatches,
                CompletionOutcome::SingleMatch,
                CompletionOutcome::CommonPrefix,
                CompletionOutcome::ShowAll,
            ]
            .map(|outcome| (outcome, self.completion_count(outcome))),
            uptime: self.uptime(),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.tools.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.operations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.completions.reset();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics for a specific tool.
#[derive(Debug, Clone)]
pub struct ToolMetrics {
    pub invocations: u64,
    pub successes: u64,
    pub failures: u64,
    pub total_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
}

impl ToolMetrics {
    /// Create new empty tool metrics.
    pub fn new() -> Self {
        Self {
            invocations: 0,
            successes: 0,
            failures: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
        }
    }

    /// Record a tool execution.
    pub fn record(&mut self, duration: Duration, success: bool) {
        self.invocations += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
    }

    /// Calculate average execution time.
    pub fn avg_duration(&self) -> Duration {
        if self.invocations == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.invocations as u32
        }
    }

    /// Calculate success rate (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.invocations == 0 {
            1.0
        } else {
            self.successes as f64 / self.invocations as f64
        }
    }
}

impl Default for ToolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic operation metrics with histogram.
#[derive(Debug, Clone)]
pub struct OperationMetrics {
    pub count: u64,
    pub total_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub histogram: Histogram,
}

impl OperationMetrics {
    /// Create new operation metrics.
    pub fn new() -> Self {
        Self {
            count: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            histogram: Histogram::default(),
        }
    }

    /// Record an operation.
    pub fn record(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    /// Calculate average duration.
    pub fn avg_duration(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.count as u32
        }
    }
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple histogram with fixed buckets for latency tracking.
///
/// Completion runs on the keystroke path, so the default buckets are finer
/// than a network client would need: 10us, 100us, 1ms, 10ms, 100ms, 1s, +inf.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Bucket boundaries in microseconds.
    buckets: Vec<u64>,
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram with custom bucket boundaries (in microseconds).
    pub fn with_buckets(buckets: Vec<u64>) -> Self {
        let counts = vec![0; buckets.len() + 1];
        Self { buckets, counts }
    }

    /// Record a duration value.
    pub fn record(&mut self, duration: Duration) {
        let micros = duration.as_micros() as u64;
        let bucket_idx = self
            .buckets
            .iter()
            .position(|&b| micros <= b)
            .unwrap_or(self.buckets.len());
        self.counts[bucket_idx] += 1;
    }

    /// Get counts for each bucket.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Get bucket boundaries.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Calculate approximate percentile (p50, p90, p99, etc.).
    pub fn percentile(&self, p: f64) -> Duration {
        let total: u64 = self.counts.iter().sum();
        if total == 0 {
            return Duration::ZERO;
        }

        let target = (total as f64 * p / 100.0).ceil() as u64;
        let mut cumulative = 0u64;

        for (i, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                // Overflow bucket reports ten times the last boundary
                let micros = if i < self.buckets.len() {
                    self.buckets[i]
                } else {
                    self.buckets.last().copied().unwrap_or(0) * 10
                };
                return Duration::from_micros(micros);
            }
        }

        Duration::ZERO
    }

    /// Get p50 (median) latency.
    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    /// Get p99 latency.
    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_buckets(vec![10, 100, 1_000, 10_000, 100_000, 1_000_000])
    }
}

#[derive(Debug, Default)]
struct CompletionCounters {
    no_matches: AtomicU64,
    single_match: AtomicU64,
    common_prefix: AtomicU64,
    show_all: AtomicU64,
}

impl CompletionCounters {
    fn counter(&self, outcome: CompletionOutcome) -> &AtomicU64 {
        match outcome {
            CompletionOutcome::NoMatches => &self.no_matches,
            CompletionOutcome::SingleMatch => &self.single_match,
            CompletionOutcome::CommonPrefix => &self.common_prefix,
            CompletionOutcome::ShowAll => &self.show_all,
        }
    }

    fn reset(&self) {
        self.no_matches.store(0, Ordering::Relaxed);
        self.single_match.store(0, Ordering::Relaxed);
        self.common_prefix.store(0, Ordering::Relaxed);
        self.show_all.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of all metrics.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub tools: HashMap<String, ToolMetrics>,
    pub operations: HashMap<String, OperationMetrics>,
    pub completions: [(CompletionOutcome, u64); 4],
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Format as a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Metrics Report ===\n\n");
        report.push_str(&format!("Uptime: {:.2?}\n", self.uptime));

        let tally: Vec<String> = self
            .completions
            .iter()
            .map(|(outcome, count)| format!("{:?}={}", outcome, count))
            .collect();
        report.push_str(&format!("Completions: {}\n\n", tally.join(", ")));

        if !self.tools.is_empty() {
            let mut names: Vec<_> = self.tools.keys().collect();
            names.sort();
            report.push_str("Tool Metrics:\n");
            for name in names {
                let metrics = &self.tools[name];
                report.push_str(&format!(
                    "  {}: {} calls, {:.1}% success, avg {:.2?}\n",
                    name,
                    metrics.invocations,
                    metrics.success_rate() * 100.0,
                    metrics.avg_duration()
                ));
            }
            report.push('\n');
        }

        if !self.operations.is_empty() {
            let mut names: Vec<_> = self.operations.keys().collect();
            names.sort();
            report.push_str("Operation Metrics:\n");
            for name in names {
                let metrics = &self.operations[name];
                report.push_str(&format!(
                    "  {}: {} ops, avg {:.2?}, p99 {:.2?}\n",
                    name,
                    metrics.count,
                    metrics.avg_duration(),
                    metrics.histogram.p99()
                ));
            }
        }

        report
    }
}

/// Convenience function to record a tool execution to global metrics.
pub fn record_tool(name: &str, duration: Duration, success: bool) {
    GLOBAL_METRICS.record_tool(name, duration, success);
}

/// Convenience function to record an operation to global metrics.
pub fn record_operation(name: &str, duration: Duration) {
    GLOBAL_METRICS.record_operation(name, duration);
}

/// Convenience function to count a completion outcome in global metrics.
pub fn record_completion(outcome: CompletionOutcome) {
    GLOBAL_METRICS.record_completion(outcome);
}
