//! Settlement runs
//!
//! A settlement run applies one batch of work items (a payroll, a set of
//! withdrawals) to the ledger under a fresh concurrency limiter and returns
//! the closing report.
//!
//! # Architecture
//!
//! ```text
//! settle(ledger, items, config)
//!     ├── RunConfig           (validated concurrency limit, unit latency)
//!     ├── ConcurrencyLimiter  (created per run, dropped after)
//!     ├── Dispatcher          (one task per item)
//!     └── SettlementCollector (single consumer of the result channel)
//! ```
//!
//! Configuration is validated before anything is spawned: a rejected limit
//! means no unit runs and no account changes.

use std::sync::Arc;
use std::time::Duration;

use crate::core::{ConcurrencyLimiter, Dispatcher, Ledger, SettlementCollector, SettlementReport};
use crate::types::{SettlementError, WorkItem};

/// Configuration for one settlement run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of units holding a limiter slot at once
    max_concurrent: usize,

    /// Time each unit keeps its slot after applying its operation
    unit_latency: Duration,
}

impl RunConfig {
    /// Create a RunConfig with a custom concurrency limit and no unit latency
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::InvalidConcurrencyLimit` if `max_concurrent` is zero.
    pub fn new(max_concurrent: usize) -> Result<Self, SettlementError> {
        if max_concurrent == 0 {
            return Err(SettlementError::invalid_concurrency_limit(max_concurrent));
        }

        Ok(Self {
            max_concurrent,
            unit_latency: Duration::ZERO,
        })
    }

    pub fn with_unit_latency(mut self, latency: Duration) -> Self {
        self.unit_latency = latency;
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn unit_latency(&self) -> Duration {
        self.unit_latency
    }
}

/// Apply `items` to `ledger` and report the outcome
///
/// Every item produces exactly one report line. Per-item failures are
/// classified in the report; only configuration errors are returned.
/// Must be called from within a tokio runtime.
pub async fn settle(
    ledger: Arc<Ledger>,
    items: Vec<WorkItem>,
    config: &RunConfig,
) -> Result<SettlementReport, SettlementError> {
    let limiter = ConcurrencyLimiter::new(config.max_concurrent)?;
    let dispatcher = Dispatcher::new(ledger, limiter).with_unit_latency(config.unit_latency);
    Ok(settle_with(dispatcher, items).await)
}

/// Like [`settle`] but with a caller-built dispatcher
///
/// The limiter is shared with any clone the caller kept, so its counters can
/// be inspected after the run.
pub async fn settle_with(dispatcher: Dispatcher, items: Vec<WorkItem>) -> SettlementReport {
    let submitted = items.len();
    let limiter = dispatcher.limiter().clone();
    tracing::info!(submitted, limit = limiter.limit(), "settlement run started");

    let mut handle = dispatcher.dispatch(items);

    let mut collector = SettlementCollector::new();
    collector.consume(&mut handle.results).await;
    let panicked = handle.join().await;

    let report = collector.finish();
    if panicked > 0 {
        tracing::error!(panicked, submitted, "settlement run lost results");
    }
    tracing::info!(
        processed = report.processed,
        succeeded = report.succeeded,
        failed = report.failed,
        total = %report.total_applied,
        peak_in_flight = limiter.peak_in_flight(),
        "settlement run finished"
    );

    report
}
