//! Task dispatcher
//!
//! Fans a sequence of work items out into one tokio task each. Every task:
//!
//! 1. resolves its account in the ledger (an unknown account fails at once
//!    with `MissingAccount`, without taking a limiter slot),
//! 2. checks that the item carries an amount (`NoMatchingRequest` otherwise,
//!    again without a slot),
//! 3. waits for a limiter slot, applies the credit or debit under the
//!    account's guard, holds the slot for the configured unit latency (zero
//!    by default) and releases it,
//! 4. sends exactly one [`OperationResult`] on the shared result channel.
//!
//! # Completion
//!
//! Each task owns a clone of the result sender and the dispatcher keeps none,
//! so the channel closes exactly when the last task has sent its result. The
//! collector's receive loop ends on that closure; there is no polling and no
//! timeout.
//!
//! ```text
//! dispatch(items)
//!     ├── task 0 ──┐
//!     ├── task 1 ──┼──> mpsc ──> Collector
//!     └── task n ──┘   (closed when every sender is dropped)
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::ledger::Ledger;
use super::limiter::ConcurrencyLimiter;
use crate::types::{OperationError, OperationKind, OperationResult, Sequence, WorkItem};

/// Launches units of work against a shared ledger under a concurrency cap
#[derive(Debug, Clone)]
pub struct Dispatcher {
    ledger: Arc<Ledger>,
    limiter: ConcurrencyLimiter,

    /// Time a unit keeps its slot after applying its operation
    unit_latency: Duration,
}

/// Receiving side of one dispatch
///
/// `results` yields one result per dispatched item and then closes.
#[derive(Debug)]
pub struct DispatchHandle {
    pub results: mpsc::UnboundedReceiver<OperationResult>,
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(ledger: Arc<Ledger>, limiter: ConcurrencyLimiter) -> Self {
        Self {
            ledger,
            limiter,
            unit_latency: Duration::ZERO,
        }
    }

    /// Keep each slot for `latency` after the operation is applied, modelling
    /// downstream processing such as a bank confirmation
    pub fn with_unit_latency(mut self, latency: Duration) -> Self {
        self.unit_latency = latency;
        self
    }

    pub fn unit_latency(&self) -> Duration {
        self.unit_latency
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Spawn one unit of work per item
    ///
    /// Items are numbered in submission order. All tasks are spawned before
    /// this returns; none is awaited. Must be called from within a tokio
    /// runtime.
    pub fn dispatch(&self, items: Vec<WorkItem>) -> DispatchHandle {
        let (sender, results) = mpsc::unbounded_channel();

        let tasks = items
            .into_iter()
            .enumerate()
            .map(|(sequence, item)| {
                let dispatcher = self.clone();
                let sender = sender.clone();
                tokio::spawn(async move {
                    let result = dispatcher.run_unit(sequence, item).await;
                    // The collector only goes away if the caller dropped the
                    // handle; the result has nowhere to go in that case.
                    if sender.send(result).is_err() {
                        tracing::debug!(sequence, "result receiver dropped");
                    }
                })
            })
            .collect();

        DispatchHandle { results, tasks }
    }

    /// Execute a single work item and describe the outcome
    pub async fn run_unit(&self, sequence: Sequence, item: WorkItem) -> OperationResult {
        let Some(account) = self.ledger.get(&item.account) else {
            let error = OperationError::missing_account(&item.account);
            return OperationResult::rejected(sequence, item, error);
        };

        let Some(amount) = item.amount else {
            let error = OperationError::no_matching_request(&item.account);
            return OperationResult::rejected(sequence, item, error);
        };

        let slot = self.limiter.acquire().await;
        let started = Instant::now();
        let outcome = match item.kind {
            OperationKind::Credit => account.credit(amount),
            OperationKind::Debit => account.debit(amount),
        };
        if !self.unit_latency.is_zero() {
            tokio::time::sleep(self.unit_latency).await;
        }
        let elapsed = started.elapsed();
        drop(slot);

        match &outcome {
            Ok(balance) => tracing::debug!(
                sequence,
                subject = %item.subject,
                account = %item.account,
                kind = item.kind.as_str(),
                %amount,
                %balance,
                "operation applied"
            ),
            Err(error) => tracing::warn!(
                sequence,
                subject = %item.subject,
                account = %item.account,
                kind = item.kind.as_str(),
                %amount,
                reason = error.kind(),
                "operation rejected"
            ),
        }

        OperationResult {
            sequence,
            subject: item.subject,
            account: item.account,
            kind: item.kind,
            amount,
            outcome,
            elapsed,
        }
    }
}

impl DispatchHandle {
    /// Number of units launched by this dispatch
    pub fn launched(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every task to finish and count the ones that panicked
    ///
    /// Call after the result channel has been drained. A panicked unit sends
    /// no result, so a non-zero return means the report is short by that many
    /// lines.
    pub async fn join(self) -> usize {
        let mut panicked = 0;
        for outcome in join_all(self.tasks).await {
            if let Err(e) = outcome {
                tracing::error!(error = %e, "unit of work panicked");
                panicked += 1;
            }
        }
        panicked
    }
}
