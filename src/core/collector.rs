//! Result collection and settlement reporting
//!
//! The [`SettlementCollector`] is the single consumer of a dispatch's result
//! channel. Results arrive in completion order, which varies from run to run;
//! the collector classifies each one as it arrives and keeps running totals.
//! [`SettlementCollector::finish`] then orders the lines by submission
//! sequence, so two runs that produced the same set of results produce the
//! same report regardless of arrival order.
//!
//! Because aggregation is a fold over a plain sequence of results, a captured
//! sequence can be replayed through [`SettlementCollector::from_results`]
//! without any runtime or channel.

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::types::{AccountId, OperationError, OperationKind, OperationResult, Sequence};

/// Classification of one result in the report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    Success(SuccessLine),
    Failure(FailureLine),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessLine {
    pub sequence: Sequence,
    pub subject: String,
    pub account: AccountId,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureLine {
    pub sequence: Sequence,
    pub subject: String,
    pub account: AccountId,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub reason: OperationError,
}

impl ReportLine {
    pub fn sequence(&self) -> Sequence {
        match self {
            ReportLine::Success(line) => line.sequence,
            ReportLine::Failure(line) => line.sequence,
        }
    }
}

/// Aggregate outcome of one settlement run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettlementReport {
    /// Number of results received
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Sum of amounts of all successful operations
    pub total_applied: Decimal,

    /// One line per result, ordered by submission sequence
    pub lines: Vec<ReportLine>,
}

impl SettlementReport {
    pub fn successes(&self) -> impl Iterator<Item = &SuccessLine> {
        self.lines.iter().filter_map(|line| match line {
            ReportLine::Success(success) => Some(success),
            ReportLine::Failure(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureLine> {
        self.lines.iter().filter_map(|line| match line {
            ReportLine::Failure(failure) => Some(failure),
            ReportLine::Success(_) => None,
        })
    }
}

/// Incremental builder of a [`SettlementReport`]
#[derive(Debug, Default)]
pub struct SettlementCollector {
    report: SettlementReport,
}

impl SettlementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one result and fold it into the running totals
    pub fn record(&mut self, result: OperationResult) {
        let report = &mut self.report;
        report.processed += 1;

        let line = match result.outcome {
            Ok(balance_after) => {
                report.succeeded += 1;
                report.total_applied = match report.total_applied.checked_add(result.amount) {
                    Some(total) => total,
                    None => {
                        tracing::warn!(sequence = result.sequence, "total applied saturated");
                        Decimal::MAX
                    }
                };
                ReportLine::Success(SuccessLine {
                    sequence: result.sequence,
                    subject: result.subject,
                    account: result.account,
                    kind: result.kind,
                    amount: result.amount,
                    balance_after,
                    elapsed: result.elapsed,
                })
            }
            Err(reason) => {
                report.failed += 1;
                ReportLine::Failure(FailureLine {
                    sequence: result.sequence,
                    subject: result.subject,
                    account: result.account,
                    kind: result.kind,
                    amount: result.amount,
                    reason,
                })
            }
        };

        report.lines.push(line);
    }

    /// Drain `results` until every sender has been dropped
    pub async fn consume(&mut self, results: &mut mpsc::UnboundedReceiver<OperationResult>) {
        while let Some(result) = results.recv().await {
            self.record(result);
        }
    }

    /// Replay an already captured sequence of results
    pub fn from_results(results: impl IntoIterator<Item = OperationResult>) -> Self {
        let mut collector = Self::new();
        for result in results {
            collector.record(result);
        }
        collector
    }

    /// Close the report, ordering lines by submission sequence
    pub fn finish(self) -> SettlementReport {
        let mut report = self.report;
        report.lines.sort_by_key(ReportLine::sequence);
        report
    }
}
