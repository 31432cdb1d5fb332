//! Core settlement engine
//!
//! This module contains the concurrent processing components:
//! - `ledger` - Identifier-keyed index of guarded accounts
//! - `limiter` - Counting admission gate bounding in-flight units
//! - `dispatcher` - One task per work item, results onto a shared channel
//! - `collector` - Single consumer aggregating results into a report

pub mod collector;
pub mod dispatcher;
pub mod ledger;
pub mod limiter;

pub use collector::{FailureLine, ReportLine, SettlementCollector, SettlementReport, SuccessLine};
pub use dispatcher::{DispatchHandle, Dispatcher};
pub use ledger::Ledger;
pub use limiter::{ConcurrencyLimiter, SlotGuard};
