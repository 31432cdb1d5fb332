//! Payroll Settlement Engine Library
//! # Overview
//!
//! This library applies batches of credits and debits to a shared ledger of
//! accounts concurrently, with a bounded number of operations in flight, and
//! reports the outcome of every operation.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, WorkItem, OperationResult, errors)
//! - [`core`] - The settlement engine:
//!   - [`core::ledger`] - Registry of guarded accounts
//!   - [`core::limiter`] - Bound on operations in flight
//!   - [`core::dispatcher`] - One task per work item
//!   - [`core::collector`] - Result aggregation into a settlement report
//! - [`settlement`] - A single settlement run
//! - [`workload`] - Payroll credits and withdrawal debits
//! - [`io`] - CSV input loading
//! - [`render`] - Report and balance output
//! - [`cli`], [`app`], [`logging`] - The command-line front end
//!
//! # Guarantees
//!
//! - Every submitted work item yields exactly one report line.
//! - Operations on the same account are serialized; no balance goes negative.
//! - At most the configured number of operations hold a slot at once.
//! - Final balances equal opening balances plus successful credits minus
//!   successful debits, whatever order operations completed in.

// Module declarations
pub mod app;
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod render;
pub mod settlement;
pub mod types;
pub mod workload;

pub use core::{ConcurrencyLimiter, Dispatcher, Ledger, SettlementCollector, SettlementReport};
pub use settlement::{settle, settle_with, RunConfig};
pub use types::{
    Account, AccountId, AccountSnapshot, OperationError, OperationKind, OperationResult,
    SettlementError, WorkItem,
};
