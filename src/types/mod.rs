//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: the guarded account ledger entry and its identifier
//! - `operation`: work items and the results they produce
//! - `error`: per-operation and fatal error types

pub mod account;
pub mod error;
pub mod operation;

pub use account::{Account, AccountId, AccountSnapshot};
pub use error::{OperationError, SettlementError};
pub use operation::{OperationKind, OperationResult, Sequence, WorkItem};
