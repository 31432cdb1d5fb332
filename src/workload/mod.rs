//! Sources of work items
//!
//! Work items are built outside the engine from payroll and withdrawal data:
//! - `payroll` - employee categories, net monthly pay, one credit per employee
//! - `withdrawals` - per-account withdrawal requests, one debit per payee

pub mod payroll;
pub mod withdrawals;

pub use payroll::{payroll_items, Employee, EmploymentCategory, TaxDeduction};
pub use withdrawals::{withdrawal_items, WithdrawalRequests};

use crate::types::AccountId;

/// Anyone money can be moved for: a name and the account it lands in
pub trait Payee {
    fn name(&self) -> &str;

    /// The payee's account; empty if none is on file
    fn account(&self) -> &AccountId;
}
