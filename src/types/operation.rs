//! Work items and operation results
//!
//! A [`WorkItem`] is one requested credit or debit against one account. The
//! dispatcher turns each item into exactly one [`OperationResult`].

use std::time::Duration;

use rust_decimal::Decimal;

use super::account::AccountId;
use super::error::OperationError;

/// Submission sequence number assigned by the dispatcher
///
/// Results are ordered by this number in the final report, which makes the
/// report independent of completion order.
pub type Sequence = usize;

/// Direction of a ledger operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Payroll payment into an account
    Credit,

    /// Withdrawal out of an account
    Debit,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Credit => "credit",
            OperationKind::Debit => "debit",
        }
    }
}

/// One requested money movement
///
/// `amount` is `None` when the source of the item had no amount to supply
/// (a withdrawal with no matching request). Such an item is still dispatched
/// and produces a `NoMatchingRequest` failure.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    /// Who the movement is for (payee name)
    pub subject: String,

    /// Target account; an empty id never resolves
    pub account: AccountId,

    pub kind: OperationKind,

    pub amount: Option<Decimal>,
}

impl WorkItem {
    pub fn credit(subject: impl Into<String>, account: impl Into<AccountId>, amount: Decimal) -> Self {
        WorkItem {
            subject: subject.into(),
            account: account.into(),
            kind: OperationKind::Credit,
            amount: Some(amount),
        }
    }

    pub fn debit(subject: impl Into<String>, account: impl Into<AccountId>, amount: Decimal) -> Self {
        WorkItem {
            subject: subject.into(),
            account: account.into(),
            kind: OperationKind::Debit,
            amount: Some(amount),
        }
    }

    /// A debit whose amount could not be determined
    pub fn unmatched_debit(subject: impl Into<String>, account: impl Into<AccountId>) -> Self {
        WorkItem {
            subject: subject.into(),
            account: account.into(),
            kind: OperationKind::Debit,
            amount: None,
        }
    }
}

/// Immutable record of how one work item ended
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    pub sequence: Sequence,
    pub subject: String,
    pub account: AccountId,
    pub kind: OperationKind,

    /// Requested amount; zero when the item carried none
    pub amount: Decimal,

    /// New balance on success, failure reason otherwise
    pub outcome: Result<Decimal, OperationError>,

    /// Time spent holding a limiter slot (zero for items that never acquired one)
    pub elapsed: Duration,
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Build a failed result for an item rejected before it reached the ledger
    pub(crate) fn rejected(sequence: Sequence, item: WorkItem, error: OperationError) -> Self {
        OperationResult {
            sequence,
            subject: item.subject,
            account: item.account,
            kind: item.kind,
            amount: item.amount.unwrap_or(Decimal::ZERO),
            outcome: Err(error),
            elapsed: Duration::ZERO,
        }
    }
}
