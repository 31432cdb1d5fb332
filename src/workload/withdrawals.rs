//! Withdrawal work items
//!
//! Withdrawal requests are keyed by account: at most one pending amount per
//! account per run. Every payee produces one debit; the amount is whatever is
//! requested for the payee's account, and a payee whose account has no
//! request still produces an item, which settles as `NoMatchingRequest`.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::Payee;
use crate::types::{AccountId, WorkItem};

/// Requested withdrawal amount per account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithdrawalRequests {
    by_account: HashMap<AccountId, Decimal>,
}

impl WithdrawalRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request, returning the amount it replaces if the account
    /// already had one
    pub fn insert(&mut self, account: AccountId, amount: Decimal) -> Option<Decimal> {
        self.by_account.insert(account, amount)
    }

    pub fn get(&self, account: &AccountId) -> Option<Decimal> {
        self.by_account.get(account).copied()
    }

    pub fn len(&self) -> usize {
        self.by_account.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }
}

impl FromIterator<(AccountId, Decimal)> for WithdrawalRequests {
    fn from_iter<I: IntoIterator<Item = (AccountId, Decimal)>>(iter: I) -> Self {
        WithdrawalRequests {
            by_account: iter.into_iter().collect(),
        }
    }
}

/// One debit per payee, sized by the request for the payee's account
///
/// Payees sharing an account each get their own debit of the same requested
/// amount; those debits race under the account's guard like any others.
pub fn withdrawal_items<P: Payee>(payees: &[P], requests: &WithdrawalRequests) -> Vec<WorkItem> {
    payees
        .iter()
        .map(|payee| match requests.get(payee.account()) {
            Some(amount) => WorkItem::debit(payee.name(), payee.account().clone(), amount),
            None => WorkItem::unmatched_debit(payee.name(), payee.account().clone()),
        })
        .collect()
}
