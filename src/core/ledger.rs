//! Thread-safe account ledger
//!
//! The `Ledger` is the identifier-keyed index of accounts shared by every unit
//! of work in a run. The index itself uses `DashMap` so lookups from many tasks
//! do not contend on a global lock; each account then carries its own guard
//! for balance access (see [`crate::types::Account`]).
//!
//! Accounts are handed out as `Arc<Account>`, so a unit of work holds no map
//! lock while it waits for the account's guard.

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::types::{Account, AccountId, AccountSnapshot, SettlementError};

/// Collection of accounts and their balances
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: DashMap<AccountId, Arc<Account>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Register a new account
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Account>)` handle to the newly opened account
    /// * `Err(SettlementError::NegativeOpeningBalance)` if `opening_balance < 0`
    /// * `Err(SettlementError::DuplicateAccount)` if `id` is already registered;
    ///   the existing account is left untouched
    pub fn open(
        &self,
        id: AccountId,
        owner: impl Into<String>,
        opening_balance: Decimal,
    ) -> Result<Arc<Account>, SettlementError> {
        if opening_balance < Decimal::ZERO {
            return Err(SettlementError::NegativeOpeningBalance {
                account: id,
                balance: opening_balance,
            });
        }

        let mut opened = false;
        let account = self
            .accounts
            .entry(id.clone())
            .or_insert_with(|| {
                opened = true;
                Arc::new(Account::new(id.clone(), owner, opening_balance))
            })
            .value()
            .clone();

        if !opened {
            return Err(SettlementError::duplicate_account(&id));
        }

        Ok(account)
    }

    /// Resolve an account by identifier
    pub fn get(&self, id: &AccountId) -> Option<Arc<Account>> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Snapshot of every account, sorted by identifier
    ///
    /// Each account is read under its own guard; the collection as a whole is
    /// not a single atomic cut, so callers take it once a run has finished.
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        let mut snapshots: Vec<AccountSnapshot> = self
            .accounts
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    /// `(id, balance)` pairs sorted by identifier
    pub fn balances(&self) -> Vec<(AccountId, Decimal)> {
        self.snapshots()
            .into_iter()
            .map(|snapshot| (snapshot.id, snapshot.balance))
            .collect()
    }
}
