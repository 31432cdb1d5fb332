//! Account ledger entry
//!
//! An [`Account`] is a single balance cell guarded by its own mutex. Every read
//! and every mutation of the balance happens while that guard is held, so
//! concurrent credits and debits against the same account are serialized and
//! no reader ever observes a half-applied update.
//!
//! Operations touch exactly one account each, so there is no lock ordering to
//! respect and no deadlock between accounts is possible.

use std::fmt;

use parking_lot::Mutex;
use rust_decimal::Decimal;

use super::error::OperationError;

/// Account identifier (e.g. `ACC-001`)
///
/// Immutable once an account is opened. An empty identifier never resolves,
/// which is how a payee without a bank account is represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("N/A")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        AccountId(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        AccountId(id)
    }
}

/// Shared, mutable account
///
/// The identifier and owner are fixed at creation; only the balance changes,
/// and only under `balance`'s guard. The balance is never negative.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    owner: String,
    balance: Mutex<Decimal>,
}

/// Point-in-time copy of an account, taken under its guard
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub owner: String,
    pub balance: Decimal,
}

impl Account {
    /// Create an account holding `opening_balance`
    ///
    /// Callers are expected to have validated that the opening balance is not
    /// negative; the ledger does so in [`crate::core::Ledger::open`].
    pub fn new(id: AccountId, owner: impl Into<String>, opening_balance: Decimal) -> Self {
        Account {
            id,
            owner: owner.into(),
            balance: Mutex::new(opening_balance),
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Increase the balance by `amount`
    ///
    /// # Returns
    ///
    /// * `Ok(new_balance)` once the credit is applied
    /// * `Err(OperationError::InvalidAmount)` if `amount` is negative
    /// * `Err(OperationError::Overflow)` if the new balance is not representable
    ///
    /// On error the balance is left untouched.
    pub fn credit(&self, amount: Decimal) -> Result<Decimal, OperationError> {
        let mut balance = self.balance.lock();
        if amount < Decimal::ZERO {
            return Err(OperationError::invalid_amount(&self.id, amount));
        }

        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| OperationError::overflow(&self.id, *balance, amount))?;
        Ok(*balance)
    }

    /// Decrease the balance by `amount`
    ///
    /// The sufficiency check and the subtraction happen under the same guard
    /// acquisition, so two racing debits can never both pass the check
    /// against the same balance.
    ///
    /// # Returns
    ///
    /// * `Ok(new_balance)` once the debit is applied
    /// * `Err(OperationError::InvalidAmount)` if `amount` is negative
    /// * `Err(OperationError::InsufficientFunds)` if `amount` exceeds the balance
    pub fn debit(&self, amount: Decimal) -> Result<Decimal, OperationError> {
        let mut balance = self.balance.lock();
        if amount < Decimal::ZERO {
            return Err(OperationError::invalid_amount(&self.id, amount));
        }
        if amount > *balance {
            return Err(OperationError::insufficient_funds(&self.id, *balance, amount));
        }

        *balance -= amount;
        Ok(*balance)
    }

    /// Current balance, read under the guard
    pub fn balance(&self) -> Decimal {
        *self.balance.lock()
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            owner: self.owner.clone(),
            balance: self.balance(),
        }
    }
}
