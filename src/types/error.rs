//! Error types for the settlement engine
//!
//! Errors fall into two groups with different propagation rules:
//!
//! - [`OperationError`]: a single work item could not be applied. These are
//!   recovered inside the unit of work and reported as a failed result line;
//!   they never abort sibling operations or the run.
//! - [`SettlementError`]: the run itself cannot start (bad configuration, bad
//!   input files, duplicate accounts). These are fatal and are raised before
//!   any unit of work is launched.

use rust_decimal::Decimal;
use thiserror::Error;

use super::account::AccountId;

/// Failure of a single ledger operation
///
/// Every variant is recoverable at the unit level: the failing work item is
/// classified as a failure in the settlement report and the run continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    /// A negative amount was requested for a credit or debit
    #[error("Invalid amount {amount} for account {account}: amounts must not be negative")]
    InvalidAmount {
        /// Target account
        account: AccountId,
        /// The rejected amount
        amount: Decimal,
    },

    /// A debit exceeds the balance held at the moment the guard was acquired
    ///
    /// The account is left unchanged.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Target account
        account: AccountId,
        /// Balance observed under the guard
        balance: Decimal,
        /// Requested debit
        requested: Decimal,
    },

    /// A credit would push the balance past the largest representable amount
    ///
    /// The account is left unchanged.
    #[error("Arithmetic overflow crediting account {account}: balance {balance}, requested {requested}")]
    Overflow {
        /// Target account
        account: AccountId,
        /// Balance observed under the guard
        balance: Decimal,
        /// Requested credit
        requested: Decimal,
    },

    /// The work item references an account the ledger does not hold
    #[error("Account {account} not found in ledger")]
    MissingAccount {
        /// The unresolved account identifier (empty when the payee had none)
        account: AccountId,
    },

    /// A withdrawal-style item has no amount supplied for its account
    #[error("No withdrawal request for account {account}")]
    NoMatchingRequest {
        /// The account with no pending request
        account: AccountId,
    },
}

impl OperationError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(account: &AccountId, amount: Decimal) -> Self {
        OperationError::InvalidAmount {
            account: account.clone(),
            amount,
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &AccountId, balance: Decimal, requested: Decimal) -> Self {
        OperationError::InsufficientFunds {
            account: account.clone(),
            balance,
            requested,
        }
    }

    /// Create an Overflow error
    pub fn overflow(account: &AccountId, balance: Decimal, requested: Decimal) -> Self {
        OperationError::Overflow {
            account: account.clone(),
            balance,
            requested,
        }
    }

    /// Create a MissingAccount error
    pub fn missing_account(account: &AccountId) -> Self {
        OperationError::MissingAccount {
            account: account.clone(),
        }
    }

    /// Create a NoMatchingRequest error
    pub fn no_matching_request(account: &AccountId) -> Self {
        OperationError::NoMatchingRequest {
            account: account.clone(),
        }
    }

    /// Short machine-friendly name of the failure kind, used in log events
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::InvalidAmount { .. } => "invalid_amount",
            OperationError::InsufficientFunds { .. } => "insufficient_funds",
            OperationError::Overflow { .. } => "overflow",
            OperationError::MissingAccount { .. } => "missing_account",
            OperationError::NoMatchingRequest { .. } => "no_matching_request",
        }
    }
}

/// Fatal error that prevents a settlement run from starting
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The concurrency limit must be a positive integer
    #[error("Invalid concurrency limit {limit}: at least one slot is required")]
    InvalidConcurrencyLimit {
        /// The rejected limit
        limit: usize,
    },

    /// An account identifier was registered twice
    #[error("Duplicate account {account}")]
    DuplicateAccount {
        /// The repeated identifier
        account: AccountId,
    },

    /// An account was opened with a negative balance
    #[error("Account {account} cannot be opened with negative balance {balance}")]
    NegativeOpeningBalance {
        /// Account identifier
        account: AccountId,
        /// The rejected opening balance
        balance: Decimal,
    },

    /// An input file could not be opened or output could not be written
    #[error("I/O error{}: {source}", path.as_ref().map(|p| format!(" on '{}'", p)).unwrap_or_default())]
    Io {
        /// File involved, if known
        path: Option<String>,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A CSV input could not be parsed
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A CSV record parsed but carries values the engine cannot use
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord {
        /// Line number of the record
        line: u64,
        /// What is wrong with it
        message: String,
    },

    /// An employee's pay inputs are too large to compute a monthly amount
    #[error("Monthly pay for {employee} overflows")]
    PayOverflow {
        /// Employee name
        employee: String,
    },

    /// The async runtime could not be built
    #[error("Failed to create tokio runtime: {0}")]
    Runtime(String),
}

impl From<std::io::Error> for SettlementError {
    fn from(source: std::io::Error) -> Self {
        SettlementError::Io { path: None, source }
    }
}

impl From<csv::Error> for SettlementError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettlementError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl SettlementError {
    /// Create an InvalidConcurrencyLimit error
    pub fn invalid_concurrency_limit(limit: usize) -> Self {
        SettlementError::InvalidConcurrencyLimit { limit }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: &AccountId) -> Self {
        SettlementError::DuplicateAccount {
            account: account.clone(),
        }
    }

    /// Create an Io error tagged with the file it concerns
    pub fn io_at(path: &std::path::Path, source: std::io::Error) -> Self {
        SettlementError::Io {
            path: Some(path.display().to_string()),
            source,
        }
    }

    /// Create a PayOverflow error
    pub fn pay_overflow(employee: &str) -> Self {
        SettlementError::PayOverflow {
            employee: employee.to_string(),
        }
    }

    /// Create an InvalidRecord error
    pub fn invalid_record(line: u64, message: impl Into<String>) -> Self {
        SettlementError::InvalidRecord {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn acc(id: &str) -> AccountId {
        AccountId::from(id)
    }

    #[rstest]
    #[case::invalid_amount(
        OperationError::invalid_amount(&acc("ACC-001"), Decimal::new(-500, 2)),
        "Invalid amount -5.00 for account ACC-001: amounts must not be negative"
    )]
    #[case::insufficient_funds(
        OperationError::insufficient_funds(&acc("ACC-006"), Decimal::new(5100, 0), Decimal::new(15000, 0)),
        "Insufficient funds in account ACC-006: balance 5100, requested 15000"
    )]
    #[case::overflow(
        OperationError::overflow(&acc("ACC-001"), Decimal::new(10, 0), Decimal::new(3, 0)),
        "Arithmetic overflow crediting account ACC-001: balance 10, requested 3"
    )]
    #[case::missing_account(
        OperationError::missing_account(&acc("ACC-404")),
        "Account ACC-404 not found in ledger"
    )]
    #[case::no_matching_request(
        OperationError::no_matching_request(&acc("ACC-007")),
        "No withdrawal request for account ACC-007"
    )]
    fn test_operation_error_display(#[case] error: OperationError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_amount(OperationError::invalid_amount(&acc("A"), Decimal::NEGATIVE_ONE), "invalid_amount")]
    #[case::insufficient_funds(OperationError::insufficient_funds(&acc("A"), Decimal::ZERO, Decimal::ONE), "insufficient_funds")]
    #[case::overflow(OperationError::overflow(&acc("A"), Decimal::MAX, Decimal::ONE), "overflow")]
    #[case::missing_account(OperationError::missing_account(&acc("A")), "missing_account")]
    #[case::no_matching_request(OperationError::no_matching_request(&acc("A")), "no_matching_request")]
    fn test_operation_error_kind(#[case] error: OperationError, #[case] expected: &str) {
        assert_eq!(error.kind(), expected);
    }

    #[rstest]
    #[case::invalid_limit(
        SettlementError::invalid_concurrency_limit(0),
        "Invalid concurrency limit 0: at least one slot is required"
    )]
    #[case::duplicate_account(
        SettlementError::duplicate_account(&acc("ACC-001")),
        "Duplicate account ACC-001"
    )]
    #[case::parse_error_with_line(
        SettlementError::Parse { line: Some(3), message: "bad field".to_string() },
        "CSV parse error at line 3: bad field"
    )]
    #[case::parse_error_without_line(
        SettlementError::Parse { line: None, message: "bad field".to_string() },
        "CSV parse error: bad field"
    )]
    #[case::invalid_record(
        SettlementError::invalid_record(4, "unknown employment category 'intern'"),
        "Invalid record at line 4: unknown employment category 'intern'"
    )]
    #[case::pay_overflow(
        SettlementError::pay_overflow("Ana Silva"),
        "Monthly pay for Ana Silva overflows"
    )]
    fn test_settlement_error_display(#[case] error: SettlementError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: SettlementError = io_error.into();
        assert!(matches!(error, SettlementError::Io { path: None, .. }));
        assert_eq!(error.to_string(), "I/O error: missing");
    }

    #[test]
    fn test_io_error_with_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = SettlementError::io_at(std::path::Path::new("accounts.csv"), io_error);
        assert_eq!(error.to_string(), "I/O error on 'accounts.csv': missing");
    }
}
