//! I/O module
//!
//! Handles CSV input loading.
//!
//! # Components
//!
//! - `csv_format` - record layouts and their conversion into domain types
//! - `reader` - file loading with line-numbered errors

pub mod csv_format;
pub mod reader;

pub use csv_format::{AccountRecord, EmployeeRecord, WithdrawalRecord};
pub use reader::{
    load_accounts, load_accounts_from_reader, load_employees, load_employees_from_reader,
    load_withdrawals, load_withdrawals_from_reader,
};
