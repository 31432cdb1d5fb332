//! CSV format handling for settlement inputs
//!
//! This module centralizes the CSV record layouts and their conversion into
//! domain types:
//! - `AccountRecord` (`account,owner,balance`)
//! - `EmployeeRecord` (`name,category,account,annual_salary,transport_allowance,
//!   feeding_allowance,hours_worked,hourly_rate,tax_deduction`)
//! - `WithdrawalRecord` (`account,amount`)
//!
//! All conversion functions are pure (no I/O) for easy testing. Amount columns
//! are read as strings and parsed here so error messages can quote the raw
//! value.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::AccountId;
use crate::workload::{Employee, EmploymentCategory, TaxDeduction};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountRecord {
    pub account: String,
    pub owner: String,
    pub balance: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct EmployeeRecord {
    pub name: String,
    pub category: String,
    pub account: Option<String>,
    pub annual_salary: Option<String>,
    pub transport_allowance: Option<String>,
    pub feeding_allowance: Option<String>,
    pub hours_worked: Option<String>,
    pub hourly_rate: Option<String>,
    pub tax_deduction: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WithdrawalRecord {
    pub account: String,
    pub amount: String,
}

/// Parse an amount column; blank counts as missing
fn parse_amount(field: &str, value: Option<&str>) -> Result<Option<Decimal>, String> {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => Decimal::from_str(raw)
            .map(Some)
            .map_err(|_| format!("invalid {} '{}'", field, raw)),
        _ => Ok(None),
    }
}

fn required_amount(field: &str, value: Option<&str>, owner: &str) -> Result<Decimal, String> {
    parse_amount(field, value)?.ok_or_else(|| format!("{} requires {}", owner, field))
}

/// Convert an AccountRecord to `(id, owner, opening balance)`
///
/// A blank balance opens the account at zero.
pub fn convert_account_record(
    record: AccountRecord,
) -> Result<(AccountId, String, Decimal), String> {
    let id = record.account.trim();
    if id.is_empty() {
        return Err("account id must not be empty".to_string());
    }

    let balance = parse_amount("balance", record.balance.as_deref())?.unwrap_or(Decimal::ZERO);

    Ok((AccountId::from(id), record.owner.trim().to_string(), balance))
}

/// Convert an EmployeeRecord to an Employee
///
/// The category column selects which pay columns are required:
/// - `full-time`: `annual_salary`; allowances default to zero
/// - `hybrid`: `annual_salary`
/// - `remote`: `hours_worked` and `hourly_rate`
///
/// A blank tax deduction means nothing is withheld. A blank account means the
/// employee has no account on file.
pub fn convert_employee_record(record: EmployeeRecord) -> Result<Employee, String> {
    let name = record.name.trim().to_string();
    if name.is_empty() {
        return Err("employee name must not be empty".to_string());
    }

    let category = match record.category.trim().to_lowercase().as_str() {
        "full-time" | "fulltime" | "full_time" => EmploymentCategory::FullTime {
            annual_salary: required_amount("annual_salary", record.annual_salary.as_deref(), &name)?,
            transport_allowance: parse_amount(
                "transport_allowance",
                record.transport_allowance.as_deref(),
            )?
            .unwrap_or(Decimal::ZERO),
            feeding_allowance: parse_amount("feeding_allowance", record.feeding_allowance.as_deref())?
                .unwrap_or(Decimal::ZERO),
        },
        "hybrid" => EmploymentCategory::Hybrid {
            annual_salary: required_amount("annual_salary", record.annual_salary.as_deref(), &name)?,
        },
        "remote" => EmploymentCategory::Remote {
            hours_worked: required_amount("hours_worked", record.hours_worked.as_deref(), &name)?,
            hourly_rate: required_amount("hourly_rate", record.hourly_rate.as_deref(), &name)?,
        },
        other => return Err(format!("unknown employment category '{}'", other)),
    };

    let tax_deduction = match record.tax_deduction.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => TaxDeduction::from_str(raw)?,
        _ => TaxDeduction::default(),
    };

    let account = record
        .account
        .map(|id| AccountId::from(id.trim()))
        .unwrap_or_default();

    let employee = Employee {
        name,
        account,
        category,
        tax_deduction,
    };
    employee.monthly_net_salary().map_err(|e| e.to_string())?;
    Ok(employee)
}

/// Convert a WithdrawalRecord to `(account, amount)`
pub fn convert_withdrawal_record(record: WithdrawalRecord) -> Result<(AccountId, Decimal), String> {
    let account = record.account.trim();
    if account.is_empty() {
        return Err("withdrawal account must not be empty".to_string());
    }

    let amount = required_amount("amount", Some(record.amount.as_str()), account)?;
    Ok((AccountId::from(account), amount))
}
