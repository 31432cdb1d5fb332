//! Payroll work items
//!
//! Employees are paid monthly according to their employment category. Every
//! category's gross amount is reduced by the employee's tax deduction and
//! rounded to cents; the result becomes one credit work item.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::Payee;
use crate::types::{AccountId, SettlementError, WorkItem};

const MONTHS_PER_YEAR: i64 = 12;

/// Percentage withheld from gross pay, written as e.g. `10%`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxDeduction(Decimal);

impl TaxDeduction {
    /// # Errors
    ///
    /// Returns a message if `percent` lies outside `0..=100`.
    pub fn from_percent(percent: Decimal) -> Result<Self, String> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(format!("tax deduction {percent}% is outside 0%..=100%"));
        }
        Ok(TaxDeduction(percent))
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// Apply the deduction to a gross amount
    ///
    /// `None` when the amount is too large to scale.
    pub fn net_of(&self, gross: Decimal) -> Option<Decimal> {
        gross
            .checked_mul(Decimal::ONE_HUNDRED - self.0)?
            .checked_div(Decimal::ONE_HUNDRED)
    }
}

impl FromStr for TaxDeduction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let percent = Decimal::from_str(number)
            .map_err(|_| format!("invalid tax deduction '{s}'"))?;
        TaxDeduction::from_percent(percent)
    }
}

impl fmt::Display for TaxDeduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

/// How an employee's gross monthly pay is derived
#[derive(Debug, Clone, PartialEq)]
pub enum EmploymentCategory {
    /// Annual salary plus yearly allowances, paid in twelve parts
    FullTime {
        annual_salary: Decimal,
        transport_allowance: Decimal,
        feeding_allowance: Decimal,
    },

    /// Annual salary paid in twelve parts, no allowances
    Hybrid { annual_salary: Decimal },

    /// Paid for hours worked in the month
    Remote {
        hours_worked: Decimal,
        hourly_rate: Decimal,
    },
}

impl EmploymentCategory {
    pub fn name(&self) -> &'static str {
        match self {
            EmploymentCategory::FullTime { .. } => "full-time",
            EmploymentCategory::Hybrid { .. } => "hybrid",
            EmploymentCategory::Remote { .. } => "remote",
        }
    }

    /// Gross pay for one month, or `None` if the inputs overflow a Decimal
    pub fn monthly_gross(&self) -> Option<Decimal> {
        let months = Decimal::from(MONTHS_PER_YEAR);
        match self {
            EmploymentCategory::FullTime {
                annual_salary,
                transport_allowance,
                feeding_allowance,
            } => annual_salary
                .checked_add(*transport_allowance)?
                .checked_add(*feeding_allowance)?
                .checked_div(months),
            EmploymentCategory::Hybrid { annual_salary } => annual_salary.checked_div(months),
            EmploymentCategory::Remote {
                hours_worked,
                hourly_rate,
            } => hours_worked.checked_mul(*hourly_rate),
        }
    }
}

/// A payable employee
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub name: String,

    /// Salary account; empty when the employee has none on file
    pub account: AccountId,

    pub category: EmploymentCategory,
    pub tax_deduction: TaxDeduction,
}

impl Employee {
    /// Net monthly pay, rounded to cents
    ///
    /// # Errors
    ///
    /// `PayOverflow` when the pay inputs are too large to compute with.
    pub fn monthly_net_salary(&self) -> Result<Decimal, SettlementError> {
        self.category
            .monthly_gross()
            .and_then(|gross| self.tax_deduction.net_of(gross))
            .map(|net| net.round_dp(2))
            .ok_or_else(|| SettlementError::pay_overflow(&self.name))
    }
}

impl Payee for Employee {
    fn name(&self) -> &str {
        &self.name
    }

    fn account(&self) -> &AccountId {
        &self.account
    }
}

/// One credit per employee, for that employee's net monthly pay
///
/// Fails on the first employee whose pay cannot be computed; no items are
/// produced in that case.
pub fn payroll_items(employees: &[Employee]) -> Result<Vec<WorkItem>, SettlementError> {
    employees
        .iter()
        .map(|employee| {
            Ok(WorkItem::credit(
                employee.name.clone(),
                employee.account.clone(),
                employee.monthly_net_salary()?,
            ))
        })
        .collect()
}
