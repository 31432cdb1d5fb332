//! CSV input loading
//!
//! Reads the three settlement inputs (accounts, employees, withdrawals) into
//! domain values. Each loader has a path form, which tags I/O failures with the
//! file name, and a `_from_reader` form that works on any `std::io::Read` for
//! testing.
//!
//! # Error Handling
//!
//! Loading is all-or-nothing: the first malformed row aborts with its line
//! number, because a partially loaded ledger or payroll cannot be settled
//! meaningfully.
//! - Missing or unreadable files: `SettlementError::Io`
//! - Rows the CSV layer cannot split or deserialize: `SettlementError::Parse`
//! - Rows with well-formed fields but invalid values: `SettlementError::InvalidRecord`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

use crate::core::Ledger;
use crate::io::csv_format::{
    convert_account_record, convert_employee_record, convert_withdrawal_record, AccountRecord,
    EmployeeRecord, WithdrawalRecord,
};
use crate::types::SettlementError;
use crate::workload::{Employee, WithdrawalRequests};

/// Deserialize every data row of `input` as `T`, then convert it
///
/// Line numbers are 1-based and count the header row.
fn read_records<R, T, U>(
    input: R,
    convert: impl Fn(T) -> Result<U, String>,
) -> Result<Vec<(u64, U)>, SettlementError>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let mut converted = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| SettlementError::Parse {
                line: Some(line),
                message: e.to_string(),
            })?;

        let value = convert(row).map_err(|message| SettlementError::invalid_record(line, message))?;
        converted.push((line, value));
    }

    Ok(converted)
}

fn open(path: &Path) -> Result<File, SettlementError> {
    File::open(path).map_err(|e| SettlementError::io_at(path, e))
}

/// Open every account listed in `input` on `ledger`
///
/// # Returns
///
/// The number of accounts opened.
pub fn load_accounts_from_reader<R: Read>(
    input: R,
    ledger: &Ledger,
) -> Result<usize, SettlementError> {
    let rows = read_records::<_, AccountRecord, _>(input, convert_account_record)?;
    let count = rows.len();

    for (_, (id, owner, balance)) in rows {
        ledger.open(id, owner, balance)?;
    }

    Ok(count)
}

/// Open every account listed in the CSV file at `path` on `ledger`
pub fn load_accounts(path: &Path, ledger: &Ledger) -> Result<usize, SettlementError> {
    let count = load_accounts_from_reader(open(path)?, ledger)?;
    tracing::info!(path = %path.display(), accounts = count, "accounts loaded");
    Ok(count)
}

pub fn load_employees_from_reader<R: Read>(input: R) -> Result<Vec<Employee>, SettlementError> {
    let rows = read_records::<_, EmployeeRecord, _>(input, convert_employee_record)?;
    Ok(rows.into_iter().map(|(_, employee)| employee).collect())
}

/// Load the employee roster from the CSV file at `path`
pub fn load_employees(path: &Path) -> Result<Vec<Employee>, SettlementError> {
    let employees = load_employees_from_reader(open(path)?)?;
    tracing::info!(path = %path.display(), employees = employees.len(), "employees loaded");
    Ok(employees)
}

/// Collect withdrawal requests; a later row for the same account replaces
/// the earlier one
pub fn load_withdrawals_from_reader<R: Read>(
    input: R,
) -> Result<WithdrawalRequests, SettlementError> {
    let rows = read_records::<_, WithdrawalRecord, _>(input, convert_withdrawal_record)?;
    let mut requests = WithdrawalRequests::new();

    for (line, (account, amount)) in rows {
        if let Some(previous) = requests.insert(account.clone(), amount) {
            tracing::warn!(
                line,
                account = %account,
                %previous,
                replacement = %amount,
                "duplicate withdrawal request replaces earlier one"
            );
        }
    }

    Ok(requests)
}

/// Load withdrawal requests from the CSV file at `path`
pub fn load_withdrawals(path: &Path) -> Result<WithdrawalRequests, SettlementError> {
    let requests = load_withdrawals_from_reader(open(path)?)?;
    tracing::info!(path = %path.display(), requests = requests.len(), "withdrawal requests loaded");
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountId;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_load_accounts_opens_every_row() {
        let file = create_temp_csv(
            "account,owner,balance\n\
             ACC-001, Sarah Martinez ,0\n\
             ACC-002,James Chen,150.25\n",
        );
        let ledger = Ledger::new();

        let count = load_accounts(file.path(), &ledger).unwrap();

        assert_eq!(count, 2);
        let james = ledger.get(&AccountId::from("ACC-002")).unwrap();
        assert_eq!(james.owner(), "James Chen");
        assert_eq!(james.balance(), Decimal::new(15025, 2));
    }

    #[test]
    fn test_load_accounts_rejects_duplicates() {
        let input = "account,owner,balance\nACC-001,A,1\nACC-001,B,2\n";
        let ledger = Ledger::new();

        let result = load_accounts_from_reader(input.as_bytes(), &ledger);

        assert!(matches!(result, Err(SettlementError::DuplicateAccount { .. })));
        assert_eq!(
            ledger.get(&AccountId::from("ACC-001")).unwrap().owner(),
            "A"
        );
    }

    #[test]
    fn test_load_accounts_rejects_negative_opening_balance() {
        let input = "account,owner,balance\nACC-001,A,-1\n";

        let result = load_accounts_from_reader(input.as_bytes(), &Ledger::new());

        assert!(matches!(
            result,
            Err(SettlementError::NegativeOpeningBalance { .. })
        ));
    }

    #[test]
    fn test_invalid_value_reports_line() {
        let input = "account,owner,balance\nACC-001,A,1\nACC-002,B,plenty\n";

        let result = load_accounts_from_reader(input.as_bytes(), &Ledger::new());

        match result {
            Err(SettlementError::InvalidRecord { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("plenty"));
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let input = "account,owner\nACC-001\n";

        let result = load_withdrawals_from_reader(input.as_bytes());

        assert!(matches!(
            result,
            Err(SettlementError::Parse { line: Some(2), .. })
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        let result = load_employees(Path::new("nonexistent.csv"));

        match result {
            Err(error @ SettlementError::Io { .. }) => {
                assert!(error.to_string().contains("nonexistent.csv"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_employees() {
        let input = "name,category,account,annual_salary,transport_allowance,feeding_allowance,hours_worked,hourly_rate,tax_deduction\n\
                     Sarah Martinez,full-time,ACC-001,85000,1500,3000,,,10%\n\
                     James Chen,hybrid,ACC-002,72000,,,,,10%\n\
                     Maria Santos,remote,,,,,180,45,10%\n";

        let employees = load_employees_from_reader(input.as_bytes()).unwrap();

        assert_eq!(employees.len(), 3);
        assert_eq!(employees[0].monthly_net_salary().unwrap(), Decimal::new(671250, 2));
        assert_eq!(employees[1].category.name(), "hybrid");
        assert!(employees[2].account.is_empty());
    }

    #[test]
    fn test_overflowing_pay_rejected_with_line() {
        let input = "name,category,account,annual_salary,transport_allowance,feeding_allowance,hours_worked,hourly_rate,tax_deduction\n\
                     James Chen,hybrid,ACC-002,72000,,,,,10%\n\
                     Sarah Martinez,full-time,ACC-001,79228162514264337593543950335,1500,0,,,10%\n";

        let result = load_employees_from_reader(input.as_bytes());

        match result {
            Err(SettlementError::InvalidRecord { line, message }) => {
                assert_eq!(line, 3);
                assert_eq!(message, "Monthly pay for Sarah Martinez overflows");
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_load_withdrawals_last_duplicate_wins() {
        let input = "account,amount\nACC-001,3000\nACC-002,1200\nACC-001,2500\n";

        let requests = load_withdrawals_from_reader(input.as_bytes()).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests.get(&AccountId::from("ACC-001")),
            Some(Decimal::from(2500))
        );
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let requests = load_withdrawals_from_reader("account,amount\n".as_bytes()).unwrap();
        assert!(requests.is_empty());
    }
}
