//! Report rendering
//!
//! Turns settlement reports and ledger snapshots into text. Every function
//! writes into a caller-supplied `std::io::Write`, so the CLI prints to stdout
//! while tests render into a `Vec<u8>`.
//!
//! Output carries no timings: two runs with the same outcome render
//! byte-identical text.

use std::io::Write;

use crate::core::{FailureLine, ReportLine, SettlementReport, SuccessLine};
use crate::types::{AccountSnapshot, SettlementError};

fn write_success(line: &SuccessLine, output: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        output,
        "[{:>4}] OK    {:<6} {:<24} {:<10} {:>12.2}  balance {:.2}",
        line.sequence + 1,
        line.kind.as_str(),
        line.subject,
        line.account.to_string(),
        line.amount,
        line.balance_after,
    )
}

fn write_failure(line: &FailureLine, output: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        output,
        "[{:>4}] FAIL  {:<6} {:<24} {:<10} {:>12.2}  {}",
        line.sequence + 1,
        line.kind.as_str(),
        line.subject,
        line.account.to_string(),
        line.amount,
        line.reason,
    )
}

/// Write one line per result in submission order, followed by the summary
pub fn write_report(
    title: &str,
    report: &SettlementReport,
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    writeln!(output, "== {} ==", title)?;

    for line in &report.lines {
        match line {
            ReportLine::Success(success) => write_success(success, output)?,
            ReportLine::Failure(failure) => write_failure(failure, output)?,
        }
    }

    write_summary(report, output)?;
    writeln!(output)?;
    Ok(())
}

/// Write the summary block: counts and the total amount applied
pub fn write_summary(report: &SettlementReport, output: &mut dyn Write) -> Result<(), SettlementError> {
    writeln!(output, "processed: {}", report.processed)?;
    writeln!(output, "succeeded: {}", report.succeeded)?;
    writeln!(output, "failed:    {}", report.failed)?;
    writeln!(output, "total:     {:.2}", report.total_applied)?;
    Ok(())
}

/// Write final balances as CSV (`account,owner,balance`), sorted by account id
pub fn write_balances_csv(
    accounts: &[AccountSnapshot],
    output: &mut dyn Write,
) -> Result<(), SettlementError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(["account", "owner", "balance"])?;

    let mut sorted = accounts.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted {
        writer.write_record(&[
            account.id.to_string(),
            account.owner,
            format!("{:.2}", account.balance),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SettlementCollector;
    use crate::types::{AccountId, OperationError, OperationKind, OperationResult};
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn result(
        sequence: usize,
        kind: OperationKind,
        amount: i64,
        outcome: Result<Decimal, OperationError>,
    ) -> OperationResult {
        OperationResult {
            sequence,
            subject: "Sarah Martinez".to_string(),
            account: AccountId::from("ACC-001"),
            kind,
            amount: Decimal::from(amount),
            outcome,
            elapsed: Duration::from_millis(3),
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> Result<(), SettlementError>,
    {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_write_report_lists_lines_in_sequence_order() {
        let report = SettlementCollector::from_results([
            result(
                1,
                OperationKind::Debit,
                15000,
                Err(OperationError::insufficient_funds(
                    &AccountId::from("ACC-001"),
                    Decimal::from(5100),
                    Decimal::from(15000),
                )),
            ),
            result(0, OperationKind::Credit, 5100, Ok(Decimal::from(5100))),
        ])
        .finish();

        let text = render(|out| write_report("Withdrawals", &report, out));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "== Withdrawals ==");
        assert!(lines[1].starts_with("[   1] OK    credit"));
        assert!(lines[1].ends_with("balance 5100.00"));
        assert!(lines[2].starts_with("[   2] FAIL  debit"));
        assert!(lines[2].contains("Insufficient funds in account ACC-001"));
        assert!(text.contains("succeeded: 1"));
        assert!(text.contains("total:     5100.00"));
    }

    #[test]
    fn test_write_report_omits_timings() {
        let report =
            SettlementCollector::from_results([result(0, OperationKind::Credit, 1, Ok(Decimal::ONE))])
                .finish();

        let text = render(|out| write_report("Payroll", &report, out));

        assert!(!text.contains("ms"));
    }

    #[rstest]
    #[case::empty(SettlementReport::default(), "processed: 0\nsucceeded: 0\nfailed:    0\ntotal:     0.00\n")]
    fn test_write_summary(#[case] report: SettlementReport, #[case] expected: &str) {
        assert_eq!(render(|out| write_summary(&report, out)), expected);
    }

    #[test]
    fn test_write_balances_csv_sorted() {
        let accounts = vec![
            AccountSnapshot {
                id: AccountId::from("ACC-002"),
                owner: "James Chen".to_string(),
                balance: Decimal::new(42005, 1),
            },
            AccountSnapshot {
                id: AccountId::from("ACC-001"),
                owner: "Sarah Martinez".to_string(),
                balance: Decimal::ZERO,
            },
        ];

        let text = render(|out| write_balances_csv(&accounts, out));

        assert_eq!(
            text,
            "account,owner,balance\nACC-001,Sarah Martinez,0.00\nACC-002,James Chen,4200.50\n"
        );
    }
}
