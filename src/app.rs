//! End-to-end settlement of one payroll cycle
//!
//! # Architecture
//!
//! ```text
//! run(args, output)
//!     ├── CliArgs::to_run_configs   (both limits validated before any work)
//!     ├── tokio runtime             (multi-threaded, `--workers` threads)
//!     ├── io::load_*                (accounts into the ledger, employees, requests)
//!     ├── settle(payroll credits)   (payroll limit)
//!     ├── settle(withdrawal debits) (withdrawal limit, after payroll completes)
//!     └── render::*                 (both reports, then final balances)
//! ```

use std::io::Write;
use std::sync::Arc;

use crate::cli::CliArgs;
use crate::core::{Ledger, SettlementReport};
use crate::io::{load_accounts, load_employees, load_withdrawals};
use crate::render::{write_balances_csv, write_report};
use crate::settlement::settle;
use crate::types::{AccountSnapshot, SettlementError};
use crate::workload::{payroll_items, withdrawal_items};

/// Everything a cycle produced, for callers that want more than the text
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub payroll: SettlementReport,
    pub withdrawals: SettlementReport,
    pub balances: Vec<AccountSnapshot>,
}

/// Run a full payroll cycle and render it into `output`
///
/// # Errors
///
/// Invalid concurrency limits, unreadable or malformed inputs, runtime
/// construction failures and output write failures. Failed individual credits
/// or debits are not errors; they appear in the reports.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<CycleOutcome, SettlementError> {
    let (payroll_config, withdrawal_config) = args.to_run_configs()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.worker_threads())
        .enable_all()
        .build()
        .map_err(|e| SettlementError::Runtime(e.to_string()))?;

    let ledger = Arc::new(Ledger::new());
    load_accounts(&args.accounts, &ledger)?;
    let employees = load_employees(&args.employees)?;
    let requests = load_withdrawals(&args.withdrawals)?;

    let payroll_work = payroll_items(&employees)?;

    let (payroll, withdrawals) = runtime.block_on(async {
        let payroll = settle(
            Arc::clone(&ledger),
            payroll_work,
            &payroll_config,
        )
        .await?;

        let withdrawals = settle(
            Arc::clone(&ledger),
            withdrawal_items(&employees, &requests),
            &withdrawal_config,
        )
        .await?;

        Ok::<_, SettlementError>((payroll, withdrawals))
    })?;

    let balances = ledger.snapshots();

    write_report("Payroll", &payroll, output)?;
    write_report("Withdrawals", &withdrawals, output)?;
    writeln!(output, "== Final balances ==")?;
    write_balances_csv(&balances, output)?;

    Ok(CycleOutcome {
        payroll,
        withdrawals,
        balances,
    })
}
