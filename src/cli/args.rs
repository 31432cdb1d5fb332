use crate::settlement::RunConfig;
use crate::types::SettlementError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ACCOUNTS: &str = "fixtures/accounts.csv";
const DEFAULT_EMPLOYEES: &str = "fixtures/employees.csv";
const DEFAULT_WITHDRAWALS: &str = "fixtures/withdrawals.csv";

/// Settle a monthly payroll and the withdrawals that follow it
#[derive(Parser, Debug)]
#[command(name = "payroll-settlement")]
#[command(about = "Settle payroll credits and withdrawal debits against a shared ledger", long_about = None)]
pub struct CliArgs {
    /// Accounts CSV (`account,owner,balance`)
    #[arg(
        long = "accounts",
        value_name = "PATH",
        default_value = DEFAULT_ACCOUNTS,
        help = "Path to the accounts CSV file"
    )]
    pub accounts: PathBuf,

    /// Employees CSV
    #[arg(
        long = "employees",
        value_name = "PATH",
        default_value = DEFAULT_EMPLOYEES,
        help = "Path to the employees CSV file"
    )]
    pub employees: PathBuf,

    /// Withdrawal requests CSV (`account,amount`)
    #[arg(
        long = "withdrawals",
        value_name = "PATH",
        default_value = DEFAULT_WITHDRAWALS,
        help = "Path to the withdrawal requests CSV file"
    )]
    pub withdrawals: PathBuf,

    #[arg(
        long = "payroll-concurrency",
        value_name = "COUNT",
        default_value_t = 5,
        help = "Maximum number of payroll credits in flight (must be at least 1)"
    )]
    pub payroll_concurrency: usize,

    #[arg(
        long = "withdrawal-concurrency",
        value_name = "COUNT",
        default_value_t = 2,
        help = "Maximum number of withdrawal debits in flight (must be at least 1)"
    )]
    pub withdrawal_concurrency: usize,

    /// Time each applied operation keeps its slot, standing in for
    /// downstream processing
    #[arg(
        long = "unit-latency-ms",
        value_name = "MILLIS",
        default_value_t = 0,
        help = "Milliseconds each operation holds its concurrency slot after applying"
    )]
    pub unit_latency_ms: u64,

    /// Worker threads for the runtime
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    #[arg(
        long = "log-level",
        value_name = "FILTER",
        help = "Log filter such as 'debug' (default: RUST_LOG, then 'info')"
    )]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Build the payroll and withdrawal run configurations
    ///
    /// Both are validated together so a bad limit on the second run is
    /// reported before the first one touches the ledger.
    ///
    /// # Returns
    ///
    /// `(payroll, withdrawals)` configurations, or the first invalid limit.
    pub fn to_run_configs(&self) -> Result<(RunConfig, RunConfig), SettlementError> {
        let latency = Duration::from_millis(self.unit_latency_ms);
        let payroll = RunConfig::new(self.payroll_concurrency)?.with_unit_latency(latency);
        let withdrawals = RunConfig::new(self.withdrawal_concurrency)?.with_unit_latency(latency);
        Ok((payroll, withdrawals))
    }

    /// Worker thread count, falling back to the number of CPU cores
    ///
    /// Zero is treated as unset.
    pub fn worker_threads(&self) -> usize {
        match self.workers {
            Some(workers) if workers > 0 => workers,
            _ => num_cpus::get(),
        }
    }
}
