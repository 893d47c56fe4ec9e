mod shell;

pub use shell::Shell;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use crate::application::LedgerService;
use crate::config::LedgerConfig;
use crate::domain::{format_cents, parse_rate, Rate};
use crate::logging::init_logging;

/// Coffer - in-memory banking ledger
#[derive(Parser, Debug)]
#[command(name = "coffer")]
#[command(about = "An in-memory banking ledger with an interactive menu")]
#[command(version)]
pub struct Cli {
    /// Log level for ledger events (overridden by RUST_LOG)
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Default monthly interest rate in percent (e.g. "1.5")
    #[arg(short, long, value_parser = parse_rate)]
    pub interest_rate: Option<Rate>,

    /// Prefix for new account numbers
    #[arg(long)]
    pub account_prefix: Option<String>,

    /// Prefix for new transaction ids
    #[arg(long)]
    pub transaction_prefix: Option<String>,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> LedgerConfig {
        let mut config = LedgerConfig::from_env();
        if let Some(rate) = self.interest_rate {
            config = config.with_default_interest_rate(rate);
        }
        if let Some(prefix) = &self.account_prefix {
            config.account_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.transaction_prefix {
            config.transaction_prefix = prefix.clone();
        }
        config
    }

    pub fn run(self) -> Result<()> {
        init_logging(&self.log_level)?;

        let config = self.config();
        info!(?config, "starting ledger");
        let mut service = LedgerService::new(config);

        let stdin = io::stdin();
        let stdout = io::stdout();
        Shell::new(&mut service, stdin.lock(), stdout.lock()).run()?;

        let report = service.check_integrity();
        if report.is_healthy() {
            info!(
                users = report.user_count,
                accounts = report.account_count,
                transactions = report.transaction_count,
                holdings = %format_cents(report.total_holdings),
                "ledger consistent at exit"
            );
        } else {
            for issue in &report.issues {
                warn!(issue = %issue, "ledger integrity issue");
            }
            anyhow::bail!("Ledger integrity check failed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "coffer",
            "--interest-rate",
            "2.5%",
            "--account-prefix",
            "SV",
        ]);
        let config = cli.config();

        assert_eq!(config.default_interest_rate, dec!(2.5));
        assert_eq!(config.account_prefix, "SV");
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_invalid_rate_flag_is_rejected() {
        let result = Cli::try_parse_from(["coffer", "--interest-rate", "lots"]);
        assert!(result.is_err());
    }
}
