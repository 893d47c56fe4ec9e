//! Ledger configuration

use std::env;

use rust_decimal::Decimal;

use crate::domain::Rate;

/// Settings for identifier numbering and interest defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Prefix of account identifiers
    pub account_prefix: String,
    /// Counter value before the first account id
    pub account_start: u64,
    /// Prefix of transaction identifiers
    pub transaction_prefix: String,
    /// Counter value before the first transaction id
    pub transaction_start: u64,
    /// Monthly interest rate (percent) used when the caller does not give one
    pub default_interest_rate: Rate,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            account_prefix: "AC".to_string(),
            account_start: 1000,
            transaction_prefix: "TX".to_string(),
            transaction_start: 100,
            default_interest_rate: Decimal::ONE,
        }
    }
}

impl LedgerConfig {
    /// Defaults overlaid with `COFFER_*` environment variables.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            account_prefix: lookup("COFFER_ACCOUNT_PREFIX").unwrap_or(defaults.account_prefix),
            account_start: lookup("COFFER_ACCOUNT_START")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.account_start),
            transaction_prefix: lookup("COFFER_TRANSACTION_PREFIX")
                .unwrap_or(defaults.transaction_prefix),
            transaction_start: lookup("COFFER_TRANSACTION_START")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.transaction_start),
            default_interest_rate: lookup("COFFER_INTEREST_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_interest_rate),
        }
    }

    pub fn with_default_interest_rate(mut self, rate: Rate) -> Self {
        self.default_interest_rate = rate;
        self
    }
}
