use thiserror::Error;

use crate::config::LedgerConfig;

pub type AccountId = String;
pub type TransactionId = String;

/// A counter has reached `u64::MAX` and cannot issue another id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier space exhausted for prefix '{prefix}'")]
pub struct IdSpaceExhausted {
    pub prefix: String,
}

/// Issues account and transaction identifiers as prefix + counter.
///
/// The two sequences are independent and span the whole ledger: transaction
/// numbers are not reset per account. Ids are drawn only after an operation has
/// been validated, so a rejected operation never consumes a number.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    account_prefix: String,
    last_account: u64,
    transaction_prefix: String,
    last_transaction: u64,
}

impl IdGenerator {
    /// `account_start` and `transaction_start` are the values *before* the first
    /// id, so a start of 1000 yields `AC1001` first.
    pub fn new(
        account_prefix: impl Into<String>,
        account_start: u64,
        transaction_prefix: impl Into<String>,
        transaction_start: u64,
    ) -> Self {
        Self {
            account_prefix: account_prefix.into(),
            last_account: account_start,
            transaction_prefix: transaction_prefix.into(),
            last_transaction: transaction_start,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(
            config.account_prefix.clone(),
            config.account_start,
            config.transaction_prefix.clone(),
            config.transaction_start,
        )
    }

    pub fn next_account_id(&mut self) -> Result<AccountId, IdSpaceExhausted> {
        self.last_account = advance(self.last_account, &self.account_prefix)?;
        Ok(format!("{}{}", self.account_prefix, self.last_account))
    }

    pub fn next_transaction_id(&mut self) -> Result<TransactionId, IdSpaceExhausted> {
        self.last_transaction = advance(self.last_transaction, &self.transaction_prefix)?;
        Ok(format!("{}{}", self.transaction_prefix, self.last_transaction))
    }
}

// The counter is left untouched on failure, so an exhausted sequence never wraps.
fn advance(last: u64, prefix: &str) -> Result<u64, IdSpaceExhausted> {
    last.checked_add(1).ok_or_else(|| IdSpaceExhausted {
        prefix: prefix.to_string(),
    })
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_config(&LedgerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_sequences() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.next_account_id().unwrap(), "AC1001");
        assert_eq!(ids.next_account_id().unwrap(), "AC1002");
        assert_eq!(ids.next_transaction_id().unwrap(), "TX101");
        assert_eq!(ids.next_account_id().unwrap(), "AC1003");
        assert_eq!(ids.next_transaction_id().unwrap(), "TX102");
    }

    #[test]
    fn test_custom_prefixes() {
        let mut ids = IdGenerator::new("ACC-", 0, "T-", 9);
        assert_eq!(ids.next_account_id().unwrap(), "ACC-1");
        assert_eq!(ids.next_transaction_id().unwrap(), "T-10");
    }

    #[test]
    fn test_ids_never_repeat() {
        let mut ids = IdGenerator::default();
        let issued: HashSet<String> = (0..1000)
            .map(|_| ids.next_transaction_id().unwrap())
            .collect();
        assert_eq!(issued.len(), 1000);
    }

    #[test]
    fn test_exhausted_counter_does_not_wrap() {
        let mut ids = IdGenerator::new("AC", u64::MAX - 1, "TX", u64::MAX);

        assert_eq!(ids.next_account_id().unwrap(), format!("AC{}", u64::MAX));
        let err = ids.next_account_id().unwrap_err();
        assert_eq!(err.prefix, "AC");
        assert_eq!(
            err.to_string(),
            "identifier space exhausted for prefix 'AC'"
        );
        // Still exhausted, never back to AC0
        assert!(ids.next_account_id().is_err());
        assert!(ids.next_transaction_id().is_err());
    }
}
