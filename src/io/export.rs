use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{format_cents, Account, AccountType, Cents, Transaction};

/// One account's statement, as written by `export_statement_json`.
#[derive(Debug, Clone, Serialize)]
pub struct StatementSnapshot<'a> {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub account_id: &'a str,
    pub holder_name: &'a str,
    pub account_type: AccountType,
    pub opening_balance: Cents,
    pub closing_balance: Cents,
    pub transactions: &'a [Transaction],
}

/// Writes an account statement in CSV or JSON.
pub struct Exporter<'a> {
    account: &'a Account,
}

impl<'a> Exporter<'a> {
    pub fn new(account: &'a Account) -> Self {
        Self { account }
    }

    /// Export the statement as CSV, one row per transaction with the running
    /// balance after it. Returns the number of rows written.
    pub fn export_statement_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "timestamp", "kind", "amount", "balance_after"])?;

        let mut running = self.account.opening_balance();
        for tx in self.account.statement() {
            running += tx.signed_amount();
            csv_writer.write_record(&[
                tx.id.clone(),
                tx.timestamp.to_rfc3339(),
                tx.kind.to_string(),
                format_cents(tx.amount_cents),
                format_cents(running),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.account.statement().len())
    }

    /// Export the statement as a pretty-printed JSON snapshot.
    pub fn export_statement_json<W: Write>(&self, mut writer: W) -> Result<StatementSnapshot<'a>> {
        let snapshot = StatementSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            account_id: self.account.id(),
            holder_name: self.account.holder_name(),
            account_type: self.account.account_type(),
            opening_balance: self.account.opening_balance(),
            closing_balance: self.account.balance(),
            transactions: self.account.statement(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
