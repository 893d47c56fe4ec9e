use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{format_cents, Cents, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    /// Monthly interest credited to a savings account
    Interest,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
            TransactionKind::Interest => "Interest",
        }
    }

    /// Whether this kind of transaction adds to the balance.
    pub fn is_credit(&self) -> bool {
        !matches!(self, TransactionKind::Withdrawal)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One applied balance change. Transactions are append-only records:
/// once in an account's log they are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    /// Always positive; direction comes from `kind`
    pub amount_cents: Cents,
}

impl Transaction {
    pub(crate) fn new(
        id: TransactionId,
        kind: TransactionKind,
        amount_cents: Cents,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            timestamp,
            kind,
            amount_cents,
        }
    }

    /// Amount with its effect on the balance applied.
    pub fn signed_amount(&self) -> Cents {
        if self.kind.is_credit() {
            self.amount_cents
        } else {
            -self.amount_cents
        }
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {} | {} | ${}",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            format_cents(self.amount_cents)
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_signed_amount() {
        let now = Utc::now();
        let deposit = Transaction::new("TX1".into(), TransactionKind::Deposit, 500, now);
        let withdrawal = Transaction::new("TX2".into(), TransactionKind::Withdrawal, 200, now);
        let interest = Transaction::new("TX3".into(), TransactionKind::Interest, 7, now);

        assert_eq!(deposit.signed_amount(), 500);
        assert_eq!(withdrawal.signed_amount(), -200);
        assert_eq!(interest.signed_amount(), 7);
    }

    #[test]
    fn test_display() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let tx = Transaction::new("TX101".into(), TransactionKind::Deposit, 50000, at);
        assert_eq!(tx.to_string(), "TX101 | 2024-03-01 09:30:00 | Deposit | $500.00");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Withdrawal).unwrap();
        assert_eq!(json, "\"withdrawal\"");
    }
}
