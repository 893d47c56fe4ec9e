use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    format_cents, interest_on, AccountId, Cents, IdGenerator, IdSpaceExhausted, Rate, Transaction,
    TransactionKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Earns monthly interest
    Savings,
    Checking,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Checking => "checking",
        }
    }

    pub fn earns_interest(&self) -> bool {
        matches!(self, AccountType::Savings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown account type '{0}'. Use Savings or Checking.")]
pub struct UnknownAccountType(pub String);

/// Case-insensitive: "Savings", "SAVINGS" and "savings" all parse.
impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            _ => Err(UnknownAccountType(s.to_string())),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Insufficient funds in account {account_id}: balance {}, requested {}", display_cents(.balance), display_cents(.requested))]
    InsufficientFunds {
        account_id: AccountId,
        balance: Cents,
        requested: Cents,
    },
}

impl From<IdSpaceExhausted> for AccountError {
    fn from(err: IdSpaceExhausted) -> Self {
        AccountError::InvalidArgument(err.to_string())
    }
}

/// What `add_monthly_interest` did to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestOutcome {
    /// Interest was credited and recorded
    Credited { interest: Cents, balance: Cents },
    /// The account type does not earn interest
    NotEligible { balance: Cents },
    /// The computed interest rounded to zero cents
    NothingAccrued { balance: Cents },
}

impl InterestOutcome {
    pub fn balance(&self) -> Cents {
        match *self {
            InterestOutcome::Credited { balance, .. }
            | InterestOutcome::NotEligible { balance }
            | InterestOutcome::NothingAccrued { balance } => balance,
        }
    }
}

/// A balance-holding account with its transaction log.
///
/// The balance is never negative and always equals the opening balance plus
/// the signed sum of the log. Fields are private so that every change goes
/// through the operations below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    holder_name: String,
    account_type: AccountType,
    opening_balance: Cents,
    balance: Cents,
    opened_at: DateTime<Utc>,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Open an account funded with `initial_deposit` cents (may be zero).
    /// The opening deposit is the starting balance, not a logged transaction.
    pub fn open(
        ids: &mut IdGenerator,
        holder_name: impl Into<String>,
        account_type: AccountType,
        initial_deposit: Cents,
    ) -> Result<Self, AccountError> {
        if initial_deposit < 0 {
            return Err(AccountError::InvalidArgument(format!(
                "initial deposit {} is negative",
                format_cents(initial_deposit)
            )));
        }

        Ok(Self {
            id: ids.next_account_id()?,
            holder_name: holder_name.into(),
            account_type,
            opening_balance: initial_deposit,
            balance: initial_deposit,
            opened_at: Utc::now(),
            transactions: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn balance(&self) -> Cents {
        self.balance
    }

    pub fn opening_balance(&self) -> Cents {
        self.opening_balance
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The full transaction log, oldest first.
    pub fn statement(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Balance recomputed from the opening balance and the log.
    pub fn derived_balance(&self) -> Cents {
        self.transactions
            .iter()
            .fold(self.opening_balance, |balance, tx| balance + tx.signed_amount())
    }

    pub fn deposit(&mut self, ids: &mut IdGenerator, amount: Cents) -> Result<Cents, AccountError> {
        ensure_positive(amount)?;
        let new_balance = self.balance.checked_add(amount).ok_or_else(|| {
            AccountError::InvalidAmount(format!(
                "{} would overflow the balance",
                format_cents(amount)
            ))
        })?;

        self.apply(ids, TransactionKind::Deposit, amount, new_balance)?;
        Ok(new_balance)
    }

    pub fn withdraw(&mut self, ids: &mut IdGenerator, amount: Cents) -> Result<Cents, AccountError> {
        ensure_positive(amount)?;
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                account_id: self.id.clone(),
                balance: self.balance,
                requested: amount,
            });
        }

        let new_balance = self.balance - amount;
        self.apply(ids, TransactionKind::Withdrawal, amount, new_balance)?;
        Ok(new_balance)
    }

    /// Credit `balance * rate_percent / 100` to a savings account.
    /// Other account types are left untouched whatever the rate, even a
    /// negative one; savings accounts reject negative rates.
    pub fn add_monthly_interest(
        &mut self,
        ids: &mut IdGenerator,
        rate_percent: Rate,
    ) -> Result<InterestOutcome, AccountError> {
        if !self.account_type.earns_interest() {
            return Ok(InterestOutcome::NotEligible {
                balance: self.balance,
            });
        }
        if rate_percent < Rate::ZERO {
            return Err(AccountError::InvalidArgument(format!(
                "interest rate {}% is negative",
                rate_percent
            )));
        }

        let overflow = || {
            AccountError::InvalidArgument(format!(
                "interest at {}% would overflow the balance",
                rate_percent
            ))
        };
        let interest = interest_on(self.balance, rate_percent).ok_or_else(overflow)?;
        if interest == 0 {
            return Ok(InterestOutcome::NothingAccrued {
                balance: self.balance,
            });
        }
        let new_balance = self.balance.checked_add(interest).ok_or_else(overflow)?;

        self.apply(ids, TransactionKind::Interest, interest, new_balance)?;
        Ok(InterestOutcome::Credited {
            interest,
            balance: new_balance,
        })
    }

    fn apply(
        &mut self,
        ids: &mut IdGenerator,
        kind: TransactionKind,
        amount: Cents,
        new_balance: Cents,
    ) -> Result<(), AccountError> {
        let id = ids.next_transaction_id()?;

        // Keep the log chronological even if the wall clock steps back
        let now = Utc::now();
        let timestamp = match self.transactions.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        self.transactions.push(Transaction::new(id, kind, amount, timestamp));
        self.balance = new_balance;
        Ok(())
    }
}

fn display_cents(cents: &Cents) -> String {
    format_cents(*cents)
}

fn ensure_positive(amount: Cents) -> Result<(), AccountError> {
    if amount <= 0 {
        return Err(AccountError::InvalidAmount(format_cents(amount)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn savings(ids: &mut IdGenerator, initial: Cents) -> Account {
        Account::open(ids, "Jane Doe", AccountType::Savings, initial).unwrap()
    }

    #[test]
    fn test_account_type_parsing_is_case_insensitive() {
        assert_eq!("Savings".parse::<AccountType>(), Ok(AccountType::Savings));
        assert_eq!("CHECKING".parse::<AccountType>(), Ok(AccountType::Checking));
        assert_eq!(" savings ".parse::<AccountType>(), Ok(AccountType::Savings));
        assert_eq!(
            "brokerage".parse::<AccountType>(),
            Err(UnknownAccountType("brokerage".into()))
        );
    }

    #[test]
    fn test_open_account() {
        let mut ids = IdGenerator::default();
        let account = savings(&mut ids, 100000);

        assert_eq!(account.id(), "AC1001");
        assert_eq!(account.holder_name(), "Jane Doe");
        assert_eq!(account.balance(), 100000);
        assert_eq!(account.opening_balance(), 100000);
        assert!(account.statement().is_empty());
    }

    #[test]
    fn test_open_with_negative_deposit_fails() {
        let mut ids = IdGenerator::default();
        let result = Account::open(&mut ids, "Jane", AccountType::Checking, -1);
        assert!(matches!(result, Err(AccountError::InvalidArgument(_))));

        // The failed open did not consume an account number
        assert_eq!(savings(&mut ids, 0).id(), "AC1001");
    }

    #[test]
    fn test_deposit_appends_transaction() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 1000);

        assert_eq!(account.deposit(&mut ids, 500), Ok(1500));

        let log = account.statement();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, "TX101");
        assert_eq!(log[0].kind, TransactionKind::Deposit);
        assert_eq!(log[0].amount_cents, 500);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 1000);

        assert!(matches!(
            account.deposit(&mut ids, 0),
            Err(AccountError::InvalidAmount(_))
        ));
        assert!(matches!(
            account.withdraw(&mut ids, -5),
            Err(AccountError::InvalidAmount(_))
        ));
        assert_eq!(account.balance(), 1000);
        assert!(account.statement().is_empty());
    }

    #[test]
    fn test_withdraw_more_than_balance_is_rejected() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 1000);

        let err = account.withdraw(&mut ids, 1001).unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                account_id: "AC1001".into(),
                balance: 1000,
                requested: 1001,
            }
        );
        assert_eq!(account.balance(), 1000);
        assert!(account.statement().is_empty());

        // Exact balance is allowed
        assert_eq!(account.withdraw(&mut ids, 1000), Ok(0));
    }

    #[test]
    fn test_interest_on_savings() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 150000);

        let outcome = account.add_monthly_interest(&mut ids, dec!(5)).unwrap();
        assert_eq!(
            outcome,
            InterestOutcome::Credited {
                interest: 7500,
                balance: 157500
            }
        );
        assert_eq!(account.statement()[0].kind, TransactionKind::Interest);
    }

    #[test]
    fn test_interest_ignored_for_checking() {
        let mut ids = IdGenerator::default();
        let mut account = Account::open(&mut ids, "Jane", AccountType::Checking, 150000).unwrap();

        for rate in [dec!(-3), dec!(0), dec!(5), dec!(250)] {
            let outcome = account.add_monthly_interest(&mut ids, rate).unwrap();
            assert_eq!(outcome, InterestOutcome::NotEligible { balance: 150000 });
        }
        assert!(account.statement().is_empty());
    }

    #[test]
    fn test_zero_interest_records_nothing() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 150000);

        let outcome = account.add_monthly_interest(&mut ids, dec!(0)).unwrap();
        assert_eq!(outcome, InterestOutcome::NothingAccrued { balance: 150000 });
        assert!(account.statement().is_empty());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 150000);

        assert!(matches!(
            account.add_monthly_interest(&mut ids, dec!(-1.5)),
            Err(AccountError::InvalidArgument(_))
        ));
        assert_eq!(account.balance(), 150000);
    }

    #[test]
    fn test_derived_balance_matches() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 10000);

        account.deposit(&mut ids, 2500).unwrap();
        account.withdraw(&mut ids, 4000).unwrap();
        account.add_monthly_interest(&mut ids, dec!(10)).unwrap();
        let _ = account.withdraw(&mut ids, 1_000_000);

        assert_eq!(account.balance(), 9350);
        assert_eq!(account.derived_balance(), account.balance());
    }

    #[test]
    fn test_exhausted_ids_leave_account_untouched() {
        let mut ids = IdGenerator::new("AC", u64::MAX, "TX", u64::MAX);
        assert!(matches!(
            Account::open(&mut ids, "Jane", AccountType::Savings, 100),
            Err(AccountError::InvalidArgument(_))
        ));

        let mut ids = IdGenerator::new("AC", 0, "TX", u64::MAX);
        let mut account = savings(&mut ids, 1000);
        assert!(matches!(
            account.deposit(&mut ids, 500),
            Err(AccountError::InvalidArgument(_))
        ));
        assert!(account.withdraw(&mut ids, 500).is_err());
        assert!(account.add_monthly_interest(&mut ids, dec!(5)).is_err());
        assert_eq!(account.balance(), 1000);
        assert!(account.statement().is_empty());
    }

    #[test]
    fn test_log_timestamps_are_ordered() {
        let mut ids = IdGenerator::default();
        let mut account = savings(&mut ids, 0);
        for _ in 0..20 {
            account.deposit(&mut ids, 1).unwrap();
        }

        let log = account.statement();
        assert!(log.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
