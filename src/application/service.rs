use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::domain::{
    build_integrity_report, format_cents, Account, AccountType, Cents, IdGenerator,
    IntegrityReport, InterestOutcome, Rate, Transaction, UserDirectory,
};

use super::AppError;

/// Proof that a user has authenticated. Only `LedgerService::authenticate`
/// hands these out, so every account operation is scoped to a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Application service coordinating users and their accounts.
/// This is the only interface the shell (or any other client) talks to.
///
/// Accounts are addressed by their 1-based position in the user's account
/// list, in opening order. `position_of` maps a stable account id to that
/// position.
#[derive(Debug)]
pub struct LedgerService {
    config: LedgerConfig,
    ids: IdGenerator,
    directory: UserDirectory,
}

impl LedgerService {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            ids: IdGenerator::from_config(&config),
            directory: UserDirectory::new(),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================
    // User operations
    // ========================

    pub fn register(&mut self, username: &str, secret: &str) -> Result<(), AppError> {
        match self.directory.register(username, secret) {
            Ok(_) => {
                info!(username, "registered user");
                Ok(())
            }
            Err(err) => {
                warn!(username, error = %err, "registration rejected");
                Err(err.into())
            }
        }
    }

    pub fn authenticate(&self, username: &str, secret: &str) -> Result<Session, AppError> {
        match self.directory.authenticate(username, secret) {
            Ok(user) => {
                info!(username, "user logged in");
                Ok(Session {
                    username: user.username().to_string(),
                })
            }
            Err(err) => {
                warn!(username, "authentication failed");
                Err(err.into())
            }
        }
    }

    // ========================
    // Account operations
    // ========================

    pub fn open_account(
        &mut self,
        session: &Session,
        holder_name: &str,
        account_type: AccountType,
        initial_deposit: Cents,
    ) -> Result<&Account, AppError> {
        let account = self.directory.open_account_for(
            &session.username,
            &mut self.ids,
            holder_name,
            account_type,
            initial_deposit,
        )?;
        info!(
            username = %session.username,
            account_id = account.id(),
            account_type = %account_type,
            initial_deposit = %format_cents(initial_deposit),
            "opened account"
        );
        Ok(account)
    }

    /// The user's accounts, in opening order.
    pub fn accounts(&self, session: &Session) -> Result<&[Account], AppError> {
        Ok(self.directory.accounts_of(&session.username)?)
    }

    /// Resolve a 1-based position to one of the user's accounts.
    pub fn select_account(&self, session: &Session, index: usize) -> Result<&Account, AppError> {
        let accounts = self.accounts(session)?;
        index
            .checked_sub(1)
            .and_then(|i| accounts.get(i))
            .ok_or(AppError::InvalidSelection {
                index,
                count: accounts.len(),
            })
    }

    /// 1-based position of the account with the given id.
    pub fn position_of(&self, session: &Session, account_id: &str) -> Result<usize, AppError> {
        self.accounts(session)?
            .iter()
            .position(|account| account.id() == account_id)
            .map(|i| i + 1)
            .ok_or_else(|| AppError::AccountNotFound(account_id.to_string()))
    }

    pub fn deposit(
        &mut self,
        session: &Session,
        index: usize,
        amount: Cents,
    ) -> Result<Cents, AppError> {
        let (account, ids) = self.select_account_mut(session, index)?;
        let result = account.deposit(ids, amount);
        Self::log_mutation("deposit", account, amount, &result);
        Ok(result?)
    }

    pub fn withdraw(
        &mut self,
        session: &Session,
        index: usize,
        amount: Cents,
    ) -> Result<Cents, AppError> {
        let (account, ids) = self.select_account_mut(session, index)?;
        let result = account.withdraw(ids, amount);
        Self::log_mutation("withdrawal", account, amount, &result);
        Ok(result?)
    }

    pub fn balance(&self, session: &Session, index: usize) -> Result<Cents, AppError> {
        Ok(self.select_account(session, index)?.balance())
    }

    /// The account's transactions, oldest first.
    pub fn statement(&self, session: &Session, index: usize) -> Result<&[Transaction], AppError> {
        Ok(self.select_account(session, index)?.statement())
    }

    /// Apply one month of interest at `rate_percent` to the selected account.
    pub fn apply_interest(
        &mut self,
        session: &Session,
        index: usize,
        rate_percent: Rate,
    ) -> Result<InterestOutcome, AppError> {
        let (account, ids) = self.select_account_mut(session, index)?;
        match account.add_monthly_interest(ids, rate_percent) {
            Ok(outcome) => {
                match outcome {
                    InterestOutcome::Credited { interest, balance } => info!(
                        account_id = account.id(),
                        rate = %rate_percent,
                        interest = %format_cents(interest),
                        balance = %format_cents(balance),
                        "credited interest"
                    ),
                    _ => debug!(
                        account_id = account.id(),
                        rate = %rate_percent,
                        ?outcome,
                        "no interest credited"
                    ),
                }
                Ok(outcome)
            }
            Err(err) => {
                warn!(account_id = account.id(), error = %err, "interest rejected");
                Err(err.into())
            }
        }
    }

    /// Apply interest at the configured default rate.
    pub fn apply_default_interest(
        &mut self,
        session: &Session,
        index: usize,
    ) -> Result<InterestOutcome, AppError> {
        let rate = self.config.default_interest_rate;
        self.apply_interest(session, index, rate)
    }

    // ========================
    // Integrity operations
    // ========================

    pub fn check_integrity(&self) -> IntegrityReport {
        build_integrity_report(&self.directory)
    }

    fn select_account_mut(
        &mut self,
        session: &Session,
        index: usize,
    ) -> Result<(&mut Account, &mut IdGenerator), AppError> {
        let user = self
            .directory
            .get_mut(&session.username)
            .ok_or_else(|| AppError::UnknownUser(session.username.clone()))?;
        let accounts = user.accounts_mut();
        let count = accounts.len();
        let account = index
            .checked_sub(1)
            .and_then(|i| accounts.get_mut(i))
            .ok_or(AppError::InvalidSelection { index, count })?;
        Ok((account, &mut self.ids))
    }

    fn log_mutation<E: std::fmt::Display>(
        operation: &str,
        account: &Account,
        amount: Cents,
        result: &Result<Cents, E>,
    ) {
        match result {
            Ok(balance) => info!(
                account_id = account.id(),
                amount = %format_cents(amount),
                balance = %format_cents(*balance),
                "{} applied",
                operation
            ),
            Err(err) => warn!(
                account_id = account.id(),
                amount = %format_cents(amount),
                error = %err,
                "{} rejected",
                operation
            ),
        }
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
