use thiserror::Error;

use crate::domain::{format_cents, AccountError, AccountId, Cents, DirectoryError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("User not found: {0}")]
    UnknownUser(String),

    #[error("Invalid account choice: {index} (choose 1 to {count})")]
    InvalidSelection { index: usize, count: usize },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Insufficient funds in account {account_id}: balance {}, requested {}", display_cents(.balance), display_cents(.requested))]
    InsufficientFunds {
        account_id: AccountId,
        balance: Cents,
        requested: Cents,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidAmount(msg) => AppError::InvalidAmount(msg),
            AccountError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            AccountError::InsufficientFunds {
                account_id,
                balance,
                requested,
            } => AppError::InsufficientFunds {
                account_id,
                balance,
                requested,
            },
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateUsername(name) => AppError::DuplicateUsername(name),
            DirectoryError::AuthenticationFailed => AppError::AuthenticationFailed,
            DirectoryError::UnknownUser(name) => AppError::UnknownUser(name),
            DirectoryError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            DirectoryError::Account(err) => err.into(),
        }
    }
}

fn display_cents(cents: &Cents) -> String {
    format_cents(*cents)
}
