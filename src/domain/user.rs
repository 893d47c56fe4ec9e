use thiserror::Error;

use super::{Account, AccountError, AccountType, Cents, IdGenerator};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("User not found: {0}")]
    UnknownUser(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// A registered user and the accounts they own, in opening order.
pub struct User {
    username: String,
    secret: String,
    accounts: Vec<Account>,
}

impl User {
    fn new(username: String, secret: String) -> Self {
        Self {
            username,
            secret,
            accounts: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub(crate) fn accounts_mut(&mut self) -> &mut [Account] {
        &mut self.accounts
    }

    fn secret_matches(&self, secret: &str) -> bool {
        self.secret == secret
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("accounts", &self.accounts)
            .finish()
    }
}

/// All registered users, in registration order. Usernames are unique and
/// compared case-sensitively.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, username: &str, secret: &str) -> Result<&User, DirectoryError> {
        if username.is_empty() {
            return Err(DirectoryError::InvalidArgument(
                "username must not be empty".to_string(),
            ));
        }
        if self.get(username).is_some() {
            return Err(DirectoryError::DuplicateUsername(username.to_string()));
        }

        self.users
            .push(User::new(username.to_string(), secret.to_string()));
        Ok(&self.users[self.users.len() - 1])
    }

    /// Unknown users and wrong secrets fail the same way.
    pub fn authenticate(&self, username: &str, secret: &str) -> Result<&User, DirectoryError> {
        self.get(username)
            .filter(|user| user.secret_matches(secret))
            .ok_or(DirectoryError::AuthenticationFailed)
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|user| user.username == username)
    }

    /// Open a new account and append it to the user's accounts.
    pub fn open_account_for(
        &mut self,
        username: &str,
        ids: &mut IdGenerator,
        holder_name: &str,
        account_type: AccountType,
        initial_deposit: Cents,
    ) -> Result<&Account, DirectoryError> {
        let user = self
            .get_mut(username)
            .ok_or_else(|| DirectoryError::UnknownUser(username.to_string()))?;

        let account = Account::open(ids, holder_name, account_type, initial_deposit)?;
        user.accounts.push(account);
        Ok(&user.accounts[user.accounts.len() - 1])
    }

    pub fn accounts_of(&self, username: &str) -> Result<&[Account], DirectoryError> {
        self.get(username)
            .map(User::accounts)
            .ok_or_else(|| DirectoryError::UnknownUser(username.to_string()))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
