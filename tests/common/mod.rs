// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use coffer::application::{LedgerService, Session};
use coffer::domain::{AccountType, Cents};

/// Helper to create a service with default numbering (AC1001..., TX101...)
pub fn test_service() -> LedgerService {
    LedgerService::default()
}

/// Register a user and log them in.
pub fn login(service: &mut LedgerService, username: &str) -> Result<Session> {
    service.register(username, "password")?;
    Ok(service.authenticate(username, "password")?)
}

/// Test fixture: standard account setup
pub struct StandardAccounts;

impl StandardAccounts {
    /// Savings account at position 1, checking account at position 2
    pub fn create_basic(
        service: &mut LedgerService,
        session: &Session,
        savings: Cents,
        checking: Cents,
    ) -> Result<()> {
        service.open_account(session, "Savings", AccountType::Savings, savings)?;
        service.open_account(session, "Checking", AccountType::Checking, checking)?;
        Ok(())
    }
}
