use std::collections::HashSet;

use super::{format_cents, Cents, UserDirectory};

/// Result of auditing every account in the ledger.
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub user_count: usize,
    pub account_count: usize,
    pub transaction_count: usize,
    /// Sum of all account balances
    pub total_holdings: Cents,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check the ledger-wide invariants: non-negative balances, balances that
/// agree with their logs, positive amounts, chronological logs and
/// identifiers that are never reused.
pub fn build_integrity_report(directory: &UserDirectory) -> IntegrityReport {
    let mut report = IntegrityReport {
        user_count: directory.len(),
        ..IntegrityReport::default()
    };
    let mut account_ids = HashSet::new();
    let mut transaction_ids = HashSet::new();

    for user in directory.users() {
        for account in user.accounts() {
            report.account_count += 1;
            report.total_holdings = report.total_holdings.saturating_add(account.balance());

            if !account_ids.insert(account.id()) {
                report
                    .issues
                    .push(format!("Duplicate account id {}", account.id()));
            }
            if account.balance() < 0 {
                report.issues.push(format!(
                    "Account {} has negative balance {}",
                    account.id(),
                    format_cents(account.balance())
                ));
            }
            let derived = account.derived_balance();
            if derived != account.balance() {
                report.issues.push(format!(
                    "Account {} balance {} does not match its transactions ({})",
                    account.id(),
                    format_cents(account.balance()),
                    format_cents(derived)
                ));
            }

            let log = account.statement();
            report.transaction_count += log.len();
            for tx in log {
                if !transaction_ids.insert(tx.id.as_str()) {
                    report
                        .issues
                        .push(format!("Duplicate transaction id {}", tx.id));
                }
                if tx.amount_cents <= 0 {
                    report.issues.push(format!(
                        "Transaction {} has non-positive amount {}",
                        tx.id,
                        format_cents(tx.amount_cents)
                    ));
                }
            }
            for pair in log.windows(2) {
                if pair[1].timestamp < pair[0].timestamp {
                    report.issues.push(format!(
                        "Transaction {} is recorded before {} in account {}",
                        pair[1].id,
                        pair[0].id,
                        account.id()
                    ));
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::{AccountType, IdGenerator};

    #[test]
    fn test_empty_ledger_is_healthy() {
        let report = build_integrity_report(&UserDirectory::new());
        assert!(report.is_healthy());
        assert_eq!(report.account_count, 0);
    }

    #[test]
    fn test_report_counts_everything() {
        let mut directory = UserDirectory::new();
        let mut ids = IdGenerator::default();
        directory.register("alice", "pw").unwrap();
        directory.register("bob", "pw").unwrap();

        directory
            .open_account_for("alice", &mut ids, "Alice", AccountType::Savings, 10000)
            .unwrap();
        directory
            .open_account_for("bob", &mut ids, "Bob", AccountType::Checking, 500)
            .unwrap();

        let alice = directory.get_mut("alice").unwrap();
        let account = &mut alice.accounts_mut()[0];
        account.deposit(&mut ids, 2000).unwrap();
        account.add_monthly_interest(&mut ids, dec!(1)).unwrap();

        let report = build_integrity_report(&directory);
        assert!(report.is_healthy(), "issues: {:?}", report.issues);
        assert_eq!(report.user_count, 2);
        assert_eq!(report.account_count, 2);
        assert_eq!(report.transaction_count, 2);
        assert_eq!(report.total_holdings, 12120 + 500);
    }

    #[test]
    fn test_reused_account_numbers_are_reported() {
        let mut directory = UserDirectory::new();
        directory.register("alice", "pw").unwrap();
        directory.register("bob", "pw").unwrap();

        // Two generators with the same configuration hand out the same ids
        let mut first = IdGenerator::default();
        let mut second = IdGenerator::default();
        directory
            .open_account_for("alice", &mut first, "Alice", AccountType::Savings, 0)
            .unwrap();
        directory
            .open_account_for("bob", &mut second, "Bob", AccountType::Savings, 0)
            .unwrap();

        let report = build_integrity_report(&directory);
        assert!(!report.is_healthy());
        assert_eq!(report.issues, vec!["Duplicate account id AC1001".to_string()]);
    }
}
