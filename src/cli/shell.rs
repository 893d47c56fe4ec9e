use std::fs::File;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::application::{LedgerService, Session};
use crate::domain::{format_cents, parse_cents, parse_rate, AccountType, Cents, InterestOutcome};
use crate::io::Exporter;

/// Raised by `prompt` when input runs out; `Shell::run` treats it as a
/// normal exit.
#[derive(Debug, thiserror::Error)]
#[error("end of input")]
struct EndOfInput;

/// Menu-driven front end over a `LedgerService`.
///
/// Generic over its input and output so that it can run against a terminal
/// or a scripted buffer.
pub struct Shell<'a, R, W> {
    service: &'a mut LedgerService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(service: &'a mut LedgerService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Run the main menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        match self.main_menu() {
            Err(err) if err.is::<EndOfInput>() => Ok(()),
            other => other,
        }
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\nBanking Application Menu:")?;
            writeln!(self.output, "1. Register")?;
            writeln!(self.output, "2. Login")?;
            writeln!(self.output, "3. Exit")?;

            match self.prompt("Choose an option: ")?.as_str() {
                "1" => self.register()?,
                "2" => self.login()?,
                "3" => {
                    writeln!(self.output, "Exiting application.")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice. Try again.")?,
            }
        }
    }

    fn register(&mut self) -> Result<()> {
        let username = self.prompt("Enter username: ")?;
        let password = self.prompt("Enter password: ")?;

        match self.service.register(&username, &password) {
            Ok(()) => writeln!(self.output, "User registered successfully!")?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn login(&mut self) -> Result<()> {
        let username = self.prompt("Enter username: ")?;
        let password = self.prompt("Enter password: ")?;

        match self.service.authenticate(&username, &password) {
            Ok(session) => {
                writeln!(self.output, "Login successful!")?;
                self.user_menu(&session)
            }
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                Ok(())
            }
        }
    }

    fn user_menu(&mut self, session: &Session) -> Result<()> {
        loop {
            writeln!(self.output, "\nUser Menu:")?;
            writeln!(self.output, "1. Open Account")?;
            writeln!(self.output, "2. Deposit")?;
            writeln!(self.output, "3. Withdraw")?;
            writeln!(self.output, "4. Check Balance")?;
            writeln!(self.output, "5. Print Statement")?;
            writeln!(self.output, "6. Add Monthly Interest")?;
            writeln!(self.output, "7. Export Statement")?;
            writeln!(self.output, "8. Logout")?;

            match self.prompt("Choose an option: ")?.as_str() {
                "1" => self.open_account(session)?,
                "2" => self.deposit(session)?,
                "3" => self.withdraw(session)?,
                "4" => self.check_balance(session)?,
                "5" => self.print_statement(session)?,
                "6" => self.add_monthly_interest(session)?,
                "7" => self.export_statement(session)?,
                "8" => {
                    writeln!(self.output, "Logging out.")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice. Try again.")?,
            }
        }
    }

    fn open_account(&mut self, session: &Session) -> Result<()> {
        let holder_name = self.prompt("Enter account holder's name: ")?;
        let type_input = self.prompt("Enter account type (Savings/Checking): ")?;
        let account_type = match type_input.parse::<AccountType>() {
            Ok(account_type) => account_type,
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                return Ok(());
            }
        };
        let Some(initial_deposit) = self.prompt_amount("Enter initial deposit amount: ")? else {
            return Ok(());
        };

        match self
            .service
            .open_account(session, &holder_name, account_type, initial_deposit)
        {
            Ok(account) => writeln!(
                self.output,
                "Account opened successfully! Account Number: {}",
                account.id()
            )?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn deposit(&mut self, session: &Session) -> Result<()> {
        let Some(index) = self.select_account(session)? else {
            return Ok(());
        };
        let Some(amount) = self.prompt_amount("Enter amount to deposit: ")? else {
            return Ok(());
        };

        match self.service.deposit(session, index, amount) {
            Ok(balance) => writeln!(
                self.output,
                "Deposit successful! New balance: ${}",
                format_cents(balance)
            )?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn withdraw(&mut self, session: &Session) -> Result<()> {
        let Some(index) = self.select_account(session)? else {
            return Ok(());
        };
        let Some(amount) = self.prompt_amount("Enter amount to withdraw: ")? else {
            return Ok(());
        };

        match self.service.withdraw(session, index, amount) {
            Ok(balance) => writeln!(
                self.output,
                "Withdrawal successful! New balance: ${}",
                format_cents(balance)
            )?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn check_balance(&mut self, session: &Session) -> Result<()> {
        let Some(index) = self.select_account(session)? else {
            return Ok(());
        };

        match self.service.balance(session, index) {
            Ok(balance) => writeln!(self.output, "Current balance: ${}", format_cents(balance))?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn print_statement(&mut self, session: &Session) -> Result<()> {
        let Some(index) = self.select_account(session)? else {
            return Ok(());
        };
        let account = self.service.select_account(session, index)?;

        writeln!(
            self.output,
            "Transaction statement for account: {}",
            account.id()
        )?;
        if account.statement().is_empty() {
            writeln!(self.output, "No transactions yet.")?;
        }
        for tx in account.statement() {
            writeln!(self.output, "{}", tx)?;
        }
        Ok(())
    }

    fn add_monthly_interest(&mut self, session: &Session) -> Result<()> {
        let Some(index) = self.select_account(session)? else {
            return Ok(());
        };
        let default_rate = self.service.config().default_interest_rate;
        let rate_input = self.prompt(&format!(
            "Enter monthly interest rate (in %) [{}]: ",
            default_rate
        ))?;

        let result = if rate_input.is_empty() {
            self.service.apply_default_interest(session, index)
        } else {
            match parse_rate(&rate_input) {
                Ok(rate) => self.service.apply_interest(session, index, rate),
                Err(err) => {
                    writeln!(self.output, "{}", err)?;
                    return Ok(());
                }
            }
        };

        match result {
            Ok(InterestOutcome::Credited { interest, balance }) => writeln!(
                self.output,
                "Interest added: ${}. New balance: ${}",
                format_cents(interest),
                format_cents(balance)
            )?,
            Ok(InterestOutcome::NotEligible { balance }) => writeln!(
                self.output,
                "Interest applies to savings accounts only. Balance unchanged: ${}",
                format_cents(balance)
            )?,
            Ok(InterestOutcome::NothingAccrued { balance }) => writeln!(
                self.output,
                "No interest accrued. Balance unchanged: ${}",
                format_cents(balance)
            )?,
            Err(err) => writeln!(self.output, "{}", err)?,
        }
        Ok(())
    }

    fn export_statement(&mut self, session: &Session) -> Result<()> {
        let Some(index) = self.select_account(session)? else {
            return Ok(());
        };
        let format = self.prompt("Export format (csv/json): ")?.to_lowercase();
        if format != "csv" && format != "json" {
            writeln!(self.output, "Unknown format '{}'. Use csv or json.", format)?;
            return Ok(());
        }
        let path = self.prompt("Output file (leave blank to print): ")?;

        let account = self.service.select_account(session, index)?;
        let exporter = Exporter::new(account);
        if path.is_empty() {
            match write_statement(&exporter, &format, &mut self.output) {
                Ok(_) => writeln!(self.output)?,
                Err(err) => writeln!(self.output, "Export failed: {:#}", err)?,
            }
            return Ok(());
        }

        let exported = File::create(&path)
            .with_context(|| format!("Failed to create export file {}", path))
            .and_then(|file| write_statement(&exporter, &format, file));
        match exported {
            Ok(count) => writeln!(
                self.output,
                "Exported {} transaction(s) to {}",
                count, path
            )?,
            Err(err) => writeln!(self.output, "Export failed: {:#}", err)?,
        }
        Ok(())
    }

    /// List the user's accounts and read a 1-based choice.
    /// Prints a message and returns `None` if the choice is unusable.
    fn select_account(&mut self, session: &Session) -> Result<Option<usize>> {
        let accounts = self.service.accounts(session)?;
        if accounts.is_empty() {
            writeln!(self.output, "No accounts found. Open an account first.")?;
            return Ok(None);
        }

        writeln!(self.output, "Select an account:")?;
        for (i, account) in accounts.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} - {} ({})",
                i + 1,
                account.id(),
                account.account_type(),
                account.holder_name()
            )?;
        }

        let choice = self.prompt("Enter account number: ")?;
        let Ok(index) = choice.parse::<usize>() else {
            writeln!(self.output, "Invalid account choice.")?;
            return Ok(None);
        };
        match self.service.select_account(session, index) {
            Ok(_) => Ok(Some(index)),
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                Ok(None)
            }
        }
    }

    fn prompt_amount(&mut self, label: &str) -> Result<Option<Cents>> {
        let input = self.prompt(label)?;
        match parse_cents(&input) {
            Ok(cents) => Ok(Some(cents)),
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                Ok(None)
            }
        }
    }

    /// Print `label` and read one trimmed line.
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Err(EndOfInput.into());
        }
        Ok(line.trim().to_string())
    }
}

/// Write the statement as `format` ("csv" or "json"); returns the row count.
fn write_statement<W: Write>(exporter: &Exporter<'_>, format: &str, writer: W) -> Result<usize> {
    match format {
        "csv" => exporter.export_statement_csv(writer),
        _ => Ok(exporter.export_statement_json(writer)?.transactions.len()),
    }
}
