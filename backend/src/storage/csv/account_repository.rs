//! CSV-backed chart-of-accounts repository.

use anyhow::{anyhow, Result};
use log::info;

use super::connection::CsvConnection;
use crate::domain::models::account::Account;
use crate::storage::traits::AccountStorage;

const ACCOUNTS_FILE: &str = "accounts.csv";

#[derive(Clone)]
pub struct AccountRepository {
    connection: CsvConnection,
}

impl AccountRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_accounts(&self) -> Result<Vec<Account>> {
        self.connection.read_all(ACCOUNTS_FILE)
    }

    fn write_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.connection.write_all(ACCOUNTS_FILE, accounts)
    }
}

impl AccountStorage for AccountRepository {
    fn store_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.read_accounts()?;
        if accounts.iter().any(|a| a.id == account.id) {
            return Err(anyhow!("Account '{}' already exists", account.id));
        }
        accounts.push(account.clone());
        self.write_accounts(&accounts)?;
        info!("Stored account {} ({})", account.code, account.name);
        Ok(())
    }

    fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        let accounts = self.read_accounts()?;
        Ok(accounts.into_iter().find(|a| a.id == account_id))
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts = self.read_accounts()?;
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.read_accounts()?;
        let slot = accounts
            .iter_mut()
            .find(|a| a.id == account.id)
            .ok_or_else(|| anyhow!("Account '{}' not found", account.id))?;
        *slot = account.clone();
        self.write_accounts(&accounts)
    }
}
