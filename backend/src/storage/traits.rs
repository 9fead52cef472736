//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against
//! different persistence backends (CSV files, SQL databases, a hosted
//! store) without modification. All operations are synchronous.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::account::Account;
use crate::domain::models::journal_entry::{JournalEntry, JournalEntryLine};
use crate::domain::models::period::{AccountingPeriod, MonthlyPeriod};

/// Chart-of-accounts storage.
pub trait AccountStorage: Send + Sync {
    /// Store a new account.
    fn store_account(&self, account: &Account) -> Result<()>;

    /// Retrieve a specific account by ID.
    fn get_account(&self, account_id: &str) -> Result<Option<Account>>;

    /// List all accounts ordered by code.
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Update an existing account.
    fn update_account(&self, account: &Account) -> Result<()>;
}

/// Fiscal year and monthly period storage.
pub trait PeriodStorage: Send + Sync {
    /// Store a new fiscal year.
    fn store_accounting_period(&self, period: &AccountingPeriod) -> Result<()>;

    /// Retrieve a fiscal year by ID.
    fn get_accounting_period(&self, period_id: &str) -> Result<Option<AccountingPeriod>>;

    /// List all fiscal years ordered by start date.
    fn list_accounting_periods(&self) -> Result<Vec<AccountingPeriod>>;

    /// Update an existing fiscal year.
    fn update_accounting_period(&self, period: &AccountingPeriod) -> Result<()>;

    /// Store a new monthly period.
    fn store_monthly_period(&self, period: &MonthlyPeriod) -> Result<()>;

    /// Retrieve a monthly period by ID.
    fn get_monthly_period(&self, period_id: &str) -> Result<Option<MonthlyPeriod>>;

    /// List monthly periods, optionally restricted to one fiscal year.
    /// Ordered by start date.
    fn list_monthly_periods(
        &self,
        accounting_period_id: Option<&str>,
    ) -> Result<Vec<MonthlyPeriod>>;

    /// Update an existing monthly period.
    fn update_monthly_period(&self, period: &MonthlyPeriod) -> Result<()>;

    /// Find the monthly period whose date range contains the given date.
    fn find_monthly_period_for_date(&self, date: NaiveDate) -> Result<Option<MonthlyPeriod>>;
}

/// Journal entry storage.
///
/// Implementations must make each mutation atomic as a unit: an entry header
/// and its lines are stored or replaced together, never separately observable.
/// Concurrent deployments need a backend with real transactions behind this
/// trait; the approve path reads totals and writes the transition as one unit.
pub trait JournalStorage: Send + Sync {
    /// Store a new entry together with its lines.
    fn store_entry(&self, entry: &JournalEntry, lines: &[JournalEntryLine]) -> Result<()>;

    /// Retrieve an entry header by ID.
    fn get_entry(&self, entry_id: &str) -> Result<Option<JournalEntry>>;

    /// Retrieve the lines of one entry.
    fn get_entry_lines(&self, entry_id: &str) -> Result<Vec<JournalEntryLine>>;

    /// List entry headers, optionally restricted to one monthly period.
    /// Ordered by entry number.
    fn list_entries(&self, monthly_period_id: Option<&str>) -> Result<Vec<JournalEntry>>;

    /// Update an entry header, optionally replacing its lines in the same
    /// write.
    fn update_entry(
        &self,
        entry: &JournalEntry,
        lines: Option<&[JournalEntryLine]>,
    ) -> Result<()>;

    /// Hard-delete an entry and its lines. Returns false when no entry with
    /// the given ID exists.
    fn delete_entry(&self, entry_id: &str) -> Result<bool>;

    /// Allocate the next sequential entry number.
    fn next_entry_number(&self) -> Result<i64>;

    /// Lines of entries belonging to the given monthly period. With
    /// `approved_only` pending entries are skipped; with `exclude_voided`
    /// voided entries are skipped.
    fn lines_for_period(
        &self,
        monthly_period_id: &str,
        approved_only: bool,
        exclude_voided: bool,
    ) -> Result<Vec<JournalEntryLine>>;

    /// Lines of entries belonging to any of the given monthly periods, with
    /// the same status filters. Used to build initial balances: an entry
    /// counts toward the period it is assigned to, never toward the period
    /// its date happens to fall in.
    fn lines_for_periods(
        &self,
        monthly_period_ids: &[&str],
        approved_only: bool,
        exclude_voided: bool,
    ) -> Result<Vec<JournalEntryLine>>;
}

/// Factory trait for storage connections.
///
/// Abstracts the concrete connection type (CSV directory, database pool) and
/// hands out repositories for it, so services can be generic over the
/// backend. The connection is constructed once at the application entry point
/// and injected; nothing in the domain reaches for ambient global state.
pub trait Connection: Send + Sync + Clone {
    /// The type of AccountStorage this connection creates.
    type AccountRepository: AccountStorage + Clone;

    /// The type of PeriodStorage this connection creates.
    type PeriodRepository: PeriodStorage + Clone;

    /// The type of JournalStorage this connection creates.
    type JournalRepository: JournalStorage + Clone;

    /// Create a new account repository for this connection.
    fn create_account_repository(&self) -> Self::AccountRepository;

    /// Create a new period repository for this connection.
    fn create_period_repository(&self) -> Self::PeriodRepository;

    /// Create a new journal repository for this connection.
    fn create_journal_repository(&self) -> Self::JournalRepository;
}
