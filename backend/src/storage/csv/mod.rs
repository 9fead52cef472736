//! # CSV Storage Module
//!
//! File-based storage implementation for the bookkeeping backend. One CSV
//! file per record type under a base directory:
//!
//! ```csv
//! accounts.csv         id,code,name,account_type,nature,parent_id,is_parent,is_active
//! periods.csv          id,name,start_date,end_date,is_closed,is_active
//! monthly_periods.csv  id,accounting_period_id,name,month,year,start_date,end_date,is_closed,is_active
//! entries.csv          entry headers with cached totals
//! entry_lines.csv      one row per debit/credit movement
//! ```
//!
//! All writes rewrite the whole file atomically (temp file + rename). The
//! implementation satisfies the same storage traits as any database backend,
//! keeping the domain layer storage-agnostic.

pub mod account_repository;
pub mod connection;
pub mod journal_repository;
pub mod period_repository;

#[cfg(test)]
pub mod test_utils;

pub use account_repository::AccountRepository;
pub use connection::CsvConnection;
pub use journal_repository::JournalRepository;
pub use period_repository::PeriodRepository;
