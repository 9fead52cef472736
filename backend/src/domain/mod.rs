//! # Domain Module
//!
//! Business logic for double-entry bookkeeping: balance validation, the
//! accounting period gate, the journal entry lifecycle and general ledger
//! aggregation. Services are storage-agnostic and work against the traits in
//! [`crate::storage::traits`]; the pure rule functions
//! ([`balance_validator`], [`period_service::evaluate_entry_date`],
//! [`ledger_service::build_ledger`]) take everything they need as arguments
//! and perform no I/O.

pub mod balance_validator;
pub mod commands;
pub mod journal_service;
pub mod ledger_service;
pub mod models;
pub mod period_service;

pub use balance_validator::{BalanceValidator, ValidationReport, Violation};
pub use journal_service::JournalService;
pub use ledger_service::{build_ledger, flatten, LedgerAccount, LedgerService};
pub use period_service::{evaluate_entry_date, DateCheck, GateOutcome, PeriodService};
