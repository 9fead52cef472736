//! Domain models for the bookkeeping core.

pub mod account;
pub mod actor;
pub mod journal_entry;
pub mod period;
