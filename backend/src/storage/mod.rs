//! # Storage Module
//!
//! Persistence for the bookkeeping backend, behind trait abstractions so the
//! domain layer never depends on a concrete backend. The CSV implementation
//! is the reference backend; a SQL or hosted store can be swapped in by
//! implementing the same traits.

pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{AccountStorage, Connection, JournalStorage, PeriodStorage};
