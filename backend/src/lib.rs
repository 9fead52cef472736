//! # Bookkeeper Backend
//!
//! Double-entry bookkeeping core: journal entries, accounting periods and
//! general ledger reporting over a pluggable storage layer. The transport
//! layer (HTTP, desktop shell) lives in the surrounding application; this
//! crate exposes the domain services directly.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

pub mod domain;
pub mod storage;

pub use storage::csv::CsvConnection;

use domain::{JournalService, LedgerService, PeriodService};

/// Main backend struct that orchestrates all services.
///
/// The storage connection is constructed once here and injected into every
/// service; its lifecycle is owned by the application entry point.
pub struct Backend {
    pub journal_service: JournalService<CsvConnection>,
    pub period_service: PeriodService<CsvConnection>,
    pub ledger_service: LedgerService<CsvConnection>,
}

impl Backend {
    /// Create a backend storing its data under the given directory.
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        let connection = Arc::new(CsvConnection::new(data_directory)?);
        Ok(Self {
            journal_service: JournalService::new(connection.clone()),
            period_service: PeriodService::new(connection.clone()),
            ledger_service: LedgerService::new(connection),
        })
    }
}
