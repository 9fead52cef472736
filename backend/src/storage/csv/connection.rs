//! CSV storage connection.
//!
//! `CsvConnection` owns the base data directory and the read/rewrite
//! primitives shared by every repository. Writes go to a temp file that is
//! renamed over the target, so a crash mid-write never leaves a half-written
//! file behind. All repositories created from one connection share the same
//! directory; callers construct the connection once and inject it.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Result;
use csv::{Reader, Writer};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::csv::{AccountRepository, JournalRepository, PeriodRepository};
use crate::storage::traits::Connection;

#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a connection rooted at the given directory, creating it if
    /// needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            std::fs::create_dir_all(&base_path)?;
        }
        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub(crate) fn file_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Read every record of a CSV file. A missing or empty file reads as an
    /// empty list.
    pub(crate) fn read_all<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.file_path(file_name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path)?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        let mut records = Vec::new();
        for result in reader.deserialize() {
            records.push(result?);
        }
        Ok(records)
    }

    /// Rewrite a CSV file with the given records, atomically.
    pub(crate) fn write_all<T: Serialize>(&self, file_name: &str, records: &[T]) -> Result<()> {
        let path = self.file_path(file_name);
        let temp_path = path.with_extension("tmp");
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = Writer::from_writer(BufWriter::new(file));
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type AccountRepository = AccountRepository;
    type PeriodRepository = PeriodRepository;
    type JournalRepository = JournalRepository;

    fn create_account_repository(&self) -> AccountRepository {
        AccountRepository::new(self.clone())
    }

    fn create_period_repository(&self) -> PeriodRepository {
        PeriodRepository::new(self.clone())
    }

    fn create_journal_repository(&self) -> JournalRepository {
        JournalRepository::new(self.clone())
    }
}
