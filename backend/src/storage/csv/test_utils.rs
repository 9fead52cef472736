//! Test utilities providing RAII-based cleanup for CSV storage tests.
//!
//! The temporary directory lives as long as the environment value, so test
//! data disappears even when a test panics.

use anyhow::Result;
use tempfile::TempDir;

use super::connection::CsvConnection;

pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed.
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}
