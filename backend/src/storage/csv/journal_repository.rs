//! CSV-backed journal entry repository.
//!
//! Entry headers live in `entries.csv`, lines in `entry_lines.csv`. Header
//! and line mutations for one entry always happen within a single call so a
//! caller never observes an entry without its lines. Multi-process use needs
//! a transactional backend behind the same trait.

use anyhow::{anyhow, Result};
use log::info;
use shared::EntryStatus;

use super::connection::CsvConnection;
use crate::domain::models::journal_entry::{JournalEntry, JournalEntryLine};
use crate::storage::traits::JournalStorage;

const ENTRIES_FILE: &str = "entries.csv";
const ENTRY_LINES_FILE: &str = "entry_lines.csv";

#[derive(Clone)]
pub struct JournalRepository {
    connection: CsvConnection,
}

impl JournalRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_entries(&self) -> Result<Vec<JournalEntry>> {
        self.connection.read_all(ENTRIES_FILE)
    }

    fn read_lines(&self) -> Result<Vec<JournalEntryLine>> {
        self.connection.read_all(ENTRY_LINES_FILE)
    }

    /// Lines of entries matching the given filter over headers.
    fn lines_matching<F>(&self, filter: F) -> Result<Vec<JournalEntryLine>>
    where
        F: Fn(&JournalEntry) -> bool,
    {
        let entries = self.read_entries()?;
        let matching_ids: std::collections::HashSet<&str> = entries
            .iter()
            .filter(|e| filter(e))
            .map(|e| e.id.as_str())
            .collect();
        let lines = self.read_lines()?;
        Ok(lines
            .into_iter()
            .filter(|l| matching_ids.contains(l.entry_id.as_str()))
            .collect())
    }
}

fn status_allowed(status: EntryStatus, approved_only: bool, exclude_voided: bool) -> bool {
    match status {
        EntryStatus::Pending => !approved_only,
        EntryStatus::Approved => true,
        EntryStatus::Voided => !exclude_voided,
    }
}

impl JournalStorage for JournalRepository {
    fn store_entry(&self, entry: &JournalEntry, lines: &[JournalEntryLine]) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(anyhow!("Entry '{}' already exists", entry.id));
        }
        let mut all_lines = self.read_lines()?;
        all_lines.extend(lines.iter().cloned());
        entries.push(entry.clone());

        // Lines first: an entry header without lines would look like an
        // empty balanced entry to readers.
        self.connection.write_all(ENTRY_LINES_FILE, &all_lines)?;
        self.connection.write_all(ENTRIES_FILE, &entries)?;
        info!(
            "Stored entry #{} with {} lines",
            entry.entry_number,
            lines.len()
        );
        Ok(())
    }

    fn get_entry(&self, entry_id: &str) -> Result<Option<JournalEntry>> {
        let entries = self.read_entries()?;
        Ok(entries.into_iter().find(|e| e.id == entry_id))
    }

    fn get_entry_lines(&self, entry_id: &str) -> Result<Vec<JournalEntryLine>> {
        let lines = self.read_lines()?;
        Ok(lines.into_iter().filter(|l| l.entry_id == entry_id).collect())
    }

    fn list_entries(&self, monthly_period_id: Option<&str>) -> Result<Vec<JournalEntry>> {
        let mut entries = self.read_entries()?;
        if let Some(period_id) = monthly_period_id {
            entries.retain(|e| e.monthly_period_id == period_id);
        }
        entries.sort_by_key(|e| e.entry_number);
        Ok(entries)
    }

    fn update_entry(
        &self,
        entry: &JournalEntry,
        lines: Option<&[JournalEntryLine]>,
    ) -> Result<()> {
        let mut entries = self.read_entries()?;
        let slot = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| anyhow!("Entry '{}' not found", entry.id))?;
        *slot = entry.clone();

        if let Some(new_lines) = lines {
            let mut all_lines = self.read_lines()?;
            all_lines.retain(|l| l.entry_id != entry.id);
            all_lines.extend(new_lines.iter().cloned());
            self.connection.write_all(ENTRY_LINES_FILE, &all_lines)?;
        }
        self.connection.write_all(ENTRIES_FILE, &entries)
    }

    fn delete_entry(&self, entry_id: &str) -> Result<bool> {
        let mut entries = self.read_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        if entries.len() == before {
            return Ok(false);
        }
        let mut all_lines = self.read_lines()?;
        all_lines.retain(|l| l.entry_id != entry_id);

        self.connection.write_all(ENTRIES_FILE, &entries)?;
        self.connection.write_all(ENTRY_LINES_FILE, &all_lines)?;
        info!("Deleted entry {}", entry_id);
        Ok(true)
    }

    fn next_entry_number(&self) -> Result<i64> {
        let entries = self.read_entries()?;
        Ok(entries.iter().map(|e| e.entry_number).max().unwrap_or(0) + 1)
    }

    fn lines_for_period(
        &self,
        monthly_period_id: &str,
        approved_only: bool,
        exclude_voided: bool,
    ) -> Result<Vec<JournalEntryLine>> {
        self.lines_matching(|e| {
            e.monthly_period_id == monthly_period_id
                && status_allowed(e.status, approved_only, exclude_voided)
        })
    }

    fn lines_for_periods(
        &self,
        monthly_period_ids: &[&str],
        approved_only: bool,
        exclude_voided: bool,
    ) -> Result<Vec<JournalEntryLine>> {
        let wanted: std::collections::HashSet<&str> =
            monthly_period_ids.iter().copied().collect();
        self.lines_matching(|e| {
            wanted.contains(e.monthly_period_id.as_str())
                && status_allowed(e.status, approved_only, exclude_voided)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(id: &str, number: i64, period: &str, status: EntryStatus) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            entry_number: number,
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            description: format!("Entry {}", number),
            accounting_period_id: "fy1".to_string(),
            monthly_period_id: period.to_string(),
            status,
            is_adjustment: false,
            adjustment_type: None,
            adjusted_entry_id: None,
            total_debit: dec!(100),
            total_credit: dec!(100),
            void_reason: None,
        }
    }

    fn lines_for(entry_id: &str) -> Vec<JournalEntryLine> {
        vec![
            JournalEntryLine {
                id: format!("{}-l1", entry_id),
                entry_id: entry_id.to_string(),
                account_id: "cash".to_string(),
                is_debit: true,
                amount: dec!(100),
            },
            JournalEntryLine {
                id: format!("{}-l2", entry_id),
                entry_id: entry_id.to_string(),
                account_id: "payables".to_string(),
                is_debit: false,
                amount: dec!(100),
            },
        ]
    }

    #[test]
    fn store_and_read_entry_with_lines() {
        let env = TestEnvironment::new().unwrap();
        let repo = JournalRepository::new(env.connection.clone());

        repo.store_entry(&entry("e1", 1, "mp1", EntryStatus::Pending), &lines_for("e1"))
            .unwrap();

        let stored = repo.get_entry("e1").unwrap().unwrap();
        assert_eq!(stored.entry_number, 1);
        assert_eq!(repo.get_entry_lines("e1").unwrap().len(), 2);
    }

    #[test]
    fn entry_numbers_are_sequential() {
        let env = TestEnvironment::new().unwrap();
        let repo = JournalRepository::new(env.connection.clone());

        assert_eq!(repo.next_entry_number().unwrap(), 1);
        repo.store_entry(&entry("e1", 1, "mp1", EntryStatus::Pending), &lines_for("e1"))
            .unwrap();
        repo.store_entry(&entry("e2", 2, "mp1", EntryStatus::Pending), &lines_for("e2"))
            .unwrap();
        assert_eq!(repo.next_entry_number().unwrap(), 3);
    }

    #[test]
    fn delete_removes_header_and_lines() {
        let env = TestEnvironment::new().unwrap();
        let repo = JournalRepository::new(env.connection.clone());

        repo.store_entry(&entry("e1", 1, "mp1", EntryStatus::Pending), &lines_for("e1"))
            .unwrap();
        assert!(repo.delete_entry("e1").unwrap());
        assert!(repo.get_entry("e1").unwrap().is_none());
        assert!(repo.get_entry_lines("e1").unwrap().is_empty());
        assert!(!repo.delete_entry("e1").unwrap());
    }

    #[test]
    fn period_line_fetch_honors_status_filters() {
        let env = TestEnvironment::new().unwrap();
        let repo = JournalRepository::new(env.connection.clone());

        repo.store_entry(&entry("e1", 1, "mp1", EntryStatus::Approved), &lines_for("e1"))
            .unwrap();
        repo.store_entry(&entry("e2", 2, "mp1", EntryStatus::Pending), &lines_for("e2"))
            .unwrap();
        repo.store_entry(&entry("e3", 3, "mp1", EntryStatus::Voided), &lines_for("e3"))
            .unwrap();
        repo.store_entry(&entry("e4", 4, "mp2", EntryStatus::Approved), &lines_for("e4"))
            .unwrap();

        let posted = repo.lines_for_period("mp1", true, true).unwrap();
        assert_eq!(posted.len(), 2);
        assert!(posted.iter().all(|l| l.entry_id == "e1"));

        let with_pending = repo.lines_for_period("mp1", false, true).unwrap();
        assert_eq!(with_pending.len(), 4);

        let with_voided = repo.lines_for_period("mp1", true, false).unwrap();
        assert_eq!(with_voided.len(), 4);
    }

    #[test]
    fn lines_for_periods_selects_by_membership_not_date() {
        let env = TestEnvironment::new().unwrap();
        let repo = JournalRepository::new(env.connection.clone());

        // Same entry date, different period assignments; only membership
        // decides which fetch a line lands in.
        repo.store_entry(&entry("e1", 1, "mp1", EntryStatus::Approved), &lines_for("e1"))
            .unwrap();
        repo.store_entry(&entry("e2", 2, "mp2", EntryStatus::Approved), &lines_for("e2"))
            .unwrap();

        let lines = repo.lines_for_periods(&["mp1"], true, true).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.entry_id == "e1"));

        let both = repo.lines_for_periods(&["mp1", "mp2"], true, true).unwrap();
        assert_eq!(both.len(), 4);

        assert!(repo.lines_for_periods(&[], true, true).unwrap().is_empty());
    }

    #[test]
    fn update_replaces_lines_when_given() {
        let env = TestEnvironment::new().unwrap();
        let repo = JournalRepository::new(env.connection.clone());

        let mut e = entry("e1", 1, "mp1", EntryStatus::Pending);
        repo.store_entry(&e, &lines_for("e1")).unwrap();

        e.description = "Edited".to_string();
        let new_lines = vec![JournalEntryLine {
            id: "e1-l9".to_string(),
            entry_id: "e1".to_string(),
            account_id: "cash".to_string(),
            is_debit: true,
            amount: dec!(55),
        }];
        repo.update_entry(&e, Some(&new_lines)).unwrap();

        assert_eq!(repo.get_entry("e1").unwrap().unwrap().description, "Edited");
        let stored_lines = repo.get_entry_lines("e1").unwrap();
        assert_eq!(stored_lines.len(), 1);
        assert_eq!(stored_lines[0].amount, dec!(55));
    }
}
