//! Journal entry lifecycle service.
//!
//! Owns the `pending -> approved -> voided` state machine. Every write path
//! runs the balance validator and the period gate first; authorization is
//! checked before any transition. Only pending entries are mutable; approved
//! entries can only be voided (soft-cancel with a reason), never edited or
//! hard-deleted. Transitions touching a closed period are rejected outright.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use log::info;
use shared::{EntryLineInput, EntryStatus};
use uuid::Uuid;

use super::balance_validator::{BalanceValidator, ValidationReport};
use super::commands::journal::{CreateEntryCommand, EntryResult, UpdateEntryCommand};
use super::models::account::Account;
use super::models::actor::Actor;
use super::models::journal_entry::{JournalEntry, JournalEntryLine};
use super::models::period::MonthlyPeriod;
use super::period_service::evaluate_entry_date;
use crate::storage::traits::{AccountStorage, Connection, JournalStorage, PeriodStorage};

#[derive(Clone)]
pub struct JournalService<C: Connection> {
    account_repository: C::AccountRepository,
    period_repository: C::PeriodRepository,
    journal_repository: C::JournalRepository,
    validator: BalanceValidator,
}

impl<C: Connection> JournalService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            account_repository: connection.create_account_repository(),
            period_repository: connection.create_period_repository(),
            journal_repository: connection.create_journal_repository(),
            validator: BalanceValidator::default(),
        }
    }

    fn accounts_by_id(&self) -> Result<HashMap<String, Account>> {
        let accounts = self.account_repository.list_accounts()?;
        Ok(accounts.into_iter().map(|a| (a.id.clone(), a)).collect())
    }

    fn open_period(&self, period_id: &str) -> Result<MonthlyPeriod> {
        let period = self
            .period_repository
            .get_monthly_period(period_id)?
            .ok_or_else(|| anyhow!("Monthly period '{}' not found", period_id))?;
        if period.is_closed {
            return Err(anyhow!("Period {} is closed", period.name));
        }
        Ok(period)
    }

    /// Run balance validation for an entry draft without persisting anything.
    /// Forms call this to show every violation at once.
    pub fn preview_validation(&self, command: &CreateEntryCommand) -> Result<ValidationReport> {
        let accounts = self.accounts_by_id()?;
        Ok(self.validator.validate_entry(
            &command.lines,
            &accounts,
            command.is_adjustment,
            command.adjustment_type,
            command.adjusted_entry_id.as_deref(),
        ))
    }

    pub fn create_entry(&self, command: CreateEntryCommand, actor: &Actor) -> Result<EntryResult> {
        self.create_entry_at(command, actor, Local::now().date_naive())
    }

    /// Create a pending entry, with an explicit "today" for the period gate.
    pub fn create_entry_at(
        &self,
        command: CreateEntryCommand,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<EntryResult> {
        if !actor.can_create() {
            return Err(anyhow!("Actor '{}' may not create entries", actor.id));
        }
        if command.description.trim().is_empty() {
            return Err(anyhow!("Description must not be empty"));
        }

        let period = self.open_period(&command.monthly_period_id)?;

        let date_check = evaluate_entry_date(command.date, &period, today);
        if !date_check.valid {
            return Err(anyhow!(
                "{}",
                date_check
                    .message
                    .unwrap_or_else(|| "Entry date rejected".to_string())
            ));
        }

        let report = self.preview_validation(&command)?;
        if !report.valid {
            return Err(anyhow!(
                "Entry is not valid: {}",
                report
                    .violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            ));
        }

        let entry_id = Uuid::new_v4().to_string();
        let entry = JournalEntry {
            id: entry_id.clone(),
            entry_number: self.journal_repository.next_entry_number()?,
            date: command.date,
            description: command.description,
            accounting_period_id: period.accounting_period_id.clone(),
            monthly_period_id: period.id.clone(),
            status: EntryStatus::Pending,
            is_adjustment: command.is_adjustment,
            adjustment_type: command.adjustment_type,
            adjusted_entry_id: command.adjusted_entry_id,
            total_debit: report.totals.debit,
            total_credit: report.totals.credit,
            void_reason: None,
        };
        let lines = materialize_lines(&entry_id, &command.lines);

        self.journal_repository.store_entry(&entry, &lines)?;
        info!(
            "Created entry #{} in period {} ({} lines)",
            entry.entry_number,
            period.name,
            lines.len()
        );

        Ok(EntryResult {
            entry,
            warnings: date_check.message.into_iter().collect(),
        })
    }

    pub fn update_entry(&self, command: UpdateEntryCommand, actor: &Actor) -> Result<EntryResult> {
        self.update_entry_at(command, actor, Local::now().date_naive())
    }

    /// Edit a pending entry. Approved and voided entries are immutable.
    pub fn update_entry_at(
        &self,
        command: UpdateEntryCommand,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<EntryResult> {
        if !actor.can_create() {
            return Err(anyhow!("Actor '{}' may not edit entries", actor.id));
        }

        let mut entry = self.get_existing_entry(&command.entry_id)?;
        if !entry.is_mutable() {
            return Err(anyhow!(
                "Entry #{} is {:?} and cannot be edited",
                entry.entry_number,
                entry.status
            ));
        }

        let period = self.open_period(&entry.monthly_period_id)?;
        let date_check = evaluate_entry_date(command.date, &period, today);
        if !date_check.valid {
            return Err(anyhow!(
                "{}",
                date_check
                    .message
                    .unwrap_or_else(|| "Entry date rejected".to_string())
            ));
        }

        let accounts = self.accounts_by_id()?;
        let report = self.validator.validate_entry(
            &command.lines,
            &accounts,
            entry.is_adjustment,
            entry.adjustment_type,
            entry.adjusted_entry_id.as_deref(),
        );
        if !report.valid {
            return Err(anyhow!(
                "Entry is not valid: {}",
                report
                    .violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            ));
        }

        entry.date = command.date;
        entry.description = command.description;
        entry.total_debit = report.totals.debit;
        entry.total_credit = report.totals.credit;
        let lines = materialize_lines(&entry.id, &command.lines);
        self.journal_repository.update_entry(&entry, Some(&lines))?;

        Ok(EntryResult {
            entry,
            warnings: date_check.message.into_iter().collect(),
        })
    }

    /// Hard-delete a pending entry. Approved entries are never hard-deleted.
    pub fn delete_entry(&self, entry_id: &str, actor: &Actor) -> Result<()> {
        if !actor.can_create() {
            return Err(anyhow!("Actor '{}' may not delete entries", actor.id));
        }
        let entry = self.get_existing_entry(entry_id)?;
        if !entry.is_mutable() {
            return Err(anyhow!(
                "Entry #{} is {:?}; only pending entries can be deleted",
                entry.entry_number,
                entry.status
            ));
        }
        self.open_period(&entry.monthly_period_id)?;
        self.journal_repository.delete_entry(entry_id)?;
        info!("Deleted pending entry #{}", entry.entry_number);
        Ok(())
    }

    pub fn approve_entry(&self, entry_id: &str, actor: &Actor) -> Result<JournalEntry> {
        self.approve_entry_at(entry_id, actor, Local::now().date_naive())
    }

    /// `pending -> approved`. Requires an approver role, a balanced entry and
    /// an open, non-future period. Recomputes and freezes the totals.
    pub fn approve_entry_at(
        &self,
        entry_id: &str,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<JournalEntry> {
        if !actor.can_approve() {
            return Err(anyhow!("Actor '{}' may not approve entries", actor.id));
        }

        let mut entry = self.get_existing_entry(entry_id)?;
        if entry.status != EntryStatus::Pending {
            return Err(anyhow!(
                "Entry #{} is {:?}; only pending entries can be approved",
                entry.entry_number,
                entry.status
            ));
        }

        let period = self.open_period(&entry.monthly_period_id)?;
        if period.is_after_month_of(today) {
            return Err(anyhow!(
                "Period {} has not started yet; cannot approve into it",
                period.name
            ));
        }

        let stored_lines = self.journal_repository.get_entry_lines(entry_id)?;
        let inputs: Vec<EntryLineInput> = stored_lines
            .iter()
            .map(|l| EntryLineInput {
                account_id: l.account_id.clone(),
                is_debit: l.is_debit,
                amount: l.amount,
            })
            .collect();
        let accounts = self.accounts_by_id()?;
        let report = self.validator.validate_entry(
            &inputs,
            &accounts,
            entry.is_adjustment,
            entry.adjustment_type,
            entry.adjusted_entry_id.as_deref(),
        );
        if !report.valid {
            return Err(anyhow!(
                "Entry #{} cannot be approved: {}",
                entry.entry_number,
                report
                    .violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            ));
        }

        entry.status = EntryStatus::Approved;
        entry.total_debit = report.totals.debit;
        entry.total_credit = report.totals.credit;
        self.journal_repository.update_entry(&entry, None)?;
        info!(
            "Approved entry #{} (debit {} / credit {})",
            entry.entry_number, entry.total_debit, entry.total_credit
        );
        Ok(entry)
    }

    /// `approved -> voided`. Soft-cancel with a reason; the entry stays
    /// visible for audit but its lines no longer count toward any balance.
    pub fn void_entry(&self, entry_id: &str, actor: &Actor, reason: &str) -> Result<JournalEntry> {
        if !actor.can_void() {
            return Err(anyhow!("Actor '{}' may not void entries", actor.id));
        }
        if reason.trim().is_empty() {
            return Err(anyhow!("A void reason is required"));
        }

        let mut entry = self.get_existing_entry(entry_id)?;
        if entry.status != EntryStatus::Approved {
            return Err(anyhow!(
                "Entry #{} is {:?}; only approved entries can be voided",
                entry.entry_number,
                entry.status
            ));
        }
        self.open_period(&entry.monthly_period_id)?;

        entry.status = EntryStatus::Voided;
        entry.void_reason = Some(reason.trim().to_string());
        self.journal_repository.update_entry(&entry, None)?;
        info!("Voided entry #{}: {}", entry.entry_number, reason.trim());
        Ok(entry)
    }

    pub fn get_entry(&self, entry_id: &str) -> Result<Option<JournalEntry>> {
        self.journal_repository.get_entry(entry_id)
    }

    pub fn list_entries(&self, monthly_period_id: Option<&str>) -> Result<Vec<JournalEntry>> {
        self.journal_repository.list_entries(monthly_period_id)
    }

    fn get_existing_entry(&self, entry_id: &str) -> Result<JournalEntry> {
        self.journal_repository
            .get_entry(entry_id)?
            .ok_or_else(|| anyhow!("Entry '{}' not found", entry_id))
    }
}

fn materialize_lines(entry_id: &str, inputs: &[EntryLineInput]) -> Vec<JournalEntryLine> {
    inputs
        .iter()
        .map(|input| JournalEntryLine {
            id: Uuid::new_v4().to_string(),
            entry_id: entry_id.to_string(),
            account_id: input.account_id.clone(),
            is_debit: input.is_debit,
            amount: input.amount,
        })
        .collect()
}
