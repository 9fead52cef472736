//! Accounting period management and the entry-date gate.
//!
//! The gate itself ([`evaluate_entry_date`]) is a pure function: it receives
//! the period metadata and "today" from the caller and never touches storage
//! or the system clock. All date logic is calendar arithmetic on `NaiveDate`
//! and `(year, month)` tuples, so the outcome cannot shift with the host
//! timezone.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate};
use log::info;
use shared::{DateCheckDto, EntryStatus};
use uuid::Uuid;

use super::models::period::{last_day_of_month, AccountingPeriod, MonthlyPeriod};
use crate::storage::traits::{Connection, JournalStorage, PeriodStorage};

/// Where an entry-date-vs-period evaluation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Date is after today; never allowed.
    RejectedFutureDate,
    /// Target period's month is after the current month; never allowed.
    RejectedFuturePeriod,
    /// Target period is closed; never allowed.
    RejectedClosedPeriod,
    /// Date and period line up with the current month.
    AcceptedCurrentPeriod,
    /// Period is an already-elapsed month; allowed, caller should confirm.
    AcceptedPreviousPeriod,
    /// Date falls outside the period's range; allowed with a warning.
    AcceptedOutOfRange,
}

impl GateOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(
            self,
            GateOutcome::AcceptedCurrentPeriod
                | GateOutcome::AcceptedPreviousPeriod
                | GateOutcome::AcceptedOutOfRange
        )
    }
}

/// Result of the entry-date gate.
#[derive(Debug, Clone, PartialEq)]
pub struct DateCheck {
    pub outcome: GateOutcome,
    pub valid: bool,
    /// Populated for rejections and for accept-with-warning outcomes.
    pub message: Option<String>,
    /// True when the target period precedes the current month.
    pub is_previous_period: bool,
}

impl DateCheck {
    fn rejected(outcome: GateOutcome, message: String) -> Self {
        Self {
            outcome,
            valid: false,
            message: Some(message),
            is_previous_period: false,
        }
    }

    pub fn to_dto(&self) -> DateCheckDto {
        DateCheckDto {
            valid: self.valid,
            message: self.message.clone(),
            is_previous_period: self.is_previous_period,
        }
    }
}

/// Evaluate whether an entry dated `date` may target `period`, given `today`.
///
/// Hard rejections: future dates, future periods, closed periods. Backdated
/// work is allowed but surfaced: posting into an elapsed month or dating an
/// entry outside the period's range both come back accepted with a warning.
pub fn evaluate_entry_date(
    date: NaiveDate,
    period: &MonthlyPeriod,
    today: NaiveDate,
) -> DateCheck {
    if date > today {
        return DateCheck::rejected(
            GateOutcome::RejectedFutureDate,
            format!("Entry date {} is in the future", date),
        );
    }

    if period.is_closed {
        return DateCheck::rejected(
            GateOutcome::RejectedClosedPeriod,
            format!("Period {} is closed", period.name),
        );
    }

    if period.is_after_month_of(today) {
        return DateCheck::rejected(
            GateOutcome::RejectedFuturePeriod,
            format!("Period {} has not started yet", period.name),
        );
    }

    let is_previous_period = period.is_before_month_of(today);

    if !period.contains_date(date) {
        return DateCheck {
            outcome: GateOutcome::AcceptedOutOfRange,
            valid: true,
            message: Some(format!(
                "Date {} falls outside period {} ({} to {})",
                date, period.name, period.start_date, period.end_date
            )),
            is_previous_period,
        };
    }

    if is_previous_period {
        return DateCheck {
            outcome: GateOutcome::AcceptedPreviousPeriod,
            valid: true,
            message: Some(format!(
                "Period {} is already elapsed; confirm before posting",
                period.name
            )),
            is_previous_period: true,
        };
    }

    DateCheck {
        outcome: GateOutcome::AcceptedCurrentPeriod,
        valid: true,
        message: None,
        is_previous_period: false,
    }
}

/// Service owning fiscal years and their monthly periods.
#[derive(Clone)]
pub struct PeriodService<C: Connection> {
    period_repository: C::PeriodRepository,
    journal_repository: C::JournalRepository,
}

impl<C: Connection> PeriodService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            period_repository: connection.create_period_repository(),
            journal_repository: connection.create_journal_repository(),
        }
    }

    /// Create a fiscal year and auto-generate its monthly periods, aligned to
    /// calendar month boundaries (1st through last day of each month).
    pub fn create_fiscal_year(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AccountingPeriod> {
        if end_date < start_date {
            return Err(anyhow!(
                "Fiscal year end {} precedes start {}",
                end_date,
                start_date
            ));
        }

        let fiscal_year = AccountingPeriod {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            start_date,
            end_date,
            is_closed: false,
            is_active: true,
        };
        self.period_repository
            .store_accounting_period(&fiscal_year)?;

        let mut year = start_date.year();
        let mut month = start_date.month();
        loop {
            let month_start = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| anyhow!("Invalid month {}-{}", year, month))?;
            if month_start > end_date {
                break;
            }
            let month_end = last_day_of_month(year, month)
                .and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
                .ok_or_else(|| anyhow!("Invalid month {}-{}", year, month))?;

            let period = MonthlyPeriod {
                id: Uuid::new_v4().to_string(),
                accounting_period_id: fiscal_year.id.clone(),
                name: format!("{} {}", month_name(month), year),
                month,
                year,
                start_date: month_start,
                end_date: month_end,
                is_closed: false,
                is_active: true,
            };
            self.period_repository.store_monthly_period(&period)?;

            if month == 12 {
                month = 1;
                year += 1;
            } else {
                month += 1;
            }
        }

        info!(
            "Created fiscal year {} ({} to {})",
            fiscal_year.name, start_date, end_date
        );
        Ok(fiscal_year)
    }

    pub fn get_monthly_period(&self, period_id: &str) -> Result<Option<MonthlyPeriod>> {
        self.period_repository.get_monthly_period(period_id)
    }

    pub fn list_monthly_periods(
        &self,
        accounting_period_id: Option<&str>,
    ) -> Result<Vec<MonthlyPeriod>> {
        self.period_repository
            .list_monthly_periods(accounting_period_id)
    }

    pub fn find_period_for_date(&self, date: NaiveDate) -> Result<Option<MonthlyPeriod>> {
        self.period_repository.find_monthly_period_for_date(date)
    }

    /// Run the entry-date gate against a stored period, using the local date.
    pub fn check_entry_date(&self, date: NaiveDate, period_id: &str) -> Result<DateCheck> {
        self.check_entry_date_at(date, period_id, Local::now().date_naive())
    }

    /// Same as [`check_entry_date`](Self::check_entry_date) with an explicit
    /// "today", so callers and tests can pin the clock.
    pub fn check_entry_date_at(
        &self,
        date: NaiveDate,
        period_id: &str,
        today: NaiveDate,
    ) -> Result<DateCheck> {
        let period = self
            .period_repository
            .get_monthly_period(period_id)?
            .ok_or_else(|| anyhow!("Monthly period '{}' not found", period_id))?;
        Ok(evaluate_entry_date(date, &period, today))
    }

    /// Close a monthly period. Refused while the period still holds pending
    /// entries or an approved entry with unbalanced cached totals; once
    /// closed, the period accepts no postings or transitions.
    pub fn close_monthly_period(&self, period_id: &str) -> Result<MonthlyPeriod> {
        let mut period = self
            .period_repository
            .get_monthly_period(period_id)?
            .ok_or_else(|| anyhow!("Monthly period '{}' not found", period_id))?;

        if period.is_closed {
            return Err(anyhow!("Period {} is already closed", period.name));
        }

        let entries = self.journal_repository.list_entries(Some(period_id))?;
        let pending = entries
            .iter()
            .filter(|e| e.status == EntryStatus::Pending)
            .count();
        if pending > 0 {
            return Err(anyhow!(
                "Cannot close period {}: {} pending entries remain",
                period.name,
                pending
            ));
        }
        if let Some(entry) = entries.iter().find(|e| {
            e.is_approved()
                && (e.total_debit - e.total_credit).abs()
                    >= super::balance_validator::DEFAULT_BALANCE_TOLERANCE
        }) {
            return Err(anyhow!(
                "Cannot close period {}: entry {} is unbalanced",
                period.name,
                entry.entry_number
            ));
        }

        period.is_closed = true;
        self.period_repository.update_monthly_period(&period)?;
        info!("Closed period {}", period.name);
        Ok(period)
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_period(year: i32, month: u32) -> MonthlyPeriod {
        let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        let end =
            NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month).unwrap()).unwrap();
        MonthlyPeriod {
            id: format!("mp-{}-{:02}", year, month),
            accounting_period_id: "fy".to_string(),
            name: format!("{} {}", month_name(month), year),
            month,
            year,
            start_date: start,
            end_date: end,
            is_closed: false,
            is_active: true,
        }
    }

    // Fixed reference date so outcomes never depend on the host clock.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
    }

    #[test]
    fn today_in_current_open_period_is_accepted_clean() {
        let check = evaluate_entry_date(today(), &open_period(2026, 8), today());
        assert_eq!(check.outcome, GateOutcome::AcceptedCurrentPeriod);
        assert!(check.outcome.is_accepted());
        assert!(check.valid);
        assert!(check.message.is_none());
        assert!(!check.is_previous_period);
    }

    #[test]
    fn tomorrow_is_rejected_for_any_period() {
        let tomorrow = today().succ_opt().unwrap();
        let check = evaluate_entry_date(tomorrow, &open_period(2026, 8), today());
        assert_eq!(check.outcome, GateOutcome::RejectedFutureDate);
        assert!(!check.valid);
    }

    #[test]
    fn next_month_period_is_rejected() {
        let check = evaluate_entry_date(today(), &open_period(2026, 9), today());
        assert_eq!(check.outcome, GateOutcome::RejectedFuturePeriod);
        assert!(!check.valid);
    }

    #[test]
    fn two_months_ago_is_accepted_as_previous_period() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
        let check = evaluate_entry_date(date, &open_period(2026, 6), today());
        assert_eq!(check.outcome, GateOutcome::AcceptedPreviousPeriod);
        assert!(check.valid);
        assert!(check.is_previous_period);
        assert!(check.message.is_some());
    }

    #[test]
    fn day_before_period_start_warns_out_of_range() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 31).unwrap();
        let check = evaluate_entry_date(date, &open_period(2026, 8), today());
        assert_eq!(check.outcome, GateOutcome::AcceptedOutOfRange);
        assert!(check.valid);
        assert!(check.message.is_some());
        assert!(!check.is_previous_period);
    }

    #[test]
    fn closed_period_is_rejected_even_for_valid_dates() {
        let mut period = open_period(2026, 8);
        period.is_closed = true;
        let check = evaluate_entry_date(today(), &period, today());
        assert_eq!(check.outcome, GateOutcome::RejectedClosedPeriod);
        assert!(!check.valid);
    }

    #[test]
    fn future_date_wins_over_future_period() {
        // Both conditions hold; the date check fires first.
        let date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        let check = evaluate_entry_date(date, &open_period(2026, 9), today());
        assert_eq!(check.outcome, GateOutcome::RejectedFutureDate);
    }

    #[test]
    fn december_to_january_boundary_is_a_previous_period() {
        // January 2027 viewed from February 2027, crossing no year boundary,
        // and December 2026 viewed from January 2027, crossing one.
        let jan_today = NaiveDate::from_ymd_opt(2027, 1, 10).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 12, 20).unwrap();
        let check = evaluate_entry_date(date, &open_period(2026, 12), jan_today);
        assert_eq!(check.outcome, GateOutcome::AcceptedPreviousPeriod);
        assert!(check.is_previous_period);
    }
}
