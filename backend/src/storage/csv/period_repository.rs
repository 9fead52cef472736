//! CSV-backed repository for fiscal years and monthly periods.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use log::info;

use super::connection::CsvConnection;
use crate::domain::models::period::{AccountingPeriod, MonthlyPeriod};
use crate::storage::traits::PeriodStorage;

const PERIODS_FILE: &str = "periods.csv";
const MONTHLY_PERIODS_FILE: &str = "monthly_periods.csv";

#[derive(Clone)]
pub struct PeriodRepository {
    connection: CsvConnection,
}

impl PeriodRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl PeriodStorage for PeriodRepository {
    fn store_accounting_period(&self, period: &AccountingPeriod) -> Result<()> {
        let mut periods: Vec<AccountingPeriod> = self.connection.read_all(PERIODS_FILE)?;
        if periods.iter().any(|p| p.id == period.id) {
            return Err(anyhow!("Fiscal year '{}' already exists", period.id));
        }
        periods.push(period.clone());
        self.connection.write_all(PERIODS_FILE, &periods)?;
        info!("Stored fiscal year {}", period.name);
        Ok(())
    }

    fn get_accounting_period(&self, period_id: &str) -> Result<Option<AccountingPeriod>> {
        let periods: Vec<AccountingPeriod> = self.connection.read_all(PERIODS_FILE)?;
        Ok(periods.into_iter().find(|p| p.id == period_id))
    }

    fn list_accounting_periods(&self) -> Result<Vec<AccountingPeriod>> {
        let mut periods: Vec<AccountingPeriod> = self.connection.read_all(PERIODS_FILE)?;
        periods.sort_by_key(|p| p.start_date);
        Ok(periods)
    }

    fn update_accounting_period(&self, period: &AccountingPeriod) -> Result<()> {
        let mut periods: Vec<AccountingPeriod> = self.connection.read_all(PERIODS_FILE)?;
        let slot = periods
            .iter_mut()
            .find(|p| p.id == period.id)
            .ok_or_else(|| anyhow!("Fiscal year '{}' not found", period.id))?;
        *slot = period.clone();
        self.connection.write_all(PERIODS_FILE, &periods)
    }

    fn store_monthly_period(&self, period: &MonthlyPeriod) -> Result<()> {
        let mut periods: Vec<MonthlyPeriod> = self.connection.read_all(MONTHLY_PERIODS_FILE)?;
        if periods.iter().any(|p| p.id == period.id) {
            return Err(anyhow!("Monthly period '{}' already exists", period.id));
        }
        periods.push(period.clone());
        self.connection.write_all(MONTHLY_PERIODS_FILE, &periods)
    }

    fn get_monthly_period(&self, period_id: &str) -> Result<Option<MonthlyPeriod>> {
        let periods: Vec<MonthlyPeriod> = self.connection.read_all(MONTHLY_PERIODS_FILE)?;
        Ok(periods.into_iter().find(|p| p.id == period_id))
    }

    fn list_monthly_periods(
        &self,
        accounting_period_id: Option<&str>,
    ) -> Result<Vec<MonthlyPeriod>> {
        let mut periods: Vec<MonthlyPeriod> = self.connection.read_all(MONTHLY_PERIODS_FILE)?;
        if let Some(fiscal_year_id) = accounting_period_id {
            periods.retain(|p| p.accounting_period_id == fiscal_year_id);
        }
        periods.sort_by_key(|p| p.start_date);
        Ok(periods)
    }

    fn update_monthly_period(&self, period: &MonthlyPeriod) -> Result<()> {
        let mut periods: Vec<MonthlyPeriod> = self.connection.read_all(MONTHLY_PERIODS_FILE)?;
        let slot = periods
            .iter_mut()
            .find(|p| p.id == period.id)
            .ok_or_else(|| anyhow!("Monthly period '{}' not found", period.id))?;
        *slot = period.clone();
        self.connection.write_all(MONTHLY_PERIODS_FILE, &periods)
    }

    fn find_monthly_period_for_date(&self, date: NaiveDate) -> Result<Option<MonthlyPeriod>> {
        let periods: Vec<MonthlyPeriod> = self.connection.read_all(MONTHLY_PERIODS_FILE)?;
        Ok(periods.into_iter().find(|p| p.contains_date(date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn monthly(id: &str, year: i32, month: u32) -> MonthlyPeriod {
        MonthlyPeriod {
            id: id.to_string(),
            accounting_period_id: "fy1".to_string(),
            name: format!("{}-{:02}", year, month),
            month,
            year,
            start_date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(year, month, 28).unwrap(),
            is_closed: false,
            is_active: true,
        }
    }

    #[test]
    fn store_and_find_monthly_period_by_date() {
        let env = TestEnvironment::new().unwrap();
        let repo = PeriodRepository::new(env.connection.clone());

        repo.store_monthly_period(&monthly("mp1", 2026, 3)).unwrap();
        repo.store_monthly_period(&monthly("mp2", 2026, 4)).unwrap();

        let found = repo
            .find_monthly_period_for_date(NaiveDate::from_ymd_opt(2026, 4, 15).unwrap())
            .unwrap();
        assert_eq!(found.unwrap().id, "mp2");

        let none = repo
            .find_monthly_period_for_date(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap())
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn list_filters_by_fiscal_year_and_sorts() {
        let env = TestEnvironment::new().unwrap();
        let repo = PeriodRepository::new(env.connection.clone());

        let mut other = monthly("mp-other", 2026, 1);
        other.accounting_period_id = "fy2".to_string();
        repo.store_monthly_period(&other).unwrap();
        repo.store_monthly_period(&monthly("mp2", 2026, 5)).unwrap();
        repo.store_monthly_period(&monthly("mp1", 2026, 2)).unwrap();

        let ids: Vec<String> = repo
            .list_monthly_periods(Some("fy1"))
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["mp1", "mp2"]);
    }

    #[test]
    fn closing_flag_survives_update() {
        let env = TestEnvironment::new().unwrap();
        let repo = PeriodRepository::new(env.connection.clone());

        let mut period = monthly("mp1", 2026, 3);
        repo.store_monthly_period(&period).unwrap();
        period.is_closed = true;
        repo.update_monthly_period(&period).unwrap();
        assert!(repo.get_monthly_period("mp1").unwrap().unwrap().is_closed);
    }
}
