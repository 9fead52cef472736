//! Shared types for the bookkeeper application.
//!
//! These are the wire-level DTOs exchanged between the backend domain layer
//! and any frontend or transport layer. Dates travel as `YYYY-MM-DD` strings;
//! amounts travel as fixed-point decimals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of an account in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Cost,
    Expense,
    /// Memorandum/order accounts tracked outside the main statements.
    OrderAccount,
}

/// Sign convention of an account.
///
/// Debit-normal accounts (assets, costs, expenses) increase with debits;
/// credit-normal accounts (liabilities, equity, revenue) increase with credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    Debit,
    Credit,
}

/// Lifecycle status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Editable draft; not yet part of any ledger balance.
    Pending,
    /// Posted. Totals are frozen and the lines count toward balances.
    Approved,
    /// Soft-cancelled with a reason; kept for audit, excluded from balances.
    Voided,
}

/// Typed classification of an adjustment entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    Depreciation,
    Amortization,
    Accrual,
    Deferred,
    Inventory,
    Correction,
    Provision,
    Valuation,
    Other,
}

/// An account as exposed to configuration and reporting screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDto {
    pub id: String,
    /// Lexically sortable account code, e.g. "1-01-001".
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub nature: AccountNature,
    /// Parent account id; `None` for root accounts.
    pub parent_id: Option<String>,
    /// Parent accounts aggregate children and never receive postings.
    pub is_parent: bool,
    pub is_active: bool,
}

/// One line of a journal entry as submitted by an entry form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryLineInput {
    pub account_id: String,
    pub is_debit: bool,
    /// Strictly positive amount.
    pub amount: Decimal,
}

/// Request to create a journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    /// Entry date (`YYYY-MM-DD`).
    pub date: String,
    pub description: String,
    pub monthly_period_id: String,
    pub is_adjustment: bool,
    pub adjustment_type: Option<AdjustmentType>,
    /// Entry being corrected; required when `adjustment_type` is `Correction`.
    pub adjusted_entry_id: Option<String>,
    pub lines: Vec<EntryLineInput>,
}

/// Debit/credit totals computed over a set of entry lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceTotals {
    pub debit: Decimal,
    pub credit: Decimal,
    pub difference: Decimal,
}

/// Outcome of balance validation, suitable for direct display.
///
/// `messages` carries one human-readable line per violation so a form can
/// show everything that is wrong at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReportDto {
    pub valid: bool,
    pub messages: Vec<String>,
    pub totals: BalanceTotals,
}

/// Outcome of checking an entry date against its target period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateCheckDto {
    pub valid: bool,
    /// Populated for both rejections and accept-with-warning outcomes.
    pub message: Option<String>,
    /// True when the target period is an already-elapsed month; the UI should
    /// ask for confirmation before posting.
    pub is_previous_period: bool,
}

/// A journal entry as returned to listing and detail screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryDto {
    pub id: String,
    pub entry_number: i64,
    /// Entry date (`YYYY-MM-DD`).
    pub date: String,
    pub description: String,
    pub monthly_period_id: String,
    pub status: EntryStatus,
    pub is_adjustment: bool,
    pub adjustment_type: Option<AdjustmentType>,
    pub adjusted_entry_id: Option<String>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub void_reason: Option<String>,
}

/// One row of the hierarchical general ledger report, already flattened in
/// display order. Expand/collapse state is the UI's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRowDto {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub nature: AccountNature,
    /// Depth in the account tree; roots are level 0.
    pub level: u32,
    pub is_parent: bool,
    pub initial_balance: Decimal,
    pub debits: Decimal,
    pub credits: Decimal,
    pub final_balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_serializes_kebab_case() {
        let json = serde_json::to_string(&AccountType::OrderAccount).unwrap();
        assert_eq!(json, "\"order-account\"");
    }

    #[test]
    fn entry_status_round_trips() {
        for status in [
            EntryStatus::Pending,
            EntryStatus::Approved,
            EntryStatus::Voided,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: EntryStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }
}
