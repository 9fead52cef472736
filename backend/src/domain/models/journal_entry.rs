//! Domain models for journal entries and their lines.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{AdjustmentType, EntryStatus};

/// A journal entry header.
///
/// `total_debit` and `total_credit` are derived from the lines and cached for
/// display; they are recomputed and frozen when the entry is approved. An
/// entry that reaches `Approved` always satisfies
/// `total_debit == total_credit` within the validator tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    /// Sequential human-readable number, allocated at creation.
    pub entry_number: i64,
    pub date: NaiveDate,
    pub description: String,
    pub accounting_period_id: String,
    pub monthly_period_id: String,
    pub status: EntryStatus,
    pub is_adjustment: bool,
    pub adjustment_type: Option<AdjustmentType>,
    /// Entry being corrected; required when `adjustment_type` is `Correction`.
    pub adjusted_entry_id: Option<String>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// Reason recorded when the entry was voided.
    pub void_reason: Option<String>,
}

impl JournalEntry {
    pub fn is_approved(&self) -> bool {
        self.status == EntryStatus::Approved
    }

    /// Only pending entries may be edited or hard-deleted.
    pub fn is_mutable(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    pub fn to_dto(&self) -> shared::JournalEntryDto {
        shared::JournalEntryDto {
            id: self.id.clone(),
            entry_number: self.entry_number,
            date: self.date.format("%Y-%m-%d").to_string(),
            description: self.description.clone(),
            monthly_period_id: self.monthly_period_id.clone(),
            status: self.status,
            is_adjustment: self.is_adjustment,
            adjustment_type: self.adjustment_type,
            adjusted_entry_id: self.adjusted_entry_id.clone(),
            total_debit: self.total_debit,
            total_credit: self.total_credit,
            void_reason: self.void_reason.clone(),
        }
    }
}

/// A single debit or credit movement belonging to one journal entry.
///
/// `amount` is strictly positive; the side is carried by `is_debit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryLine {
    pub id: String,
    pub entry_id: String,
    /// Leaf account this line posts to.
    pub account_id: String,
    pub is_debit: bool,
    pub amount: Decimal,
}

impl JournalEntryLine {
    /// Debit amount of this line (zero for credit lines).
    pub fn debit(&self) -> Decimal {
        if self.is_debit {
            self.amount
        } else {
            Decimal::ZERO
        }
    }

    /// Credit amount of this line (zero for debit lines).
    pub fn credit(&self) -> Decimal {
        if self.is_debit {
            Decimal::ZERO
        } else {
            self.amount
        }
    }
}
