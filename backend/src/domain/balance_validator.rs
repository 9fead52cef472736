//! Balance validation for journal entries.
//!
//! This is the single implementation of the double-entry rules that every
//! entry form variant goes through. It is a pure function over its inputs:
//! rule violations are collected into a [`ValidationReport`] rather than
//! returned as errors, so callers can display every problem at once.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::{AdjustmentType, BalanceTotals, EntryLineInput, ValidationReportDto};
use thiserror::Error;

use super::models::account::Account;

/// Absorbs rounding noise when comparing debit and credit totals. This is a
/// policy constant, not a business invariant; construct a
/// [`BalanceValidator`] with a different tolerance to override it.
pub const DEFAULT_BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// A single rule violation found while validating an entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("An entry needs at least two lines, got {count}")]
    TooFewLines { count: usize },

    #[error("Line {line} has no account")]
    MissingAccount { line: usize },

    #[error("Line {line} references unknown account '{account_id}'")]
    UnknownAccount { line: usize, account_id: String },

    #[error("Line {line} posts to parent account {code}; only leaf accounts accept postings")]
    NonLeafAccount { line: usize, code: String },

    #[error("Line {line} posts to inactive account {code}")]
    InactiveAccount { line: usize, code: String },

    #[error("Line {line} amount must be greater than zero")]
    NonPositiveAmount { line: usize },

    #[error("An entry needs at least one debit line and one credit line")]
    SingleSided,

    #[error("Entry is unbalanced: debits {debit} != credits {credit} (difference {difference})")]
    Unbalanced {
        debit: Decimal,
        credit: Decimal,
        difference: Decimal,
    },

    #[error("Adjustment entries require an adjustment type")]
    MissingAdjustmentType,

    #[error("Correction adjustments must reference the entry being corrected")]
    MissingAdjustedEntry,
}

/// Result of validating an entry's lines. `valid` is true only when
/// `violations` is empty; `totals` is always populated so forms can show a
/// live debit/credit footer even for invalid drafts.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub totals: BalanceTotals,
}

impl ValidationReport {
    pub fn to_dto(&self) -> ValidationReportDto {
        ValidationReportDto {
            valid: self.valid,
            messages: self.violations.iter().map(|v| v.to_string()).collect(),
            totals: self.totals.clone(),
        }
    }
}

/// Stateless validator holding the balance tolerance.
#[derive(Debug, Clone)]
pub struct BalanceValidator {
    tolerance: Decimal,
}

impl Default for BalanceValidator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_BALANCE_TOLERANCE,
        }
    }
}

impl BalanceValidator {
    pub fn new(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Validate the structural and balance rules over a set of entry lines.
    ///
    /// `accounts_by_id` is the chart of accounts as fetched by the caller;
    /// the validator itself performs no I/O.
    pub fn validate(
        &self,
        lines: &[EntryLineInput],
        accounts_by_id: &HashMap<String, Account>,
    ) -> ValidationReport {
        let mut violations = Vec::new();

        if lines.len() < 2 {
            violations.push(Violation::TooFewLines { count: lines.len() });
        }

        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let mut has_debit = false;
        let mut has_credit = false;

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;

            if line.account_id.is_empty() {
                violations.push(Violation::MissingAccount { line: line_no });
            } else {
                match accounts_by_id.get(&line.account_id) {
                    None => violations.push(Violation::UnknownAccount {
                        line: line_no,
                        account_id: line.account_id.clone(),
                    }),
                    Some(account) if account.is_parent => {
                        violations.push(Violation::NonLeafAccount {
                            line: line_no,
                            code: account.code.clone(),
                        });
                    }
                    Some(account) if !account.is_active => {
                        violations.push(Violation::InactiveAccount {
                            line: line_no,
                            code: account.code.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }

            if line.amount <= Decimal::ZERO {
                violations.push(Violation::NonPositiveAmount { line: line_no });
            }

            if line.is_debit {
                total_debit += line.amount;
                has_debit = true;
            } else {
                total_credit += line.amount;
                has_credit = true;
            }
        }

        if !lines.is_empty() && (!has_debit || !has_credit) {
            violations.push(Violation::SingleSided);
        }

        let difference = (total_debit - total_credit).abs();
        if difference >= self.tolerance {
            violations.push(Violation::Unbalanced {
                debit: total_debit,
                credit: total_credit,
                difference,
            });
        }

        ValidationReport {
            valid: violations.is_empty(),
            violations,
            totals: BalanceTotals {
                debit: total_debit,
                credit: total_credit,
                difference,
            },
        }
    }

    /// Additional checks for entries flagged as adjustments.
    pub fn validate_adjustment(
        &self,
        is_adjustment: bool,
        adjustment_type: Option<AdjustmentType>,
        adjusted_entry_id: Option<&str>,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        if !is_adjustment {
            return violations;
        }
        match adjustment_type {
            None => violations.push(Violation::MissingAdjustmentType),
            Some(AdjustmentType::Correction) => {
                if adjusted_entry_id.map_or(true, |id| id.is_empty()) {
                    violations.push(Violation::MissingAdjustedEntry);
                }
            }
            Some(_) => {}
        }
        violations
    }

    /// Full entry validation: structural + balance rules plus the adjustment
    /// extension, merged into one report.
    pub fn validate_entry(
        &self,
        lines: &[EntryLineInput],
        accounts_by_id: &HashMap<String, Account>,
        is_adjustment: bool,
        adjustment_type: Option<AdjustmentType>,
        adjusted_entry_id: Option<&str>,
    ) -> ValidationReport {
        let mut report = self.validate(lines, accounts_by_id);
        let adjustment_violations =
            self.validate_adjustment(is_adjustment, adjustment_type, adjusted_entry_id);
        if !adjustment_violations.is_empty() {
            report.violations.extend(adjustment_violations);
            report.valid = false;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AccountNature, AccountType};

    fn leaf(id: &str, code: &str, nature: AccountNature) -> Account {
        Account {
            id: id.to_string(),
            code: code.to_string(),
            name: code.to_string(),
            account_type: AccountType::Asset,
            nature,
            parent_id: None,
            is_parent: false,
            is_active: true,
        }
    }

    fn chart() -> HashMap<String, Account> {
        let mut accounts = HashMap::new();
        accounts.insert(
            "cash".to_string(),
            leaf("cash", "1-01-001", AccountNature::Debit),
        );
        accounts.insert(
            "payables".to_string(),
            leaf("payables", "2-01-001", AccountNature::Credit),
        );
        let mut parent = leaf("assets", "1", AccountNature::Debit);
        parent.is_parent = true;
        accounts.insert("assets".to_string(), parent);
        accounts
    }

    fn line(account: &str, is_debit: bool, amount: Decimal) -> EntryLineInput {
        EntryLineInput {
            account_id: account.to_string(),
            is_debit,
            amount,
        }
    }

    #[test]
    fn balanced_entry_is_valid() {
        let validator = BalanceValidator::default();
        let lines = vec![
            line("cash", true, dec!(1000)),
            line("payables", false, dec!(1000)),
        ];
        let report = validator.validate(&lines, &chart());
        assert!(report.valid, "violations: {:?}", report.violations);
        assert_eq!(report.totals.difference, Decimal::ZERO);
    }

    #[test]
    fn validation_is_idempotent() {
        let validator = BalanceValidator::default();
        let lines = vec![
            line("cash", true, dec!(250.50)),
            line("payables", false, dec!(250.49)),
        ];
        let first = validator.validate(&lines, &chart());
        let second = validator.validate(&lines, &chart());
        assert_eq!(first, second);
    }

    #[test]
    fn difference_below_tolerance_is_balanced() {
        let validator = BalanceValidator::default();
        let lines = vec![
            line("cash", true, dec!(10.009999)),
            line("payables", false, dec!(10.00)),
        ];
        let report = validator.validate(&lines, &chart());
        assert!(report.valid, "violations: {:?}", report.violations);
        assert_eq!(report.totals.difference, dec!(0.009999));
    }

    #[test]
    fn difference_at_tolerance_is_unbalanced() {
        let validator = BalanceValidator::default();
        let lines = vec![
            line("cash", true, dec!(10.01)),
            line("payables", false, dec!(10.00)),
        ];
        let report = validator.validate(&lines, &chart());
        assert!(!report.valid);
        assert!(matches!(
            report.violations.as_slice(),
            [Violation::Unbalanced { .. }]
        ));
    }

    #[test]
    fn single_line_entry_collects_both_violations() {
        let validator = BalanceValidator::default();
        let lines = vec![line("cash", true, dec!(100))];
        let report = validator.validate(&lines, &chart());
        assert!(!report.valid);
        assert!(report.violations.contains(&Violation::TooFewLines { count: 1 }));
        assert!(report.violations.contains(&Violation::SingleSided));
    }

    #[test]
    fn parent_account_reference_is_rejected() {
        let validator = BalanceValidator::default();
        let lines = vec![
            line("assets", true, dec!(100)),
            line("payables", false, dec!(100)),
        ];
        let report = validator.validate(&lines, &chart());
        assert!(report.violations.iter().any(|v| matches!(
            v,
            Violation::NonLeafAccount { line: 1, .. }
        )));
    }

    #[test]
    fn unknown_account_and_non_positive_amount_are_reported_per_line() {
        let validator = BalanceValidator::default();
        let lines = vec![
            line("nope", true, dec!(0)),
            line("payables", false, dec!(100)),
        ];
        let report = validator.validate(&lines, &chart());
        assert!(report
            .violations
            .contains(&Violation::NonPositiveAmount { line: 1 }));
        assert!(report.violations.iter().any(|v| matches!(
            v,
            Violation::UnknownAccount { line: 1, .. }
        )));
    }

    #[test]
    fn empty_account_reference_is_reported() {
        let validator = BalanceValidator::default();
        let lines = vec![
            line("", true, dec!(100)),
            line("payables", false, dec!(100)),
        ];
        let report = validator.validate(&lines, &chart());
        assert!(report
            .violations
            .contains(&Violation::MissingAccount { line: 1 }));
    }

    #[test]
    fn adjustment_requires_type() {
        let validator = BalanceValidator::default();
        let violations = validator.validate_adjustment(true, None, None);
        assert_eq!(violations, vec![Violation::MissingAdjustmentType]);
    }

    #[test]
    fn correction_requires_adjusted_entry() {
        let validator = BalanceValidator::default();
        let violations =
            validator.validate_adjustment(true, Some(AdjustmentType::Correction), None);
        assert_eq!(violations, vec![Violation::MissingAdjustedEntry]);

        let ok = validator.validate_adjustment(
            true,
            Some(AdjustmentType::Correction),
            Some("entry-1"),
        );
        assert!(ok.is_empty());
    }

    #[test]
    fn non_adjustment_skips_adjustment_checks() {
        let validator = BalanceValidator::default();
        assert!(validator.validate_adjustment(false, None, None).is_empty());
    }

    #[test]
    fn custom_tolerance_is_respected() {
        let validator = BalanceValidator::new(dec!(0.05));
        let lines = vec![
            line("cash", true, dec!(10.04)),
            line("payables", false, dec!(10.00)),
        ];
        let report = validator.validate(&lines, &chart());
        assert!(report.valid, "violations: {:?}", report.violations);
    }
}
