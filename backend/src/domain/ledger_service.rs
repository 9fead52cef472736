//! Hierarchical general ledger aggregation.
//!
//! [`build_ledger`] is pure: it takes the chart of accounts plus the already
//! fetched prior-period and current-period lines and produces the account
//! tree with initial balances, period movements and final balances. Parent
//! totals are always the exact sum of their subtree; they have no source of
//! truth of their own. [`LedgerService`] wraps it with the storage fetches,
//! feeding in only lines of approved, non-voided entries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::warn;
use rust_decimal::Decimal;
use shared::{AccountNature, LedgerRowDto};

use super::models::account::Account;
use super::models::journal_entry::JournalEntryLine;
use crate::storage::traits::{AccountStorage, Connection, JournalStorage, PeriodStorage};

/// One node of the hierarchical ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerAccount {
    pub account: Account,
    /// Depth in the tree; roots are level 0.
    pub level: u32,
    /// Balance carried into the period, expressed in the account's natural
    /// positive direction.
    pub initial_balance: Decimal,
    /// Raw debit total of the period.
    pub debits: Decimal,
    /// Raw credit total of the period.
    pub credits: Decimal,
    pub final_balance: Decimal,
    pub children: Vec<LedgerAccount>,
}

/// Per-account debit/credit sums over a set of lines.
struct LineSums {
    by_account: HashMap<String, (Decimal, Decimal)>,
}

impl LineSums {
    fn new(lines: &[JournalEntryLine]) -> Self {
        let mut by_account: HashMap<String, (Decimal, Decimal)> = HashMap::new();
        for line in lines {
            let sums = by_account
                .entry(line.account_id.clone())
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            if line.is_debit {
                sums.0 += line.amount;
            } else {
                sums.1 += line.amount;
            }
        }
        Self { by_account }
    }

    fn debits_credits(&self, account_id: &str) -> (Decimal, Decimal) {
        self.by_account
            .get(account_id)
            .copied()
            .unwrap_or((Decimal::ZERO, Decimal::ZERO))
    }
}

/// Build the hierarchical ledger for one period.
///
/// Accounts with a missing or cyclic parent are kept rather than dropped:
/// they are promoted to roots and logged as anomalies, so malformed data can
/// never make the walk recurse forever or lose postings.
pub fn build_ledger(
    accounts: &[Account],
    prior_lines: &[JournalEntryLine],
    current_lines: &[JournalEntryLine],
) -> Vec<LedgerAccount> {
    let ids: HashSet<&str> = accounts.iter().map(|a| a.id.as_str()).collect();

    let mut children_of: HashMap<&str, Vec<&Account>> = HashMap::new();
    let mut roots: Vec<&Account> = Vec::new();
    for account in accounts {
        match account.parent_id.as_deref() {
            None => roots.push(account),
            Some(parent_id) if !ids.contains(parent_id) => {
                warn!(
                    "Account {} references missing parent '{}'; treating as root",
                    account.code, parent_id
                );
                roots.push(account);
            }
            Some(parent_id) => children_of.entry(parent_id).or_default().push(account),
        }
    }
    roots.sort_by(|a, b| a.code.cmp(&b.code));
    for siblings in children_of.values_mut() {
        siblings.sort_by(|a, b| a.code.cmp(&b.code));
    }

    let prior = LineSums::new(prior_lines);
    let current = LineSums::new(current_lines);

    let mut visited: HashSet<String> = HashSet::new();
    let mut tree: Vec<LedgerAccount> = roots
        .iter()
        .map(|root| build_node(root, 0, &children_of, &prior, &current, &mut visited))
        .collect();

    // Cycle members are unreachable from any root; promote them so their
    // postings still appear.
    loop {
        let mut orphans: Vec<&Account> = accounts
            .iter()
            .filter(|a| !visited.contains(&a.id))
            .collect();
        if orphans.is_empty() {
            break;
        }
        orphans.sort_by(|a, b| a.code.cmp(&b.code));
        let orphan = orphans[0];
        warn!(
            "Account {} is part of a parent cycle; treating as root",
            orphan.code
        );
        tree.push(build_node(
            orphan,
            0,
            &children_of,
            &prior,
            &current,
            &mut visited,
        ));
        tree.sort_by(|a, b| a.account.code.cmp(&b.account.code));
    }

    tree
}

fn build_node(
    account: &Account,
    level: u32,
    children_of: &HashMap<&str, Vec<&Account>>,
    prior: &LineSums,
    current: &LineSums,
    visited: &mut HashSet<String>,
) -> LedgerAccount {
    visited.insert(account.id.clone());

    let mut children: Vec<LedgerAccount> = Vec::new();
    if let Some(siblings) = children_of.get(account.id.as_str()) {
        for child in siblings {
            if visited.contains(&child.id) {
                warn!(
                    "Account {} already placed in the tree; skipping duplicate link under {}",
                    child.code, account.code
                );
                continue;
            }
            children.push(build_node(
                child,
                level + 1,
                children_of,
                prior,
                current,
                visited,
            ));
        }
    }

    let (initial_balance, debits, credits) = if children.is_empty() {
        if account.is_postable() {
            let (prior_debits, prior_credits) = prior.debits_credits(&account.id);
            let mut initial = prior_debits - prior_credits;
            if account.nature == AccountNature::Credit {
                initial = -initial;
            }
            let (debits, credits) = current.debits_credits(&account.id);
            (initial, debits, credits)
        } else {
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        }
    } else {
        children.iter().fold(
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            |(initial, debits, credits), child| {
                (
                    initial + child.initial_balance,
                    debits + child.debits,
                    credits + child.credits,
                )
            },
        )
    };

    let final_balance = match account.nature {
        AccountNature::Debit => initial_balance + debits - credits,
        AccountNature::Credit => initial_balance - debits + credits,
    };

    if children.is_empty() && account.is_postable() && final_balance < Decimal::ZERO {
        // Informational only: a wrong-sign balance is a bookkeeping smell for
        // an investigator, not a rendering error.
        warn!(
            "Account {} ({:?}-normal) has wrong-sign final balance {}",
            account.code, account.nature, final_balance
        );
    }

    LedgerAccount {
        account: account.clone(),
        level,
        initial_balance,
        debits,
        credits,
        final_balance,
        children,
    }
}

/// Flatten the tree in display order (depth-first, siblings by code).
pub fn flatten(tree: &[LedgerAccount]) -> Vec<LedgerRowDto> {
    let mut rows = Vec::new();
    for node in tree {
        push_rows(node, &mut rows);
    }
    rows
}

fn push_rows(node: &LedgerAccount, rows: &mut Vec<LedgerRowDto>) {
    rows.push(LedgerRowDto {
        account_id: node.account.id.clone(),
        code: node.account.code.clone(),
        name: node.account.name.clone(),
        account_type: node.account.account_type,
        nature: node.account.nature,
        level: node.level,
        is_parent: node.account.is_parent,
        initial_balance: node.initial_balance,
        debits: node.debits,
        credits: node.credits,
        final_balance: node.final_balance,
    });
    for child in &node.children {
        push_rows(child, rows);
    }
}

/// Service wiring the ledger aggregation to storage.
#[derive(Clone)]
pub struct LedgerService<C: Connection> {
    account_repository: C::AccountRepository,
    period_repository: C::PeriodRepository,
    journal_repository: C::JournalRepository,
}

impl<C: Connection> LedgerService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            account_repository: connection.create_account_repository(),
            period_repository: connection.create_period_repository(),
            journal_repository: connection.create_journal_repository(),
        }
    }

    /// Build the ledger for one monthly period. Initial balances come from
    /// approved, non-voided lines of earlier periods; period movements from
    /// approved, non-voided lines assigned to the period itself. Selecting
    /// both sides by period membership keeps them a partition: an entry
    /// backdated into the period, or one assigned to an earlier period but
    /// dated inside this one, counts exactly once.
    pub fn ledger_for_period(&self, monthly_period_id: &str) -> Result<Vec<LedgerAccount>> {
        let period = self
            .period_repository
            .get_monthly_period(monthly_period_id)?
            .ok_or_else(|| anyhow!("Monthly period '{}' not found", monthly_period_id))?;

        let accounts = self.account_repository.list_accounts()?;
        let periods = self.period_repository.list_monthly_periods(None)?;
        let prior_period_ids: Vec<&str> = periods
            .iter()
            .filter(|p| p.start_date < period.start_date)
            .map(|p| p.id.as_str())
            .collect();
        let prior_lines =
            self.journal_repository
                .lines_for_periods(&prior_period_ids, true, true)?;
        let current_lines =
            self.journal_repository
                .lines_for_period(monthly_period_id, true, true)?;

        Ok(build_ledger(&accounts, &prior_lines, &current_lines))
    }

    /// Ledger rows for tabular display.
    pub fn ledger_rows_for_period(&self, monthly_period_id: &str) -> Result<Vec<LedgerRowDto>> {
        Ok(flatten(&self.ledger_for_period(monthly_period_id)?))
    }
}
