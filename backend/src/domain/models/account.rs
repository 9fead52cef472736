//! Domain model for an account in the chart of accounts.
use serde::{Deserialize, Serialize};
use shared::{AccountNature, AccountType};

/// An account. Accounts form a tree through `parent_id`; only leaf accounts
/// (`is_parent = false`) may be referenced by journal entry lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Lexically sortable code, e.g. "1-01-001". Siblings are ordered by code.
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub nature: AccountNature,
    pub parent_id: Option<String>,
    pub is_parent: bool,
    pub is_active: bool,
}

impl Account {
    /// Whether journal lines may post to this account directly.
    pub fn is_postable(&self) -> bool {
        !self.is_parent && self.is_active
    }

    pub fn to_dto(&self) -> shared::AccountDto {
        shared::AccountDto {
            id: self.id.clone(),
            code: self.code.clone(),
            name: self.name.clone(),
            account_type: self.account_type,
            nature: self.nature,
            parent_id: self.parent_id.clone(),
            is_parent: self.is_parent,
            is_active: self.is_active,
        }
    }
}
