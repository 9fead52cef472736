//! Caller identity for authorization checks.
//!
//! Authentication itself lives in the surrounding application; the domain
//! layer only needs to know who is acting and what they are allowed to do,
//! checked before any state transition.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access.
    Viewer,
    /// May create and edit pending entries.
    Accountant,
    /// May additionally approve and void entries.
    Supervisor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn can_create(&self) -> bool {
        matches!(self.role, Role::Accountant | Role::Supervisor)
    }

    pub fn can_approve(&self) -> bool {
        self.role == Role::Supervisor
    }

    pub fn can_void(&self) -> bool {
        self.role == Role::Supervisor
    }
}
