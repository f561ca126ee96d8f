//! Resolved caller identity.

use serde::{Deserialize, Serialize};

use schoolbill_core::UserId;

/// Closed set of roles known to the billing core.
///
/// Roles arrive from the session collaborator; the core never re-derives
/// them. Keeping the set closed (instead of opaque role strings) lets the
/// capability layer match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Parent,
    Student,
    Staff,
}

/// An authenticated caller: opaque subject id plus its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(subject_id: UserId, role: Role) -> Self {
        Self { subject_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
