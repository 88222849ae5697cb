//! The authenticated principal consumed from the auth layer.
//!
//! Session issuance, password hashing and token rotation live outside this
//! workspace; services only ever see an already-authenticated id and role.

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Foreman,
    Manager,
}

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    /// Build a principal from an id and role
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Whether this principal carries the manager role
    #[inline]
    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}
