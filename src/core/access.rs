//! Access scopes and the per-resource policy built from them.
//!
//! A user's role name is the scope written into their token. Each resource lists
//! which scopes may read it and which may change it; holding any one of the
//! listed scopes is enough.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named permission carried in a token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    System,
    Admin,
    Passenger,
    Supervisor,
    Maintenance,
    Operator,
    Planner,
}

impl Scope {
    /// Every scope, in the order dashboards list them
    pub const ALL: [Self; 7] = [
        Self::System,
        Self::Admin,
        Self::Passenger,
        Self::Supervisor,
        Self::Maintenance,
        Self::Operator,
        Self::Planner,
    ];

    /// Name used in tokens and URLs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Admin => "admin",
            Self::Passenger => "passenger",
            Self::Supervisor => "supervisor",
            Self::Maintenance => "maintenance",
            Self::Operator => "operator",
            Self::Planner => "planner",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s.trim())
            .ok_or_else(|| Error::validation(format!("Unknown scope: {s}")))
    }
}

/// Parses a space-separated scope claim, skipping names this service does not know.
#[must_use]
pub fn parse_scopes(claim: &str) -> Vec<Scope> {
    claim
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Joins scopes into the space-separated form used in tokens.
#[must_use]
pub fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks that `granted` shares at least one scope with `allowed`.
///
/// # Errors
/// Returns [`Error::Forbidden`] naming the allowed scopes otherwise.
pub fn ensure_any(granted: &[Scope], allowed: &[Scope]) -> Result<()> {
    if allowed.iter().any(|scope| granted.contains(scope)) {
        return Ok(());
    }
    Err(Error::Forbidden {
        required: allowed
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Which scopes may read a resource and which may change it
#[derive(Clone, Copy, Debug)]
pub struct Access {
    /// Scopes that may list and view rows
    pub read: &'static [Scope],
    /// Scopes that may create, update and delete rows
    pub write: &'static [Scope],
}

impl Access {
    /// Staff-only tables: system and admin manage them
    pub const STAFF: Self = Self {
        read: &[Scope::System, Scope::Admin],
        write: &[Scope::System, Scope::Admin],
    };

    /// Builds a policy from explicit scope lists
    #[must_use]
    pub const fn new(read: &'static [Scope], write: &'static [Scope]) -> Self {
        Self { read, write }
    }
}
