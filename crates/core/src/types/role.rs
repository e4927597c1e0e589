//! Client account roles.

use serde::{Deserialize, Serialize};

/// Role attached to a client account.
///
/// Stored as lowercase text in the `clients` table. Accounts with no
/// role column value default to [`Role::Client`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer account.
    #[default]
    Client,
    /// Back-office account with access to aggregate statistics.
    Admin,
}

impl Role {
    /// Parse a role from its database text representation.
    ///
    /// Unknown or missing values fall back to [`Role::Client`].
    #[must_use]
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Admin,
            _ => Self::Client,
        }
    }

    /// Returns the database text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Admin => "admin",
        }
    }

    /// Whether this role grants back-office access.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_db_defaults_to_client() {
        assert_eq!(Role::from_db(None), Role::Client);
        assert_eq!(Role::from_db(Some("")), Role::Client);
        assert_eq!(Role::from_db(Some("something-else")), Role::Client);
    }

    #[test]
    fn from_db_recognizes_admin() {
        assert_eq!(Role::from_db(Some("admin")), Role::Admin);
        assert!(Role::from_db(Some("admin")).is_admin());
    }

    #[test]
    fn round_trips_through_as_str() {
        for role in [Role::Client, Role::Admin] {
            assert_eq!(Role::from_db(Some(role.as_str())), role);
        }
    }
}
