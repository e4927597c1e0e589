//! Client account identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use etn_core::{ClientCode, Role};

/// The authenticated client, as refreshed on a successful QR login.
///
/// Owned exclusively by the session store: created on login, cleared
/// on logout, never mutated in between.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Unique client code (uppercase-normalized login credential).
    pub code: ClientCode,
    /// Company or customer name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// Name of the sales representative in charge of this account.
    pub sales_rep: String,
    /// Account role; defaults to [`Role::Client`] when absent in the
    /// directory.
    pub role: Role,
    /// Timestamp of the latest successful login, if any.
    pub last_login: Option<DateTime<Utc>>,
}

impl ClientIdentity {
    /// Whether this identity grants back-office access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
