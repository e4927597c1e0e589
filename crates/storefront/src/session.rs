//! Authentication state machine.
//!
//! Explicit store object replacing the original provider-style
//! ambient context: the HTTP layer loads it from the tower-session,
//! mutates it through [`crate::services::auth::AuthService`], and
//! writes it back. States: `LoggedOut -> Authenticating -> LoggedIn`,
//! with every failure returning to `LoggedOut`.

use serde::{Deserialize, Serialize};

use crate::models::ClientIdentity;
use crate::services::auth::AuthError;

/// Current authentication state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    /// No client is authenticated.
    #[default]
    LoggedOut,
    /// A QR login is in flight; further logins are rejected until it
    /// completes or fails.
    Authenticating,
    /// A client is authenticated.
    LoggedIn(ClientIdentity),
}

/// Per-device authentication store.
///
/// Holds the current [`AuthState`] plus the last human-readable login
/// error, cleared on logout and on the next login attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStore {
    state: AuthState,
    error: Option<String>,
}

impl SessionStore {
    /// Create a store in the initial `LoggedOut` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// The authenticated identity, when logged in.
    #[must_use]
    pub const fn current(&self) -> Option<&ClientIdentity> {
        match &self.state {
            AuthState::LoggedIn(identity) => Some(identity),
            AuthState::LoggedOut | AuthState::Authenticating => None,
        }
    }

    /// Last login failure message, if the previous attempt failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the current identity grants back-office access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current().is_some_and(ClientIdentity::is_admin)
    }

    /// Guard and enter the `Authenticating` state.
    ///
    /// Rapid re-scans must not start concurrent duplicate logins: when
    /// a login is already in flight this is a no-op returning failure.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::LoginInFlight`] when already authenticating.
    pub fn begin_login(&mut self) -> Result<(), AuthError> {
        if self.state == AuthState::Authenticating {
            return Err(AuthError::LoginInFlight);
        }
        self.error = None;
        self.state = AuthState::Authenticating;
        Ok(())
    }

    /// Complete a successful login.
    pub fn complete_login(&mut self, identity: ClientIdentity) {
        self.error = None;
        self.state = AuthState::LoggedIn(identity);
    }

    /// Record a failed login and return to `LoggedOut`.
    ///
    /// All login failures are recoverable: the message is kept for
    /// user-visible display and the store is usable for a re-scan.
    pub fn fail_login(&mut self, err: &AuthError) {
        self.error = Some(err.to_string());
        self.state = AuthState::LoggedOut;
    }

    /// Clear identity and error state. Callable at any time; idempotent.
    pub fn logout(&mut self) {
        self.state = AuthState::LoggedOut;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etn_core::{ClientCode, Role};

    fn identity(role: Role) -> ClientIdentity {
        ClientIdentity {
            code: ClientCode::parse("ABC123").unwrap(),
            name: "Durand SARL".to_owned(),
            address: "1 rue des Lilas".to_owned(),
            postal_code: "59000".to_owned(),
            city: "Lille".to_owned(),
            sales_rep: "M. Petit".to_owned(),
            role,
            last_login: None,
        }
    }

    #[test]
    fn initial_state_is_logged_out() {
        let store = SessionStore::new();
        assert_eq!(store.state(), &AuthState::LoggedOut);
        assert!(store.current().is_none());
        assert!(!store.is_admin());
    }

    #[test]
    fn begin_login_rejects_concurrent_attempt() {
        let mut store = SessionStore::new();
        store.begin_login().unwrap();
        assert!(matches!(
            store.begin_login(),
            Err(AuthError::LoginInFlight)
        ));
    }

    #[test]
    fn failed_login_returns_to_logged_out_with_message() {
        let mut store = SessionStore::new();
        store.begin_login().unwrap();
        store.fail_login(&AuthError::InvalidQr);
        assert_eq!(store.state(), &AuthState::LoggedOut);
        assert!(store.last_error().is_some());

        // Recoverable: a new attempt is allowed and clears the error.
        store.begin_login().unwrap();
        assert!(store.last_error().is_none());
    }

    #[test]
    fn complete_login_transitions_to_logged_in() {
        let mut store = SessionStore::new();
        store.begin_login().unwrap();
        store.complete_login(identity(Role::Client));
        assert!(store.current().is_some());
        assert!(!store.is_admin());
    }

    #[test]
    fn is_admin_follows_role() {
        let mut store = SessionStore::new();
        store.begin_login().unwrap();
        store.complete_login(identity(Role::Admin));
        assert!(store.is_admin());
    }

    #[test]
    fn logout_is_idempotent() {
        let mut store = SessionStore::new();
        store.begin_login().unwrap();
        store.complete_login(identity(Role::Client));
        store.logout();
        assert_eq!(store.state(), &AuthState::LoggedOut);
        store.logout();
        assert_eq!(store.state(), &AuthState::LoggedOut);
        assert!(store.last_error().is_none());
    }
}
