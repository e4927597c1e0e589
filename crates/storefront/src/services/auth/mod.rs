//! QR login service.
//!
//! Orchestrates the login state machine: parse the scanned payload,
//! normalize the client code, look it up in the directory, record the
//! login best-effort, and move the session store to `LoggedIn`.

mod error;

pub use error::AuthError;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use etn_core::{ClientCode, parse_qr};

use super::InFlightGuard;
use crate::db::{ClientRepository, RepositoryError};
use crate::models::ClientIdentity;
use crate::session::SessionStore;

/// Read/write access to the client directory.
///
/// The production implementation is [`PgClientDirectory`]; tests use
/// in-memory fakes.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Look up a client by exact code match.
    async fn find_client(
        &self,
        code: &ClientCode,
    ) -> Result<Option<ClientIdentity>, RepositoryError>;

    /// Refresh the client's `last_login` timestamp.
    async fn touch_last_login(&self, code: &ClientCode) -> Result<(), RepositoryError>;

    /// Upsert the daily login-event row (idempotent per day).
    async fn record_login_event(&self, code: &ClientCode) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed client directory.
#[derive(Clone)]
pub struct PgClientDirectory {
    pool: PgPool,
}

impl PgClientDirectory {
    /// Create a directory over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientDirectory for PgClientDirectory {
    async fn find_client(
        &self,
        code: &ClientCode,
    ) -> Result<Option<ClientIdentity>, RepositoryError> {
        ClientRepository::new(&self.pool).get_by_code(code).await
    }

    async fn touch_last_login(&self, code: &ClientCode) -> Result<(), RepositoryError> {
        ClientRepository::new(&self.pool).touch_last_login(code).await
    }

    async fn record_login_event(&self, code: &ClientCode) -> Result<(), RepositoryError> {
        ClientRepository::new(&self.pool)
            .record_login_event(code)
            .await
    }
}

/// Authentication service.
pub struct AuthService<D: ClientDirectory + 'static> {
    directory: Arc<D>,
    in_flight: Mutex<HashSet<ClientCode>>,
}

impl<D: ClientDirectory + 'static> AuthService<D> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            directory,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Log in from a raw QR scan, driving `store` through the state
    /// machine.
    ///
    /// On success the directory's `last_login` and daily login event
    /// are updated in a background task; their failure never fails the
    /// login. On failure the store returns to `LoggedOut` with a
    /// user-visible message, except when `store` itself is already
    /// `Authenticating`, in which case the in-flight attempt is left
    /// untouched.
    ///
    /// Rapid double-scans arrive as two parallel requests each holding
    /// its own session snapshot, which the store-level guard cannot
    /// see; a per-client in-flight slot at this level rejects the
    /// second request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::LoginInFlight`], [`AuthError::InvalidQr`]
    /// or [`AuthError::UnknownClient`].
    pub async fn login_with_qr(
        &self,
        store: &mut SessionStore,
        raw_qr: &str,
    ) -> Result<ClientIdentity, AuthError> {
        store.begin_login()?;

        match self.resolve_client(raw_qr).await {
            Ok(identity) => {
                self.record_login(&identity.code);
                store.complete_login(identity.clone());
                Ok(identity)
            }
            Err(err) => {
                store.fail_login(&err);
                Err(err)
            }
        }
    }

    /// Parse, normalize and look up the scanned client code.
    async fn resolve_client(&self, raw_qr: &str) -> Result<ClientIdentity, AuthError> {
        let payload = parse_qr(raw_qr);
        if !payload.is_login() {
            return Err(AuthError::InvalidQr);
        }

        let code = ClientCode::parse(&payload.client_code).map_err(|_| AuthError::InvalidQr)?;

        let _guard = InFlightGuard::acquire(&self.in_flight, code.clone())
            .ok_or(AuthError::LoginInFlight)?;

        let found = self.directory.find_client(&code).await.map_err(|e| {
            tracing::warn!(code = %code, error = %e, "client directory lookup failed");
            AuthError::UnknownClient(code.to_string())
        })?;

        let mut identity = found.ok_or_else(|| AuthError::UnknownClient(code.to_string()))?;
        identity.last_login = Some(Utc::now());
        Ok(identity)
    }

    /// Best-effort recording of the login, off the success path.
    fn record_login(&self, code: &ClientCode) {
        let directory = Arc::clone(&self.directory);
        let code = code.clone();
        tokio::spawn(async move {
            if let Err(e) = directory.touch_last_login(&code).await {
                tracing::warn!(code = %code, error = %e, "failed to update last_login");
            }
            if let Err(e) = directory.record_login_event(&code).await {
                tracing::warn!(code = %code, error = %e, "failed to record login event");
            }
        });
    }
}
