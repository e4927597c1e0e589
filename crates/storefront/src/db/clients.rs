//! Client directory repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use etn_core::{ClientCode, Role};

use super::RepositoryError;
use crate::models::ClientIdentity;

/// Raw `clients` row, converted to [`ClientIdentity`] on read.
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    code_client: String,
    nom: String,
    adresse: String,
    code_postal: String,
    ville: String,
    commercial: String,
    role: Option<String>,
    last_login: Option<DateTime<Utc>>,
}

impl ClientRow {
    fn into_identity(self) -> Result<ClientIdentity, RepositoryError> {
        let code = ClientCode::parse(&self.code_client).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid client code in database: {e}"))
        })?;
        Ok(ClientIdentity {
            code,
            name: self.nom,
            address: self.adresse,
            postal_code: self.code_postal,
            city: self.ville,
            sales_rep: self.commercial,
            role: Role::from_db(self.role.as_deref()),
            last_login: self.last_login,
        })
    }
}

/// Repository for client directory operations.
pub struct ClientRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ClientRepository<'a> {
    /// Create a new client repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a client by exact code match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if the stored code is invalid.
    pub async fn get_by_code(
        &self,
        code: &ClientCode,
    ) -> Result<Option<ClientIdentity>, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r"
            SELECT code_client, nom, adresse, code_postal, ville,
                   commercial, role, last_login
            FROM clients
            WHERE code_client = $1
            ",
        )
        .bind(code.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(ClientRow::into_identity).transpose()
    }

    /// List the full directory, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ClientIdentity>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r"
            SELECT code_client, nom, adresse, code_postal, ville,
                   commercial, role, last_login
            FROM clients
            ORDER BY last_login DESC NULLS LAST, nom
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ClientRow::into_identity).collect()
    }

    /// Refresh the client's `last_login` timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn touch_last_login(&self, code: &ClientCode) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE clients SET last_login = now() WHERE code_client = $1")
            .bind(code.as_str())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Upsert the daily login-event row for `(client, today)`.
    ///
    /// Idempotent per day: repeated same-day logins do not create
    /// duplicate rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record_login_event(&self, code: &ClientCode) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO logins (client_id, date)
            VALUES ($1, CURRENT_DATE)
            ON CONFLICT (client_id, date) DO NOTHING
            ",
        )
        .bind(code.as_str())
        .execute(self.pool)
        .await?;
        Ok(())
    }
}
