//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::auth::{AuthService, PgClientDirectory};
use crate::services::order_pdf::{OrderPdfClient, OrderPdfError};
use crate::services::orders::{PgOrderWriter, SubmissionService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, and the auth/submission services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    order_pdf: OrderPdfClient,
    auth: AuthService<PgClientDirectory>,
    submission: SubmissionService<OrderPdfClient, PgOrderWriter>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the order/PDF service client cannot be
    /// built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, OrderPdfError> {
        let order_pdf = OrderPdfClient::new(&config.order_pdf_service_url)?;
        let auth = AuthService::new(Arc::new(PgClientDirectory::new(pool.clone())));
        let submission = SubmissionService::new(
            Arc::new(order_pdf.clone()),
            Arc::new(PgOrderWriter::new(pool.clone())),
            config.order_notify_email.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                order_pdf,
                auth,
                submission,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the order/PDF service client.
    #[must_use]
    pub fn order_pdf(&self) -> &OrderPdfClient {
        &self.inner.order_pdf
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService<PgClientDirectory> {
        &self.inner.auth
    }

    /// Get a reference to the order submission service.
    #[must_use]
    pub fn submission(&self) -> &SubmissionService<OrderPdfClient, PgOrderWriter> {
        &self.inner.submission
    }
}
