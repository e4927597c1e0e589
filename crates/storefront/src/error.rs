//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Responses carry a machine-readable `kind`
//! so the mobile client can distinguish, for example, a remote
//! dispatch failure (safe to retry) from a persistence failure after
//! the email already went out (history may lag).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cart::CartError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::order_pdf::OrderPdfError;
use crate::services::orders::SubmissionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// QR login failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order submission failed.
    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// Remote order/PDF service failed outside the submission path.
    #[error("Order PDF service error: {0}")]
    OrderPdf(#[from] OrderPdfError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Machine-readable error kind for the client.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Auth(AuthError::InvalidQr) => "invalid_qr",
            Self::Auth(AuthError::UnknownClient(_)) => "unknown_client",
            Self::Auth(AuthError::LoginInFlight) => "login_in_flight",
            Self::Cart(CartError::StockInsufficient { .. }) => "stock_insufficient",
            Self::Cart(CartError::UnknownLine(_)) => "unknown_line",
            Self::Submission(SubmissionError::Validation(_)) => "validation",
            Self::Submission(SubmissionError::AlreadyInFlight) => "submission_in_flight",
            Self::Submission(SubmissionError::RemoteService(_)) => "remote_service",
            Self::Submission(SubmissionError::Persistence(_)) => "persistence",
            Self::OrderPdf(_) => "order_pdf_service",
            Self::Session(_) => "session",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "bad_request",
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Submission(SubmissionError::Persistence(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(AuthError::UnknownClient(_)) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::LoginInFlight)
            | Self::Submission(SubmissionError::AlreadyInFlight)
            | Self::Cart(CartError::StockInsufficient { .. }) => StatusCode::CONFLICT,
            Self::Auth(AuthError::InvalidQr)
            | Self::Cart(CartError::UnknownLine(_))
            | Self::Submission(SubmissionError::Validation(_))
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Submission(SubmissionError::RemoteService(_)) | Self::OrderPdf(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Submission(SubmissionError::Persistence(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal details for server errors
        let message = match &self {
            Self::Database(_) | Self::Session(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (
            status,
            Json(json!({ "kind": self.kind(), "message": message })),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
