//! Authentication extractors.
//!
//! Route handlers take [`RequireClient`] (any logged-in client) or
//! [`RequireAdmin`] (back-office role) to read the identity from the
//! session's auth store.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::models::{ClientIdentity, session_keys};
use crate::session::SessionStore;

/// Extractor that requires a logged-in client.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireClient(client): RequireClient) -> impl IntoResponse {
///     format!("Bonjour {}", client.name)
/// }
/// ```
pub struct RequireClient(pub ClientIdentity);

/// Extractor that requires a logged-in client with the admin role.
pub struct RequireAdmin(pub ClientIdentity);

/// Rejection for the auth extractors.
pub enum AuthRejection {
    /// No client is logged in on this session.
    Unauthorized,
    /// Logged in, but the role does not grant back-office access.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

/// Read the current identity out of the session's auth store.
async fn current_identity(parts: &mut Parts) -> Option<ClientIdentity> {
    let session = parts.extensions.get::<Session>()?;
    let store: SessionStore = session
        .get(session_keys::AUTH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    store.current().cloned()
}

impl<S> FromRequestParts<S> for RequireClient
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_identity(parts)
            .await
            .map(Self)
            .ok_or(AuthRejection::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = current_identity(parts)
            .await
            .ok_or(AuthRejection::Unauthorized)?;
        if !identity.is_admin() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(identity))
    }
}
