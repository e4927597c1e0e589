//! QR login route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireClient;
use crate::models::ClientIdentity;
use crate::routes::{load_auth, save_auth};
use crate::state::AppState;

/// Login request: the raw decoded text of the scanned QR code.
#[derive(Debug, Deserialize)]
pub struct QrLoginRequest {
    pub qr_data: String,
}

/// Authenticated identity response.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub client: ClientIdentity,
    pub is_admin: bool,
}

impl From<ClientIdentity> for MeResponse {
    fn from(client: ClientIdentity) -> Self {
        let is_admin = client.is_admin();
        Self { client, is_admin }
    }
}

/// Login from a scanned QR payload.
///
/// The auth store is written back on both outcomes so the session
/// keeps the failure message for display and re-scan.
#[instrument(skip(state, session, request))]
pub async fn login_qr(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<QrLoginRequest>,
) -> Result<Json<MeResponse>> {
    let mut store = load_auth(&session).await?;

    let outcome = state
        .auth()
        .login_with_qr(&mut store, &request.qr_data)
        .await;

    save_auth(&session, &store).await?;
    let identity = outcome?;

    tracing::info!(client = %identity.code, "client logged in");
    Ok(Json(identity.into()))
}

/// Logout. Idempotent; callable whether or not a client is logged in.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<()> {
    let mut store = load_auth(&session).await?;
    store.logout();
    save_auth(&session, &store).await?;
    Ok(())
}

/// Current client identity.
#[instrument(skip(client))]
pub async fn me(RequireClient(client): RequireClient) -> Json<MeResponse> {
    Json(client.into())
}
