//! Article lookup route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use etn_core::parse_qr;

use crate::db::ArticleRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireClient;
use crate::models::Article;
use crate::state::AppState;

/// Scan request: the raw decoded text of a scanned article QR code.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub qr_data: String,
}

/// Catalog lookup by article reference.
#[instrument(skip(state, _client))]
pub async fn show(
    State(state): State<AppState>,
    _client: RequireClient,
    Path(code): Path<String>,
) -> Result<Json<Article>> {
    let article = ArticleRepository::new(state.pool())
        .get_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("article {code}")))?;
    Ok(Json(article))
}

/// Catalog lookup from a raw QR payload.
///
/// Only the article reference is read from the payload; a combined
/// payload also carrying a client code is fine here, the login path
/// simply ignores this field and vice versa.
#[instrument(skip(state, _client, request))]
pub async fn scan(
    State(state): State<AppState>,
    _client: RequireClient,
    Json(request): Json<ScanRequest>,
) -> Result<Json<Article>> {
    let payload = parse_qr(&request.qr_data);
    if !payload.is_article() {
        return Err(AppError::BadRequest(
            "référence article introuvable dans le QR".to_owned(),
        ));
    }

    let article = ArticleRepository::new(state.pool())
        .get_by_code(&payload.reference)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("article {}", payload.reference)))?;
    Ok(Json(article))
}
