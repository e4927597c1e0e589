//! Cart route handlers.
//!
//! The cart rides in the tower-session, one instance per device. Every
//! handler loads it, applies one mutation, and writes it back; a
//! rejected mutation leaves the stored cart unchanged.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use etn_core::Quantity;

use crate::cart::CartStore;
use crate::db::ArticleRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireClient;
use crate::models::CartLine;
use crate::routes::{load_cart, save_cart};
use crate::state::AppState;

/// Cart contents for the client.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_quantity: u32,
    pub subtotal: Decimal,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    /// Article reference code (from a scan or the article page).
    pub code: String,
    /// Requested quantity; defaults to 1.
    pub quantity: Option<i64>,
}

/// Quantity edit request.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub quantity: i64,
}

/// Cart contents.
#[instrument(skip(session, _client))]
pub async fn show(_client: RequireClient, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add an article to the cart, merging quantities on re-scan.
///
/// The article's designation, price, and stock limit are resolved
/// server-side from the catalog, never trusted from the client.
#[instrument(skip(state, session, _client))]
pub async fn add(
    State(state): State<AppState>,
    _client: RequireClient,
    session: Session,
    Json(request): Json<AddLineRequest>,
) -> Result<Json<CartView>> {
    let quantity = Quantity::new(request.quantity.unwrap_or(1))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let article = ArticleRepository::new(state.pool())
        .get_by_code(&request.code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("article {}", request.code)))?;

    let mut cart = load_cart(&session).await?;
    cart.add_line(CartLine::from_article(&article, quantity))?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Set a line's quantity. Edits to zero or below are rejected, not
/// clamped.
#[instrument(skip(session, _client))]
pub async fn update(
    _client: RequireClient,
    session: Session,
    Path(code): Path<String>,
    Json(request): Json<UpdateLineRequest>,
) -> Result<Json<CartView>> {
    let quantity =
        Quantity::new(request.quantity).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut cart = load_cart(&session).await?;
    cart.update_quantity(&code, quantity)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line. A no-op when the article is not in the cart.
#[instrument(skip(session, _client))]
pub async fn remove(
    _client: RequireClient,
    session: Session,
    Path(code): Path<String>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove_line(&code);
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Clear the cart.
#[instrument(skip(session, _client))]
pub async fn clear(_client: RequireClient, session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}
