//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (DB ping)
//!
//! # Auth (QR login)
//! POST /auth/qr                    - Login from a scanned QR payload
//! POST /auth/logout                - Logout
//! GET  /auth/me                    - Current client identity
//!
//! # Articles
//! GET  /articles/{code}            - Catalog lookup by reference
//! POST /articles/scan              - Catalog lookup from a raw QR payload
//!
//! # Cart (session-scoped)
//! GET    /cart                     - Cart contents
//! POST   /cart/lines               - Add an article (merges quantities)
//! PATCH  /cart/lines/{code}        - Set a line quantity
//! DELETE /cart/lines/{code}        - Remove a line (no-op if absent)
//! DELETE /cart                     - Clear the cart
//!
//! # Orders
//! POST /orders                     - Submit the session cart
//! GET  /orders                     - Order history, newest first
//! GET  /orders/{order_number}/pdf  - Rendered PDF (proxied)
//!
//! # Back-office (admin role)
//! GET  /admin/stats                - Aggregate statistics
//! GET  /admin/clients              - Client directory
//! ```

pub mod admin;
pub mod articles;
pub mod auth;
pub mod cart;
pub mod orders;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_sessions::Session;

use crate::cart::CartStore;
use crate::error::Result;
use crate::models::session_keys;
use crate::session::SessionStore;
use crate::state::AppState;

/// Create the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/qr", post(auth::login_qr))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/articles/scan", post(articles::scan))
        .route("/articles/{code}", get(articles::show))
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/lines", post(cart::add))
        .route(
            "/cart/lines/{code}",
            patch(cart::update).delete(cart::remove),
        )
        .route("/orders", post(orders::submit).get(orders::history))
        .route("/orders/{order_number}/pdf", get(orders::pdf))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/clients", get(admin::clients))
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the auth store from the session (fresh store when absent).
pub(crate) async fn load_auth(session: &Session) -> Result<SessionStore> {
    Ok(session
        .get::<SessionStore>(session_keys::AUTH)
        .await?
        .unwrap_or_default())
}

/// Write the auth store back to the session.
pub(crate) async fn save_auth(session: &Session, store: &SessionStore) -> Result<()> {
    session.insert(session_keys::AUTH, store).await?;
    Ok(())
}

/// Load the cart from the session (empty cart when absent).
pub(crate) async fn load_cart(session: &Session) -> Result<CartStore> {
    Ok(session
        .get::<CartStore>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &CartStore) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}
