//! Order submission, history, and PDF retrieval.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireClient;
use crate::models::Order;
use crate::routes::{load_cart, save_cart};
use crate::services::orders::{OrderForm, OrderReceipt};
use crate::state::AppState;

/// Order form fields, combined with the session cart into a draft.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub first_name: String,
    pub last_name: String,
    pub order_number: String,
    pub comment: Option<String>,
}

/// Submit the session cart as an order.
///
/// The cart is cleared only after the whole pipeline succeeds; on any
/// failure it stays intact so the client can retry.
#[instrument(skip(state, session, client, request), fields(client = %client.0.code))]
pub async fn submit(
    State(state): State<AppState>,
    client: RequireClient,
    session: Session,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<OrderReceipt>> {
    let mut cart = load_cart(&session).await?;

    let form = OrderForm {
        first_name: request.first_name,
        last_name: request.last_name,
        order_number: request.order_number,
        comment: request.comment,
    };

    let receipt = state
        .submission()
        .submit_cart(&mut cart, form, client.0.code.clone())
        .await?;

    save_cart(&session, &cart).await?;

    Ok(Json(receipt))
}

/// Order history for the logged-in client, newest first.
#[instrument(skip(state, client), fields(client = %client.0.code))]
pub async fn history(
    State(state): State<AppState>,
    client: RequireClient,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_client(&client.0.code)
        .await?;
    Ok(Json(orders))
}

/// Fetch the generated PDF for an order.
///
/// Clients can only fetch their own orders; admins can fetch any.
#[instrument(skip(state, client), fields(client = %client.0.code))]
pub async fn pdf(
    State(state): State<AppState>,
    client: RequireClient,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .get_by_order_number(&order_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("commande {order_number}")))?;

    if order.client_code != client.0.code && !client.0.is_admin() {
        return Err(AppError::NotFound(format!("commande {order_number}")));
    }

    let bytes = state.order_pdf().fetch_pdf(&order_number).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"commande-{order_number}.pdf\""),
            ),
        ],
        bytes,
    ))
}
