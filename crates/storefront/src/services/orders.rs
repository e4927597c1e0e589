//! Order submission pipeline.
//!
//! Turns a validated cart into an emailed PDF plus a persisted order
//! row: validate → send to the remote order/PDF service → insert the
//! order → return a receipt. Steps are strictly sequential (the insert
//! depends on the remote success) and there is no automatic retry;
//! re-submission is user-initiated.
//!
//! The remote send and the database insert are not covered by a
//! compensating transaction. When the insert fails after the email
//! went out, the customer holds a PDF with no history row; the
//! pipeline surfaces that as [`SubmissionError::Persistence`],
//! distinct from [`SubmissionError::RemoteService`], so the caller can
//! warn accordingly.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use etn_core::ClientCode;

use super::InFlightGuard;
use crate::cart::CartStore;
use crate::db::{OrderRepository, RepositoryError};
use crate::models::{CartLine, OrderItem, OrderItems};

/// Errors surfaced by [`SubmissionService::submit`].
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// A required field is missing; nothing was sent anywhere.
    #[error("champ requis manquant: {0}")]
    Validation(&'static str),

    /// A submission is already in flight for this client; double-taps
    /// are rejected immediately rather than queued.
    #[error("une commande est déjà en cours d'envoi")]
    AlreadyInFlight,

    /// The remote PDF/email dispatch failed; no order row was written
    /// and the cart is left untouched for a retry.
    #[error("échec de l'envoi de la commande: {0}")]
    RemoteService(String),

    /// The order row could not be written after the remote dispatch
    /// succeeded (known inconsistency window: the PDF was emailed but
    /// history will not show the order).
    #[error("commande envoyée mais non enregistrée: {0}")]
    Persistence(#[from] RepositoryError),
}

/// Failure reported by an [`OrderDispatcher`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DispatchError(pub String);

/// Wire payload for `POST /send-order-pdf`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub first_name: String,
    pub last_name: String,
    pub order_number: String,
    pub to_email: String,
    pub cart: Vec<PayloadLine>,
    pub comment: String,
    pub client_code: String,
}

/// One cart entry in the wire payload (field names follow the remote
/// service's contract).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PayloadLine {
    pub code: String,
    pub designation: String,
    pub quantite: u32,
}

/// A draft order, assembled by the HTTP layer from the order form and
/// the session cart.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub first_name: String,
    pub last_name: String,
    pub order_number: String,
    pub comment: Option<String>,
    pub client_code: ClientCode,
    pub lines: Vec<CartLine>,
}

/// The user-entered order form fields, paired with a session cart by
/// [`SubmissionService::submit_cart`].
#[derive(Debug, Clone)]
pub struct OrderForm {
    pub first_name: String,
    pub last_name: String,
    pub order_number: String,
    pub comment: Option<String>,
}

/// Receipt returned on full success, so the caller can clear the cart
/// and refresh history.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub order_number: String,
    pub created_at: DateTime<Utc>,
}

/// Delivery of the order payload to the remote order/PDF service.
#[async_trait]
pub trait OrderDispatcher: Send + Sync {
    /// Send the payload; any transport failure, non-2xx status, or
    /// error field in a 2xx body is a [`DispatchError`].
    async fn send_order(&self, payload: &OrderPayload) -> Result<(), DispatchError>;
}

/// Persistence of the order row.
#[async_trait]
pub trait OrderWriter: Send + Sync {
    /// Insert the order (plain insert, duplicates permitted) and
    /// return its id and creation timestamp.
    async fn insert_order(
        &self,
        draft: &OrderDraft,
        items: &OrderItems,
    ) -> Result<(Uuid, DateTime<Utc>), RepositoryError>;
}

/// `PostgreSQL`-backed order writer.
#[derive(Clone)]
pub struct PgOrderWriter {
    pool: PgPool,
}

impl PgOrderWriter {
    /// Create a writer over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderWriter for PgOrderWriter {
    async fn insert_order(
        &self,
        draft: &OrderDraft,
        items: &OrderItems,
    ) -> Result<(Uuid, DateTime<Utc>), RepositoryError> {
        OrderRepository::new(&self.pool)
            .insert(
                &draft.client_code,
                &draft.first_name,
                &draft.last_name,
                &draft.order_number,
                draft.comment.as_deref(),
                items,
            )
            .await
    }
}

/// The submission pipeline.
pub struct SubmissionService<D: OrderDispatcher, W: OrderWriter> {
    dispatcher: Arc<D>,
    writer: Arc<W>,
    notify_email: String,
    in_flight: Mutex<HashSet<ClientCode>>,
}

impl<D: OrderDispatcher, W: OrderWriter> SubmissionService<D, W> {
    /// Create a new submission service.
    ///
    /// `notify_email` is the address the remote service mails the PDF
    /// to.
    #[must_use]
    pub fn new(dispatcher: Arc<D>, writer: Arc<W>, notify_email: String) -> Self {
        Self {
            dispatcher,
            writer,
            notify_email,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Submit a draft order.
    ///
    /// # Errors
    ///
    /// See [`SubmissionError`]; each variant leaves the prior state
    /// intact (nothing was committed before the failing step).
    pub async fn submit(&self, draft: OrderDraft) -> Result<OrderReceipt, SubmissionError> {
        validate(&draft)?;

        let _guard = InFlightGuard::acquire(&self.in_flight, draft.client_code.clone())
            .ok_or(SubmissionError::AlreadyInFlight)?;

        let payload = build_payload(&draft, &self.notify_email);
        self.dispatcher
            .send_order(&payload)
            .await
            .map_err(|e| SubmissionError::RemoteService(e.0))?;

        let items = OrderItems::new(
            draft
                .lines
                .iter()
                .map(|l| OrderItem {
                    code: l.article_code.clone(),
                    designation: l.designation.clone(),
                    quantity: l.quantity.get(),
                })
                .collect(),
        );

        let (order_id, created_at) = self.writer.insert_order(&draft, &items).await?;

        tracing::info!(
            order_id = %order_id,
            order_number = %draft.order_number,
            client = %draft.client_code,
            "order submitted"
        );

        Ok(OrderReceipt {
            order_id,
            order_number: draft.order_number,
            created_at,
        })
    }

    /// Submit the cart contents as an order, clearing the cart only
    /// when the whole pipeline succeeded.
    ///
    /// On any failure the cart keeps its lines so the client can
    /// retry; that includes [`SubmissionError::Persistence`], where
    /// the PDF already went out and the retry decision is the user's.
    ///
    /// # Errors
    ///
    /// See [`SubmissionService::submit`].
    pub async fn submit_cart(
        &self,
        cart: &mut CartStore,
        form: OrderForm,
        client_code: ClientCode,
    ) -> Result<OrderReceipt, SubmissionError> {
        let draft = OrderDraft {
            first_name: form.first_name,
            last_name: form.last_name,
            order_number: form.order_number,
            comment: form.comment,
            client_code,
            lines: cart.lines().to_vec(),
        };

        let receipt = self.submit(draft).await?;
        cart.clear();
        Ok(receipt)
    }
}

/// Fail fast on missing fields, before contacting any remote service.
fn validate(draft: &OrderDraft) -> Result<(), SubmissionError> {
    if draft.first_name.trim().is_empty() {
        return Err(SubmissionError::Validation("prénom"));
    }
    if draft.last_name.trim().is_empty() {
        return Err(SubmissionError::Validation("nom"));
    }
    if draft.order_number.trim().is_empty() {
        return Err(SubmissionError::Validation("numéro de commande"));
    }
    if draft.lines.is_empty() {
        return Err(SubmissionError::Validation("panier"));
    }
    Ok(())
}

/// Build the transfer payload for the remote service.
fn build_payload(draft: &OrderDraft, notify_email: &str) -> OrderPayload {
    OrderPayload {
        first_name: draft.first_name.trim().to_owned(),
        last_name: draft.last_name.trim().to_owned(),
        order_number: draft.order_number.trim().to_owned(),
        to_email: notify_email.to_owned(),
        cart: draft
            .lines
            .iter()
            .map(|l| PayloadLine {
                code: l.article_code.clone(),
                designation: l.designation.clone(),
                quantite: l.quantity.get(),
            })
            .collect(),
        comment: draft.comment.clone().unwrap_or_default(),
        client_code: draft.client_code.to_string(),
    }
}
