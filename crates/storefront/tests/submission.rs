//! Submission pipeline tests with stubbed dispatch and persistence.
//!
//! The pipeline's ordering guarantees matter more than any single
//! step: validation happens before any remote call, the remote send
//! happens before the insert, and each failure leaves the earlier
//! steps' state intact.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Notify;
use uuid::Uuid;

use etn_core::{ClientCode, Quantity};
use etn_storefront::cart::CartStore;
use etn_storefront::db::RepositoryError;
use etn_storefront::models::{CartLine, OrderItems};
use etn_storefront::services::orders::{
    DispatchError, OrderDispatcher, OrderDraft, OrderForm, OrderPayload, OrderWriter,
    SubmissionError, SubmissionService,
};

/// Dispatcher stub: counts calls, optionally fails, optionally blocks
/// until released (for overlap tests).
#[derive(Default)]
struct StubDispatcher {
    calls: AtomicUsize,
    fail_with: Option<String>,
    entered: Option<Arc<Notify>>,
    release: Option<Arc<Notify>>,
    last_payload: std::sync::Mutex<Option<OrderPayload>>,
}

#[async_trait]
impl OrderDispatcher for StubDispatcher {
    async fn send_order(&self, payload: &OrderPayload) -> Result<(), DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_payload.lock() {
            *last = Some(payload.clone());
        }
        if let Some(entered) = &self.entered {
            entered.notify_one();
        }
        if let Some(release) = &self.release {
            release.notified().await;
        }
        match &self.fail_with {
            Some(message) => Err(DispatchError(message.clone())),
            None => Ok(()),
        }
    }
}

/// Writer stub: counts calls and optionally fails.
#[derive(Default)]
struct StubWriter {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl OrderWriter for StubWriter {
    async fn insert_order(
        &self,
        _draft: &OrderDraft,
        _items: &OrderItems,
    ) -> Result<(Uuid, DateTime<Utc>), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepositoryError::Database(sqlx::Error::RowNotFound));
        }
        Ok((Uuid::new_v4(), Utc::now()))
    }
}

fn line(code: &str, quantity: u32) -> CartLine {
    CartLine {
        article_code: code.to_owned(),
        designation: format!("article {code}"),
        quantity: Quantity::new(i64::from(quantity)).expect("positive quantity"),
        unit_price: Decimal::new(990, 2),
        stock_limit: None,
    }
}

fn form() -> OrderForm {
    OrderForm {
        first_name: "Jean".to_owned(),
        last_name: "Vasseur".to_owned(),
        order_number: "CMD-2026-001".to_owned(),
        comment: None,
    }
}

fn cart_with(lines: Vec<CartLine>) -> CartStore {
    let mut cart = CartStore::new();
    for l in lines {
        cart.add_line(l).expect("line fits stock");
    }
    cart
}

fn draft(lines: Vec<CartLine>) -> OrderDraft {
    OrderDraft {
        first_name: "Jean".to_owned(),
        last_name: "Vasseur".to_owned(),
        order_number: "CMD-2026-001".to_owned(),
        comment: Some("livraison jeudi".to_owned()),
        client_code: ClientCode::parse("ETN002").expect("valid code"),
        lines,
    }
}

fn service(
    dispatcher: StubDispatcher,
    writer: StubWriter,
) -> (
    SubmissionService<StubDispatcher, StubWriter>,
    Arc<StubDispatcher>,
    Arc<StubWriter>,
) {
    let dispatcher = Arc::new(dispatcher);
    let writer = Arc::new(writer);
    let service = SubmissionService::new(
        Arc::clone(&dispatcher),
        Arc::clone(&writer),
        "commandes@example.fr".to_owned(),
    );
    (service, dispatcher, writer)
}

#[tokio::test]
async fn successful_submission_returns_receipt() {
    let (service, dispatcher, writer) = service(StubDispatcher::default(), StubWriter::default());

    let receipt = service
        .submit(draft(vec![line("VER-2040", 2), line("FLX-0815", 1)]))
        .await
        .expect("submission succeeds");

    assert_eq!(receipt.order_number, "CMD-2026-001");
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn payload_carries_form_cart_and_notify_email() {
    let (service, dispatcher, _writer) = service(StubDispatcher::default(), StubWriter::default());

    service
        .submit(draft(vec![line("VER-2040", 3)]))
        .await
        .expect("submission succeeds");

    let payload = dispatcher
        .last_payload
        .lock()
        .expect("mutex poisoned")
        .clone()
        .expect("payload captured");
    assert_eq!(payload.first_name, "Jean");
    assert_eq!(payload.to_email, "commandes@example.fr");
    assert_eq!(payload.client_code, "ETN002");
    assert_eq!(payload.cart.len(), 1);
    assert_eq!(payload.cart[0].code, "VER-2040");
    assert_eq!(payload.cart[0].quantite, 3);
    assert_eq!(payload.comment, "livraison jeudi");
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_call() {
    let (service, dispatcher, writer) = service(StubDispatcher::default(), StubWriter::default());

    let err = service
        .submit(draft(vec![]))
        .await
        .expect_err("empty cart rejected");

    assert!(matches!(err, SubmissionError::Validation("panier")));
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_name_is_rejected_before_any_call() {
    let (service, dispatcher, writer) = service(StubDispatcher::default(), StubWriter::default());

    let mut d = draft(vec![line("VER-2040", 1)]);
    d.first_name = "   ".to_owned();
    let err = service.submit(d).await.expect_err("blank name rejected");

    assert!(matches!(err, SubmissionError::Validation("prénom")));
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_order_number_is_rejected_before_any_call() {
    let (service, dispatcher, writer) = service(StubDispatcher::default(), StubWriter::default());

    let mut d = draft(vec![line("VER-2040", 1)]);
    d.order_number = "  ".to_owned();
    let err = service
        .submit(d)
        .await
        .expect_err("blank order number rejected");

    assert!(matches!(
        err,
        SubmissionError::Validation("numéro de commande")
    ));
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn submit_cart_success_empties_the_cart() {
    let (service, _dispatcher, _writer) = service(StubDispatcher::default(), StubWriter::default());
    let mut cart = cart_with(vec![line("VER-2040", 2), line("FLX-0815", 1)]);

    let receipt = service
        .submit_cart(&mut cart, form(), ClientCode::parse("ETN002").expect("valid code"))
        .await
        .expect("submission succeeds");

    assert_eq!(receipt.order_number, "CMD-2026-001");
    assert!(cart.is_empty());
}

#[tokio::test]
async fn submit_cart_keeps_lines_on_remote_failure() {
    let (service, _dispatcher, writer) = service(
        StubDispatcher {
            fail_with: Some("service unavailable".to_owned()),
            ..StubDispatcher::default()
        },
        StubWriter::default(),
    );
    let mut cart = cart_with(vec![line("VER-2040", 2)]);

    let err = service
        .submit_cart(&mut cart, form(), ClientCode::parse("ETN002").expect("valid code"))
        .await
        .expect_err("remote failure surfaces");

    assert!(matches!(err, SubmissionError::RemoteService(_)));
    assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.total_quantity(), 2);
}

#[tokio::test]
async fn submit_cart_keeps_lines_on_persistence_failure() {
    let (service, dispatcher, _writer) = service(
        StubDispatcher::default(),
        StubWriter {
            fail: true,
            ..StubWriter::default()
        },
    );
    let mut cart = cart_with(vec![line("VER-2040", 2)]);

    let err = service
        .submit_cart(&mut cart, form(), ClientCode::parse("ETN002").expect("valid code"))
        .await
        .expect_err("insert failure surfaces");

    // The PDF went out but the row was not written; the user keeps the
    // cart and decides whether to resubmit.
    assert!(matches!(err, SubmissionError::Persistence(_)));
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cart.lines().len(), 1);
}

#[tokio::test]
async fn remote_failure_skips_the_insert() {
    let (service, dispatcher, writer) = service(
        StubDispatcher {
            fail_with: Some("timeout while generating PDF".to_owned()),
            ..StubDispatcher::default()
        },
        StubWriter::default(),
    );

    let err = service
        .submit(draft(vec![line("VER-2040", 1)]))
        .await
        .expect_err("remote failure surfaces");

    assert!(matches!(err, SubmissionError::RemoteService(message)
        if message.contains("timeout")));
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn insert_failure_after_remote_success_reports_persistence() {
    let (service, dispatcher, writer) = service(
        StubDispatcher::default(),
        StubWriter {
            fail: true,
            ..StubWriter::default()
        },
    );

    let err = service
        .submit(draft(vec![line("VER-2040", 1)]))
        .await
        .expect_err("insert failure surfaces");

    // Persistence is distinct from RemoteService: the PDF went out.
    assert!(matches!(err, SubmissionError::Persistence(_)));
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_submission_for_same_client_is_rejected() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let (service, dispatcher, writer) = service(
        StubDispatcher {
            entered: Some(Arc::clone(&entered)),
            release: Some(Arc::clone(&release)),
            ..StubDispatcher::default()
        },
        StubWriter::default(),
    );
    let service = Arc::new(service);

    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.submit(draft(vec![line("VER-2040", 1)])).await })
    };

    // Wait until the first submission is inside the remote call, then
    // try a second one for the same client.
    entered.notified().await;
    let err = service
        .submit(draft(vec![line("FLX-0815", 2)]))
        .await
        .expect_err("overlapping submission rejected");
    assert!(matches!(err, SubmissionError::AlreadyInFlight));

    release.notify_one();
    let receipt = first
        .await
        .expect("task join")
        .expect("first submission succeeds");
    assert_eq!(receipt.order_number, "CMD-2026-001");

    // Only the first submission reached the remote service and the
    // database.
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn guard_is_released_after_failure() {
    let (service, dispatcher, _writer) = service(
        StubDispatcher {
            fail_with: Some("service unavailable".to_owned()),
            ..StubDispatcher::default()
        },
        StubWriter::default(),
    );

    let err = service
        .submit(draft(vec![line("VER-2040", 1)]))
        .await
        .expect_err("first attempt fails");
    assert!(matches!(err, SubmissionError::RemoteService(_)));

    // The in-flight slot is free again, not stuck on AlreadyInFlight.
    let err = service
        .submit(draft(vec![line("VER-2040", 1)]))
        .await
        .expect_err("second attempt fails the same way");
    assert!(matches!(err, SubmissionError::RemoteService(_)));
    assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 2);
}
