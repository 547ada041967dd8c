// orderdesk-client/tests/order_workflows.rs
// Order board, payment and destructive-action workflows against a mock backend

use httpmock::prelude::*;
use orderdesk_client::confirm::{Confirmation, ScriptedGate};
use orderdesk_client::guard::InFlightKey;
use orderdesk_client::notify::{MemoryNotifier, NoticeLevel};
use orderdesk_client::workflow::DialogState;
use orderdesk_client::{ClientConfig, ClientError, NetworkHttpClient, OrderDesk};
use serde_json::{Value, json};
use shared::error::ErrorCode;
use shared::models::{OrderListQuery, OrderStatus, PaymentMethod, PaymentStatus};
use shared::order::PaymentBadge;
use std::sync::Arc;
use tempfile::TempDir;

const TOKEN: &str = "t0k";

fn order_json(payment_status: &str, status: &str, is_delete: bool) -> Value {
    json!({
        "_id": "665f",
        "id": "O-1",
        "total": 100,
        "shippingCost": 10,
        "status": status,
        "paymentStatus": payment_status,
        "isDelete": is_delete,
        "items": [
            {"productId": "p1", "productName": "Apples", "quantity": 3, "unitPrice": 30,
             "total": 90}
        ]
    })
}

fn page_json(order: Value) -> Value {
    json!({
        "orders": [order],
        "totalOrders": 1,
        "summary": {"totalOrders": 1, "totalAmount": 100, "totalReceived": 0, "totalPending": 100}
    })
}

struct Harness {
    desk: OrderDesk<NetworkHttpClient>,
    gate: Arc<ScriptedGate>,
    notifier: Arc<MemoryNotifier>,
    _docs: TempDir,
}

fn harness(server: &MockServer, answer: Confirmation) -> Harness {
    let docs = TempDir::new().unwrap();
    let gate = Arc::new(ScriptedGate::new(answer));
    let notifier = Arc::new(MemoryNotifier::new());
    let config = ClientConfig::new(server.base_url())
        .with_token(TOKEN)
        .with_timeout(5)
        .with_document_dir(docs.path());
    let desk = OrderDesk::builder(config)
        .gate(gate.clone())
        .notifier(notifier.clone())
        .build()
        .unwrap();
    Harness {
        desk,
        gate,
        notifier,
        _docs: docs,
    }
}

#[tokio::test]
async fn test_cash_payment_end_to_end() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);

    let mut list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/order/getAll")
                .query_param("page", "1")
                .query_param("limit", "20")
                .header("authorization", "Bearer t0k");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;

    let mut board = h.desk.order_board();
    board
        .load(h.desk.session(), OrderListQuery::default())
        .await
        .unwrap();
    list.assert_async().await;

    let view = board.view("665f").unwrap();
    assert_eq!(view.badge, PaymentBadge::Unpaid);
    assert_eq!(view.badge.label(), "unpaid");
    assert_eq!(view.payment_button_label(), Some("Pay Now"));

    let payment = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/order/update-payment/665f")
                .header("authorization", "Bearer t0k")
                .json_body(json!({"method": "cash", "notes": "paid in office"}));
            then.status(200).json_body(json!({"message": "Payment updated"}));
        })
        .await;

    // the refetch answers with what the server decided
    list.delete_async().await;
    let refetch = server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("paid", "processing", false)));
        })
        .await;

    let mut dialog = board.open_payment("665f").unwrap();
    assert_eq!(dialog.target().order_id, "O-1");
    dialog.select_method(PaymentMethod::Cash);
    dialog.set_notes("paid in office");
    board
        .submit_payment(h.desk.session(), &mut dialog)
        .await
        .unwrap();

    payment.assert_async().await;
    refetch.assert_async().await;
    assert_eq!(dialog.state(), DialogState::Closed);
    assert_eq!(
        board.find("665f").unwrap().payment_status,
        PaymentStatus::Paid
    );
    assert_eq!(h.notifier.count(NoticeLevel::Success), 1);
}

#[tokio::test]
async fn test_credit_card_without_transaction_id_sends_nothing() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;
    let payment = server
        .mock_async(|when, then| {
            when.method(PUT).path("/order/update-payment/665f");
            then.status(200).json_body(json!({}));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();

    let mut dialog = board.open_payment("665f").unwrap();
    dialog.select_method(PaymentMethod::CreditCard);
    dialog.set_transaction_id("   ");
    let err = board
        .submit_payment(h.desk.session(), &mut dialog)
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(dialog.error().unwrap().field(), Some("transactionId"));
    assert_eq!(dialog.state(), DialogState::Editing);
    assert_eq!(payment.hits_async().await, 0);
}

#[tokio::test]
async fn test_rejected_payment_keeps_dialog_open_and_data_intact() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);

    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;
    let payment = server
        .mock_async(|when, then| {
            when.method(PUT).path("/order/update-payment/665f");
            then.status(422).json_body(json!({
                "message": "Payment exceeds order total",
                "errors": [
                    {"field": "amount", "requested": 120, "available": 100, "reason": "too high"}
                ]
            }));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();

    let mut dialog = board.open_payment("665f").unwrap();
    dialog.select_method(PaymentMethod::Cheque);
    dialog.set_notes("cheque #12");
    let err = board
        .submit_payment(h.desk.session(), &mut dialog)
        .await
        .unwrap_err();

    match &err {
        ClientError::Rejected(report) => {
            assert_eq!(report.message, "Payment exceeds order total");
            assert!(report.render_table().contains("too high"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    payment.assert_async().await;
    // no refetch after a failure
    list.assert_async().await;
    assert_eq!(dialog.state(), DialogState::Editing);
    assert!(dialog.can_submit());
    assert_eq!(
        board.find("665f").unwrap().payment_status,
        PaymentStatus::Pending
    );
    assert_eq!(h.notifier.count(NoticeLevel::Error), 1);
}

#[tokio::test]
async fn test_in_flight_order_refuses_second_payment() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("partial", "shipped", false)));
        })
        .await;
    let payment = server
        .mock_async(|when, then| {
            when.method(PUT).path("/order/update-payment/665f");
            then.status(200).json_body(json!({}));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();

    let _held = h
        .desk
        .guard()
        .acquire(InFlightKey::Order("665f".into()), "payment")
        .unwrap();

    let mut dialog = board.open_payment("665f").unwrap();
    dialog.select_method(PaymentMethod::Cash);
    dialog.set_notes("second try");
    let err = board
        .submit_payment(h.desk.session(), &mut dialog)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Busy(_)));
    assert_eq!(err.code(), ErrorCode::OrderBusy);
    assert_eq!(payment.hits_async().await, 0);
    assert!(dialog.can_submit());
}

#[tokio::test]
async fn test_mark_unpaid_is_gated() {
    let server = MockServer::start_async().await;

    let unpaid = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/order/mark-unpaid/665f")
                .header("authorization", "Bearer t0k");
            then.status(200).body("");
        })
        .await;

    // pending: not offered at all
    let h = harness(&server, Confirmation::yes());
    let mut list = server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;
    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    let err = board.mark_unpaid(h.desk.session(), "665f").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PaymentActionUnavailable);
    assert!(h.gate.asked().is_empty());
    list.delete_async().await;

    // paid, declined: no request
    list = server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("paid", "processing", false)));
        })
        .await;
    let declined = harness(&server, Confirmation::Declined);
    let mut board = declined.desk.order_board();
    board.refresh(declined.desk.session()).await.unwrap();
    let decision = board.mark_unpaid(declined.desk.session(), "665f").await.unwrap();
    assert!(decision.is_declined());
    assert_eq!(unpaid.hits_async().await, 0);

    // paid, confirmed: exactly one request
    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    let decision = board.mark_unpaid(h.desk.session(), "665f").await.unwrap();
    assert!(!decision.is_declined());
    unpaid.assert_async().await;
    list.delete_async().await;
}

#[tokio::test]
async fn test_void_requires_reason() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;
    let void = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/order/delete/665f")
                .json_body(json!({"reason": "customer cancelled by phone"}));
            then.status(200).json_body(json!({"message": "Order voided"}));
        })
        .await;

    let no_reason = harness(&server, Confirmation::Confirmed { reason: Some("  ".into()) });
    let mut board = no_reason.desk.order_board();
    board.refresh(no_reason.desk.session()).await.unwrap();
    let err = board.void(no_reason.desk.session(), "665f").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::VoidReasonRequired);
    assert_eq!(void.hits_async().await, 0);

    let h = harness(
        &server,
        Confirmation::with_reason("customer cancelled by phone"),
    );
    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    let decision = board.void(h.desk.session(), "665f").await.unwrap();
    assert!(!decision.is_declined());
    void.assert_async().await;
}

#[tokio::test]
async fn test_voided_order_is_locked() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::yes());
    let mut voided = order_json("paid", "shipped", true);
    voided["deleted"] = json!({"reason": "short shipped", "amount": 40});
    voided["items"][0]["deletedQuantity"] = json!(1);
    voided["items"][0]["deletedTotal"] = json!(30);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(voided));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/order/update/665f");
            then.status(200).json_body(json!({}));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();

    let view = board.view("665f").unwrap();
    assert_eq!(view.amount, rust_decimal::Decimal::from(40));
    assert_eq!(view.lines[0].quantity, rust_decimal::Decimal::ONE);
    assert!(!view.actions.can_pay());
    assert!(!view.actions.mark_unpaid);

    assert_eq!(
        board.open_payment("665f").unwrap_err().code(),
        ErrorCode::OrderAlreadyVoided
    );
    let err = board
        .change_status(h.desk.session(), "665f", OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OrderAlreadyVoided);
    assert_eq!(update.hits_async().await, 0);
}

#[tokio::test]
async fn test_status_change_patches_board_locally() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/order/update/665f")
                .json_body(json!({"status": "shipped"}));
            then.status(200).json_body(json!({"message": "Order updated"}));
        })
        .await;
    let notes = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/order/update/665f")
                .json_body(json!({"notes": "leave at back door"}));
            then.status(200).body("");
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    board
        .change_status(h.desk.session(), "665f", OrderStatus::Shipped)
        .await
        .unwrap();
    board
        .update_notes(h.desk.session(), "665f", "leave at back door")
        .await
        .unwrap();

    update.assert_async().await;
    notes.assert_async().await;
    // patched in place, no refetch
    list.assert_async().await;
    let order = board.find("665f").unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.notes.as_deref(), Some("leave at back door"));
}

#[tokio::test]
async fn test_hard_delete_removes_order() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::yes());
    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/order/hard-delete/665f");
            then.status(200).json_body(json!({"message": "deleted"}));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    board.hard_delete(h.desk.session(), "665f").await.unwrap();

    delete.assert_async().await;
    assert!(board.orders().is_empty());
    assert_eq!(h.gate.asked().len(), 1);
}

#[tokio::test]
async fn test_failed_refresh_keeps_orders() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);
    let mut list = server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    list.delete_async().await;

    list = server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(500).body("database unavailable");
        })
        .await;
    let err = board.refresh(h.desk.session()).await.unwrap_err();
    assert!(matches!(err, ClientError::Internal(_)));
    list.assert_async().await;
    assert_eq!(board.orders().len(), 1);
    assert_eq!(h.notifier.count(NoticeLevel::Error), 1);
}

#[tokio::test]
async fn test_csv_export_written_to_document_dir() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    let path = board.export_csv(h.desk.sink()).await.unwrap();

    let csv = std::fs::read_to_string(path).unwrap();
    assert!(csv.contains("O-1,,,processing,unpaid,100.00,false,"));
}

#[tokio::test]
async fn test_invoice_netted_by_credit_memos() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Confirmation::Declined);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/getAll");
            then.status(200).json_body(page_json(order_json("pending", "processing", false)));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/creditmemo/by-order/665f");
            then.status(200).json_body(json!([
                {"_id": "c1", "creditMemoNumber": "CM-1", "orderId": "665f", "status": "approved",
                 "items": [{"productId": "p1", "quantity": 1, "unitPrice": 30}],
                 "totalAmount": 30},
                {"_id": "c2", "creditMemoNumber": "CM-2", "orderId": "665f", "status": "cancelled",
                 "items": [{"productId": "p1", "quantity": 2, "unitPrice": 30}],
                 "totalAmount": 60}
            ]));
        })
        .await;

    let mut board = h.desk.order_board();
    board.refresh(h.desk.session()).await.unwrap();
    let order = board.orders()[0].clone();
    let memos = h
        .desk
        .credit_memo_service()
        .list(h.desk.session(), &order)
        .await
        .unwrap();
    let path = board
        .save_invoice("665f", &memos, h.desk.sink())
        .await
        .unwrap();

    let invoice = std::fs::read_to_string(path).unwrap();
    assert!(invoice.contains("CM-1 (approved)"));
    assert!(!invoice.contains("CM-2"));
    let net = invoice.lines().find(|l| l.starts_with("Net amount")).unwrap();
    assert!(net.ends_with("70.00"));
}
