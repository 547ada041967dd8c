// orderdesk-client/tests/credit_memo_workflows.rs
// Credit memo and statement workflows against a mock backend

use async_trait::async_trait;
use httpmock::prelude::*;
use orderdesk_client::confirm::ScriptedGate;
use orderdesk_client::guard::InFlightKey;
use orderdesk_client::notify::{MemoryNotifier, NoticeLevel};
use orderdesk_client::sink::DocumentSink;
use orderdesk_client::workflow::ManagementView;
use orderdesk_client::{ClientConfig, ClientError, ClientResult, NetworkHttpClient, OrderDesk};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::credit_memo::CreditMemoDraft;
use shared::document::Document;
use shared::error::ErrorCode;
use shared::models::{CreditReason, Order, PaymentStatus, StatementQuery};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn order() -> Order {
    serde_json::from_value(json!({
        "_id": "665f",
        "id": "O-1",
        "total": 100,
        "status": "delivered",
        "paymentStatus": "paid",
        "items": [
            {"productId": "p1", "productName": "Apples", "quantity": 3, "unitPrice": 30,
             "total": 90}
        ]
    }))
    .unwrap()
}

fn memo_json(id: &str) -> Value {
    json!({
        "_id": id,
        "creditMemoNumber": "CM-20260101-XYZ",
        "orderId": "665f",
        "orderNumber": "O-1",
        "items": [{
            "productId": "p1",
            "productName": "Apples",
            "quantity": 1,
            "unitPrice": 30,
            "total": 30,
            "reason": "damaged",
            "uploadedFiles": [{"name": "dent.jpg", "url": "/uploads/dent.jpg", "type": "image"}]
        }],
        "totalAmount": 30,
        "status": "pending"
    })
}

struct FailingSink;

#[async_trait]
impl DocumentSink for FailingSink {
    async fn save(&self, _document: &Document) -> ClientResult<PathBuf> {
        Err(ClientError::Io(std::io::Error::other("disk full")))
    }
}

struct Harness {
    desk: OrderDesk<NetworkHttpClient>,
    notifier: Arc<MemoryNotifier>,
    docs: TempDir,
}

fn harness(server: &MockServer, sink: Option<Arc<dyn DocumentSink>>) -> Harness {
    let docs = TempDir::new().unwrap();
    let notifier = Arc::new(MemoryNotifier::new());
    let config = ClientConfig::new(server.base_url())
        .with_token("t0k")
        .with_document_dir(docs.path());
    let mut builder = OrderDesk::builder(config)
        .gate(Arc::new(ScriptedGate::decline()))
        .notifier(notifier.clone());
    if let Some(sink) = sink {
        builder = builder.sink(sink);
    }
    Harness {
        desk: builder.build().unwrap(),
        notifier,
        docs,
    }
}

async fn staged_photo(h: &Harness) -> shared::credit_memo::EvidenceFile {
    let path = h.docs.path().join("dent.jpg");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    h.desk.credit_memo_service().stage_file(&path).await.unwrap()
}

#[tokio::test]
async fn test_empty_history_opens_create_mode() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/creditmemo/by-order/665f")
                .header("authorization", "Bearer t0k");
            then.status(200).json_body(json!([]));
        })
        .await;

    let view = h
        .desk
        .credit_memo_service()
        .open_management(h.desk.session(), &order())
        .await
        .unwrap();

    list.assert_async().await;
    match view {
        ManagementView::Create(draft) => {
            assert!(!draft.is_edit());
            assert_eq!(draft.order_number, "O-1");
            assert!(draft.credit_memo_number().starts_with("CM-"));
        }
        other => panic!("expected create mode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_existing_memos_are_listed() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/creditmemo/by-order/665f");
            then.status(200).json_body(json!({"creditMemos": [memo_json("cm1")]}));
        })
        .await;

    let view = h
        .desk
        .credit_memo_service()
        .open_management(h.desk.session(), &order())
        .await
        .unwrap();

    let ManagementView::List(memos) = view else {
        panic!("expected list mode");
    };
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].total_amount, Decimal::from(30));
}

#[tokio::test]
async fn test_damaged_item_needs_evidence_before_upload() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/creditmemo/create")
                .header("authorization", "Bearer t0k")
                .body_contains("name=\"data\"")
                .body_contains("\"reason\":\"damaged\"")
                .body_contains("name=\"evidence[0]\"")
                .body_contains("filename=\"dent.jpg\"");
            then.status(201)
                .json_body(json!({"message": "created", "creditMemo": memo_json("cm1")}));
        })
        .await;

    let order = order();
    let service = h.desk.credit_memo_service();
    let mut draft = service.start(&order, &[]).unwrap();
    draft.add_item(&order.items[0]).unwrap();
    draft.set_reason("p1", CreditReason::Damaged).unwrap();

    let err = service.submit(h.desk.session(), &mut draft).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::CreditMemoEvidenceRequired);
    assert_eq!(create.hits_async().await, 0);

    let photo = staged_photo(&h).await;
    draft.attach("p1", photo).unwrap();
    let outcome = service.submit(h.desk.session(), &mut draft).await.unwrap();

    create.assert_async().await;
    assert_eq!(outcome.released_files, 1);
    assert!(draft.lines()[0].evidence.is_empty());
    assert_eq!(outcome.credit_memo.storage_id, "cm1");
    let document = std::fs::read_to_string(outcome.document.unwrap()).unwrap();
    assert!(document.contains("CM-20260101-XYZ"));
    assert_eq!(h.notifier.count(NoticeLevel::Success), 1);
}

#[tokio::test]
async fn test_document_failure_keeps_committed_memo() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Some(Arc::new(FailingSink)));
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/creditmemo/create");
            // no memo echoed back
            then.status(200).json_body(json!({"message": "created"}));
        })
        .await;

    let order = order();
    let service = h.desk.credit_memo_service();
    let mut draft = service.start(&order, &[]).unwrap();
    draft.add_item(&order.items[0]).unwrap();
    draft.set_reason("p1", CreditReason::WrongItem).unwrap();
    let number = draft.credit_memo_number().to_string();

    let outcome = service.submit(h.desk.session(), &mut draft).await.unwrap();

    create.assert_async().await;
    assert!(outcome.document.is_none());
    assert_eq!(outcome.credit_memo.credit_memo_number, number);
    assert_eq!(outcome.credit_memo.total_amount, Decimal::from(30));
    assert_eq!(h.notifier.count(NoticeLevel::Success), 1);
    assert_eq!(h.notifier.count(NoticeLevel::Warning), 1);
    assert_eq!(h.notifier.count(NoticeLevel::Error), 0);
}

#[tokio::test]
async fn test_edit_updates_existing_memo() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/creditmemo/update/cm1")
                .body_contains("\"creditMemoNumber\":\"CM-20260101-XYZ\"")
                .body_contains("\"quantity\":2.0");
            then.status(200).json_body(json!({"data": memo_json("cm1")}));
        })
        .await;

    let memo = serde_json::from_value(memo_json("cm1")).unwrap();
    let order = order();
    let service = h.desk.credit_memo_service();
    let mut draft: CreditMemoDraft = service.edit(memo, Some(&order), &[]);
    draft.set_quantity("p1", Decimal::from(2)).unwrap();
    assert_eq!(
        draft.remove_item("p1").unwrap_err().code,
        ErrorCode::CreditMemoItemLocked
    );

    service.submit(h.desk.session(), &mut draft).await.unwrap();
    update.assert_async().await;
}

#[tokio::test]
async fn test_busy_order_refuses_second_submission() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/creditmemo/create");
            then.status(200).json_body(json!({}));
        })
        .await;

    let order = order();
    let service = h.desk.credit_memo_service();
    let mut draft = service.start(&order, &[]).unwrap();
    draft.add_item(&order.items[0]).unwrap();

    let _held = h
        .desk
        .guard()
        .acquire(InFlightKey::CreditMemo("665f".into()), "credit_memo")
        .unwrap();
    let err = service.submit(h.desk.session(), &mut draft).await.unwrap_err();

    assert!(matches!(err, ClientError::Busy(_)));
    assert_eq!(create.hits_async().await, 0);
}

#[tokio::test]
async fn test_rejected_memo_is_reported() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    server
        .mock_async(|when, then| {
            when.method(POST).path("/creditmemo/create");
            then.status(409).json_body(json!({
                "message": "Credit exceeds remaining quantity",
                "errors": [{"productName": "Apples", "requested": 3, "available": 1}]
            }));
        })
        .await;

    let order = order();
    let service = h.desk.credit_memo_service();
    let mut draft = service.start(&order, &[]).unwrap();
    draft.add_item(&order.items[0]).unwrap();
    let photo = staged_photo(&h).await;
    draft.set_reason("p1", CreditReason::Defective).unwrap();
    draft.attach("p1", photo).unwrap();

    let err = service.submit(h.desk.session(), &mut draft).await.unwrap_err();

    let ClientError::Rejected(report) = &err else {
        panic!("expected rejection, got {:?}", err);
    };
    assert!(report.render_table().contains("Apples"));
    // staged files survive a failed commit
    assert_eq!(draft.lines()[0].evidence.len(), 1);
    assert_eq!(h.notifier.count(NoticeLevel::Error), 1);
}

#[tokio::test]
async fn test_stage_file_rejects_documents() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    let err = h
        .desk
        .credit_memo_service()
        .stage_file(&h.docs.path().join("notes.txt"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedFileFormat);
}

#[tokio::test]
async fn test_statement_generated_and_saved() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    let statement = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/order/statement/u1")
                .query_param("paymentStatus", "pending")
                .query_param("send", "true");
            then.status(200).json_body(json!({
                "customer": {"_id": "u1", "storeName": "Corner Shop"},
                "orders": [
                    {"_id": "a", "id": "O-1", "total": 50, "paymentStatus": "pending"},
                    {"_id": "b", "id": "O-2", "total": 70, "paymentStatus": "paid"}
                ],
                "emailSent": false
            }));
        })
        .await;

    let query = StatementQuery::default()
        .with_payment_status(PaymentStatus::Pending)
        .sending_email();
    let outcome = h
        .desk
        .statements()
        .generate(h.desk.session(), "u1", &query)
        .await
        .unwrap();

    statement.assert_async().await;
    assert!(!outcome.email_sent);
    let text = std::fs::read_to_string(&outcome.path).unwrap();
    assert!(text.contains("Corner Shop"));
    assert!(text.contains("O-1"));
    assert!(!text.contains("O-2"));
    assert_eq!(h.notifier.count(NoticeLevel::Warning), 1);
}

#[tokio::test]
async fn test_statement_failure_is_a_warning() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/order/statement/u1");
            then.status(404).body("customer not found");
        })
        .await;

    let err = h
        .desk
        .statements()
        .generate(h.desk.session(), "u1", &StatementQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(h.notifier.count(NoticeLevel::Warning), 1);
    assert_eq!(h.notifier.count(NoticeLevel::Error), 0);
}

#[tokio::test]
async fn test_new_memo_bounded_by_existing_credits() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/creditmemo/by-order/665f");
            then.status(200).json_body(json!([memo_json("cm1")]));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/creditmemo/create");
            then.status(200).json_body(json!({}));
        })
        .await;

    let order = order();
    let service = h.desk.credit_memo_service();
    let existing = service.list(h.desk.session(), &order).await.unwrap();

    // 3 ordered, 1 already credited by cm1
    let mut draft = service.start(&order, &existing).unwrap();
    draft.add_item(&order.items[0]).unwrap();
    let err = draft.set_quantity("p1", Decimal::from(3)).unwrap_err();
    assert_eq!(err.code, ErrorCode::CreditMemoInvalidQuantity);
    draft.set_quantity("p1", Decimal::from(2)).unwrap();

    // editing cm1 itself only counts the other memos
    let memo = existing[0].clone();
    let mut edit = service.edit(memo, Some(&order), &existing);
    edit.set_quantity("p1", Decimal::from(3)).unwrap();

    assert_eq!(create.hits_async().await, 0);
}
