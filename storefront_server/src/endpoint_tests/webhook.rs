use actix_web::http::StatusCode;
use serde_json::json;
use storefront_common::{Cents, Secret};
use storefront_engine::{
    reconciliation_objects::PaidLineItem,
    traits::{FulfillmentError, InsertOrderResult, LineItemSourceError},
};
use stripe_tools::{WebhookVerifier, DEFAULT_SIGNATURE_TOLERANCE};

use super::{
    helpers::*,
    mocks::{MockFulfillmentDb, MockLineItems},
};

fn paid_event(session_id: &str) -> String {
    checkout_event("checkout.session.completed", session_id, "paid", jane_metadata()).to_string()
}

fn soap_and_shipping() -> Vec<PaidLineItem> {
    vec![
        PaidLineItem::new("Lavender Soap", 3, Cents::from(7500)).with_product_ref("P1"),
        PaidLineItem::new("Shipping", 1, Cents::from(599)),
    ]
}

#[actix_web::test]
async fn missing_signature() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let (status, body) =
        post_webhook(&body, None, verifier(), MockFulfillmentDb::new(), MockLineItems::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("signature"), "{body}");
}

#[actix_web::test]
async fn tampered_body() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let tampered = body.replace("cs_test_1", "cs_test_2");
    let (status, _) =
        post_webhook(&tampered, Some(sig), verifier(), MockFulfillmentDb::new(), MockLineItems::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn garbled_signature_header() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let (status, _) = post_webhook(
        &body,
        Some("not a signature".into()),
        verifier(),
        MockFulfillmentDb::new(),
        MockLineItems::new(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unconfigured_secret() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let unconfigured = WebhookVerifier::new(Secret::new(String::new()), DEFAULT_SIGNATURE_TOLERANCE);
    let (status, _) =
        post_webhook(&body, Some(sig), unconfigured, MockFulfillmentDb::new(), MockLineItems::new()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn signed_garbage() {
    let _ = env_logger::try_init();
    let body = "this is not json";
    let sig = sign(body);
    let (status, _) =
        post_webhook(body, Some(sig), verifier(), MockFulfillmentDb::new(), MockLineItems::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn ignored_event_type() {
    let _ = env_logger::try_init();
    let body = json!({
        "id": "evt_test_2",
        "type": "payment_intent.created",
        "data": { "object": { "id": "pi_test_1" } }
    })
    .to_string();
    let sig = sign(&body);
    let (status, body) =
        post_webhook(&body, Some(sig), verifier(), MockFulfillmentDb::new(), MockLineItems::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("payment_intent.created ignored"), "{body}");
}

#[actix_web::test]
async fn unpaid_session_is_acknowledged() {
    let _ = env_logger::try_init();
    let body = checkout_event("checkout.session.completed", "cs_test_1", "unpaid", jane_metadata()).to_string();
    let sig = sign(&body);
    let (status, body) =
        post_webhook(&body, Some(sig), verifier(), MockFulfillmentDb::new(), MockLineItems::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("not paid yet"), "{body}");
}

#[actix_web::test]
async fn paid_session_creates_order() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let mut db = MockFulfillmentDb::new();
    db.expect_fetch_order_by_session_id().times(1).returning(|id| {
        assert_eq!(id, "cs_test_1");
        Ok(None)
    });
    db.expect_fetch_product_by_id().times(1).returning(|id| Ok(Some(product(id))));
    db.expect_insert_order_with_items().times(1).returning(|order, items| {
        assert_eq!(order.session_id, "cs_test_1");
        assert_eq!(order.payment_id.as_deref(), Some("pi_test_1"));
        assert_eq!(order.customer.email, "a@b.com");
        assert_eq!(order.customer.name, "Jane Doe");
        assert_eq!(order.address.city.as_deref(), Some("Portland"));
        assert_eq!(order.subtotal, Cents::from(7500));
        assert_eq!(order.shipping, Cents::from(599));
        assert_eq!(order.tax, Cents::from(648));
        assert_eq!(order.total, Cents::from(8747));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id.as_str(), "P1");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].price, Cents::from(2500));
        let items = items_from(7, items);
        Ok(InsertOrderResult::Inserted { order: order_from(7, order), items })
    });
    let mut line_items = MockLineItems::new();
    line_items.expect_fetch_line_items().times(1).returning(|_| Ok(soap_and_shipping()));
    let (status, body) = post_webhook(&body, Some(sig), verifier(), db, line_items).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Order created.","order_id":7}"#);
}

#[actix_web::test]
async fn unmatched_lines_are_reported() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let mut db = MockFulfillmentDb::new();
    db.expect_fetch_order_by_session_id().returning(|_| Ok(None));
    db.expect_fetch_product_by_id().returning(|_| Ok(None));
    db.expect_fetch_product_by_name().returning(|_| Ok(None));
    db.expect_insert_order_with_items().times(1).returning(|order, items| {
        assert!(items.is_empty());
        assert_eq!(order.subtotal, Cents::from(7500));
        Ok(InsertOrderResult::Inserted { order: order_from(8, order), items: vec![] })
    });
    let mut line_items = MockLineItems::new();
    line_items.expect_fetch_line_items().returning(|_| Ok(soap_and_shipping()));
    let (status, body) = post_webhook(&body, Some(sig), verifier(), db, line_items).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Lavender Soap"), "{body}");
    assert!(body.contains(r#""order_id":8"#), "{body}");
}

#[actix_web::test]
async fn duplicate_delivery() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let mut db = MockFulfillmentDb::new();
    db.expect_fetch_order_by_session_id().times(1).returning(|id| Ok(Some(existing_order(3, id))));
    let (status, body) = post_webhook(&body, Some(sig), verifier(), db, MockLineItems::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Session already processed.","order_id":3}"#);
}

#[actix_web::test]
async fn lost_insert_race() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let mut db = MockFulfillmentDb::new();
    db.expect_fetch_order_by_session_id().returning(|_| Ok(None));
    db.expect_fetch_product_by_id().returning(|id| Ok(Some(product(id))));
    db.expect_insert_order_with_items().returning(|_, _| Ok(InsertOrderResult::AlreadyExists(4)));
    db.expect_fetch_order_by_id().times(1).returning(|id| Ok(Some(existing_order(id, "cs_test_1"))));
    let mut line_items = MockLineItems::new();
    line_items.expect_fetch_line_items().returning(|_| Ok(soap_and_shipping()));
    let (status, body) = post_webhook(&body, Some(sig), verifier(), db, line_items).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""order_id":4"#), "{body}");
}

#[actix_web::test]
async fn session_without_email() {
    let _ = env_logger::try_init();
    let mut event = checkout_event("checkout.session.completed", "cs_test_1", "paid", json!({}));
    event["data"]["object"]["customer_details"] = json!(null);
    let body = event.to_string();
    let sig = sign(&body);
    let mut db = MockFulfillmentDb::new();
    db.expect_fetch_order_by_session_id().returning(|_| Ok(None));
    let (status, body) = post_webhook(&body, Some(sig), verifier(), db, MockLineItems::new()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("email"), "{body}");
}

#[actix_web::test]
async fn line_item_fetch_failure() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let mut db = MockFulfillmentDb::new();
    db.expect_fetch_order_by_session_id().returning(|_| Ok(None));
    let mut line_items = MockLineItems::new();
    line_items
        .expect_fetch_line_items()
        .returning(|id| Err(LineItemSourceError::new(id, "connection reset by peer")));
    let (status, _) = post_webhook(&body, Some(sig), verifier(), db, line_items).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn persistence_failure() {
    let _ = env_logger::try_init();
    let body = paid_event("cs_test_1");
    let sig = sign(&body);
    let mut db = MockFulfillmentDb::new();
    db.expect_fetch_order_by_session_id().returning(|_| Ok(None));
    db.expect_fetch_product_by_id().returning(|id| Ok(Some(product(id))));
    db.expect_insert_order_with_items()
        .returning(|_, _| Err(FulfillmentError::DatabaseError("database is locked".into())));
    let mut line_items = MockLineItems::new();
    line_items.expect_fetch_line_items().returning(|_| Ok(soap_and_shipping()));
    let (status, _) = post_webhook(&body, Some(sig), verifier(), db, line_items).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
