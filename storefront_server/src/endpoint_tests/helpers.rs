use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::Utc;
use log::debug;
use serde_json::{json, Value};
use storefront_common::{Cents, Secret};
use storefront_engine::{
    db_types::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatusType, Product, ProductId},
    reconciliation_objects::FulfillmentPolicy,
    ReconciliationApi,
};
use stripe_tools::{compute_signature, WebhookVerifier, DEFAULT_SIGNATURE_TOLERANCE, SIGNATURE_HEADER};

use super::mocks::{MockFulfillmentDb, MockLineItems};
use crate::stripe_routes::StripeWebhookRoute;

// Test-only signing secret. Never use it anywhere else.
pub const WEBHOOK_SECRET: &str = "whsec_test_5b1f0c3e9a7d4e2b8c6f";

pub fn verifier() -> WebhookVerifier {
    WebhookVerifier::new(Secret::new(WEBHOOK_SECRET.to_string()), DEFAULT_SIGNATURE_TOLERANCE)
}

pub fn sign(body: &str) -> String {
    let t = Utc::now().timestamp();
    let sig = compute_signature(WEBHOOK_SECRET, t, body.as_bytes()).expect("Could not sign payload");
    format!("t={t},v1={sig}")
}

pub fn checkout_event(event_type: &str, session_id: &str, payment_status: &str, metadata: Value) -> Value {
    json!({
        "id": "evt_test_1",
        "object": "event",
        "type": event_type,
        "created": Utc::now().timestamp(),
        "livemode": false,
        "data": {
            "object": {
                "id": session_id,
                "object": "checkout.session",
                "payment_intent": "pi_test_1",
                "payment_status": payment_status,
                "customer_details": { "email": "stripe@example.com", "name": "Stripe Name" },
                "metadata": metadata,
                "amount_subtotal": 8099,
                "amount_total": 8747,
                "currency": "usd"
            }
        }
    })
}

pub fn jane_metadata() -> Value {
    json!({
        "customerName": "Jane Doe",
        "customerEmail": "a@b.com",
        "address": "12 Elm St",
        "city": "Portland",
        "state": "OR",
        "zipCode": "97201",
        "country": "US"
    })
}

pub fn product(id: &ProductId) -> Product {
    Product {
        id: id.clone(),
        name: "Lavender Soap".into(),
        price: Cents::from(2500),
        stock: 10,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn order_from(id: i64, new: NewOrder) -> Order {
    Order {
        id,
        session_id: new.session_id,
        payment_id: new.payment_id,
        email: new.customer.email,
        name: new.customer.name,
        phone: new.customer.phone,
        address: new.address.street,
        city: new.address.city,
        state: new.address.state,
        zip_code: new.address.zip_code,
        country: new.address.country,
        subtotal: new.subtotal,
        shipping: new.shipping,
        tax: new.tax,
        total: new.total,
        status: OrderStatusType::Processing,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn items_from(order_id: i64, items: &[NewOrderItem]) -> Vec<OrderItem> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| OrderItem {
            id: i as i64 + 1,
            order_id,
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            price: item.price,
        })
        .collect()
}

pub fn existing_order(id: i64, session_id: &str) -> Order {
    let new = NewOrder {
        session_id: session_id.to_string(),
        payment_id: Some("pi_test_1".into()),
        customer: Default::default(),
        address: Default::default(),
        subtotal: Cents::from(7500),
        shipping: Cents::from(599),
        tax: Cents::from(648),
        total: Cents::from(8747),
    };
    order_from(id, new)
}

pub async fn post_webhook(
    body: &str,
    signature: Option<String>,
    verifier: WebhookVerifier,
    db: MockFulfillmentDb,
    line_items: MockLineItems,
) -> (StatusCode, String) {
    let api = ReconciliationApi::new(db, line_items, FulfillmentPolicy::default());
    let app = App::new().app_data(web::Data::new(verifier)).app_data(web::Data::new(api)).service(
        web::scope("/stripe").service(StripeWebhookRoute::<MockFulfillmentDb, MockLineItems>::new()),
    );
    let service = test::init_service(app).await;
    let mut req = TestRequest::post().uri("/stripe/webhook").set_payload(body.to_string());
    if let Some(sig) = signature {
        req = req.insert_header((SIGNATURE_HEADER, sig));
    }
    debug!("Making webhook request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}
