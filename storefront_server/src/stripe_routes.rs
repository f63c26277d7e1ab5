//----------------------------------------------   Stripe webhook  ----------------------------------------------------
//
// Stripe retries any delivery that does not get a 2xx response. The handler therefore answers 200 for everything it
// has dealt with, including duplicates and event types it does not care about, 400 for deliveries that can never
// succeed, and 5xx only when a retry could help.
use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use storefront_engine::{reconciliation_objects::ReconciliationOutcome, FulfillmentDatabase, LineItemSource, ReconciliationApi};
use stripe_tools::{data_objects::PaymentStatus, EventKind, WebhookError, WebhookEvent, WebhookVerifier, SIGNATURE_HEADER};

use crate::{
    data_objects::JsonResponse,
    errors::ServerError,
    integrations::stripe::paid_session_from_checkout,
    route,
};

route!(stripe_webhook => Post "/webhook" impl FulfillmentDatabase, LineItemSource);
pub async fn stripe_webhook<BDb, BItems>(
    req: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<WebhookVerifier>,
    api: web::Data<ReconciliationApi<BDb, BItems>>,
) -> Result<HttpResponse, ServerError>
where
    BDb: FulfillmentDatabase,
    BItems: LineItemSource,
{
    trace!("💳️ Received webhook request: {}", req.uri());
    let signature = match req.headers().get(SIGNATURE_HEADER) {
        Some(v) => Some(v.to_str().map_err(|_| WebhookError::InvalidSignature("Header is not valid ASCII".into()))?),
        None => None,
    };
    // The signature covers the exact bytes Stripe sent, so the body is verified before it is parsed
    let event = verifier.verify(&body, signature).map_err(|e| {
        warn!("💳️ Rejected webhook delivery. {e}");
        ServerError::from(e)
    })?;
    debug!("💳️ Verified event {} of type {}", event.id, event.event_type);
    match event.kind() {
        EventKind::CheckoutSessionCompleted | EventKind::CheckoutSessionAsyncPaymentSucceeded => {
            handle_checkout_completed(&event, api.as_ref()).await
        },
        EventKind::Other(kind) => {
            info!("💳️ Ignoring event {} of type {kind}", event.id);
            Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Event type {kind} ignored."))))
        },
    }
}

async fn handle_checkout_completed<BDb, BItems>(
    event: &WebhookEvent,
    api: &ReconciliationApi<BDb, BItems>,
) -> Result<HttpResponse, ServerError>
where
    BDb: FulfillmentDatabase,
    BItems: LineItemSource,
{
    let session = event.checkout_session()?;
    if session.payment_status == PaymentStatus::Unpaid {
        // Delayed payment methods complete the session first and pay later, with a separate event
        info!("💳️ Checkout session [{}] completed, but is not paid yet. Waiting for the payment event.", session.id);
        return Ok(HttpResponse::Ok().json(JsonResponse::success("Session is not paid yet.")));
    }
    let paid = paid_session_from_checkout(&session);
    let outcome = api.reconcile_paid_session(paid).await.map_err(|e| {
        if e.is_transient() {
            error!("💳️ Could not reconcile session [{}]. Stripe will retry. {e}", session.id);
        } else {
            warn!("💳️ Session [{}] cannot be reconciled. {e}", session.id);
        }
        ServerError::from(e)
    })?;
    let response = match outcome {
        ReconciliationOutcome::Created { order, items, unresolved } => {
            info!("💳️ Session [{}] became order #{} with {} items.", session.id, order.id, items.len());
            let message = if unresolved.is_empty() {
                "Order created.".to_string()
            } else {
                let names = unresolved.iter().map(|u| u.name.as_str()).collect::<Vec<_>>().join(", ");
                format!("Order created. {} lines were not matched to products: {names}", unresolved.len())
            };
            JsonResponse::success(message).with_order_id(order.id)
        },
        ReconciliationOutcome::AlreadyProcessed(order) => {
            info!("💳️ Session [{}] was already processed as order #{}.", session.id, order.id);
            JsonResponse::success("Session already processed.").with_order_id(order.id)
        },
    };
    Ok(HttpResponse::Ok().json(response))
}
