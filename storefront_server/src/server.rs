use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use futures::future::BoxFuture;
use log::*;
use storefront_engine::{
    events::{EventHandlers, EventHooks, OrderCreatedEvent},
    ReconciliationApi,
    SqliteDatabase,
};
use stripe_tools::{StripeApi, WebhookVerifier};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::stripe::StripeLineItems,
    routes::health,
    stripe_routes::StripeWebhookRoute,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let verifier = WebhookVerifier::from_config(&config.stripe);
    if !verifier.is_configured() {
        error!("🚨️ No Stripe webhook signing secret is configured. All webhook deliveries will fail with a 500 until it is set.");
    }
    let stripe_api = StripeApi::new(config.stripe.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = create_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let api = ReconciliationApi::new(db, StripeLineItems::new(stripe_api), config.policy.clone()).with_producers(producers);
    let srv = create_server_instance(&config, api, verifier)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: &ServerConfig,
    api: ReconciliationApi<SqliteDatabase, StripeLineItems>,
    verifier: WebhookVerifier,
) -> Result<Server, ServerError> {
    let api = web::Data::new(api);
    let verifier = web::Data::new(verifier);
    let srv = HttpServer::new(move || {
        let stripe_scope =
            web::scope("/stripe").service(StripeWebhookRoute::<SqliteDatabase, StripeLineItems>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sfs::access_log"))
            .app_data(api.clone())
            .app_data(verifier.clone())
            .service(health)
            .service(stripe_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

pub fn create_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_order_created(|ev: OrderCreatedEvent| -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let units = ev.items.iter().map(|i| i.quantity).sum::<i64>();
            info!(
                "🔔️ New order #{} for {} ({}): {units} units, total {}",
                ev.order.id, ev.order.name, ev.order.email, ev.order.total
            );
        })
    });
    EventHandlers::new(128, hooks)
}
