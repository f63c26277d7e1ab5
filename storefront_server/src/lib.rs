//! # Storefront server
//! The HTTP front end of the order fulfillment core. It is responsible for:
//! * Receiving payment webhook deliveries from Stripe and authenticating them against the shared signing secret.
//! * Dispatching `checkout.session.completed` events to the reconciliation engine, which turns them into orders.
//! * Mapping the outcome onto a status code that tells Stripe whether to retry the delivery.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/stripe/webhook`: The webhook route for Stripe events.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod stripe_routes;

#[cfg(test)]
mod endpoint_tests;
