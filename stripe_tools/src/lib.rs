//! # Stripe tools
//!
//! The small subset of the Stripe protocol that the storefront relies on:
//! * [`WebhookVerifier`] authenticates inbound webhook deliveries against the shared signing secret.
//! * [`data_objects`] are the typed shapes of the webhook envelope, checkout sessions and line items.
//! * [`StripeApi`] is a thin REST client used to fetch the authoritative line items for a paid session.
mod api;
mod config;
mod error;
mod webhook;

pub mod data_objects;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{CheckoutSession, EventKind, LineItem, LineItemList, WebhookEvent};
pub use error::{StripeApiError, WebhookError};
pub use webhook::{compute_signature, WebhookVerifier, DEFAULT_SIGNATURE_TOLERANCE, SIGNATURE_HEADER};
