use std::time::Duration;

use log::*;
use storefront_common::Secret;

use crate::webhook::DEFAULT_SIGNATURE_TOLERANCE;

const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";

#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Base url of the Stripe REST API. Overridable so that tests and staging can point at a mock.
    pub api_url: String,
    pub secret_key: Secret<String>,
    /// The `whsec_...` signing secret for the webhook endpoint.
    pub webhook_secret: Secret<String>,
    pub signature_tolerance: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_STRIPE_API_URL.to_string(),
            secret_key: Secret::default(),
            webhook_secret: Secret::default(),
            signature_tolerance: DEFAULT_SIGNATURE_TOLERANCE,
        }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("SFS_STRIPE_API_URL").unwrap_or_else(|_| DEFAULT_STRIPE_API_URL.to_string());
        let secret_key = Secret::new(std::env::var("SFS_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("SFS_STRIPE_SECRET_KEY not set. Line items cannot be fetched from Stripe without it.");
            String::default()
        }));
        let webhook_secret = Secret::new(std::env::var("SFS_STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            error!(
                "🚨️ SFS_STRIPE_WEBHOOK_SECRET is not set. Every Stripe webhook delivery will be rejected until it is \
                 configured."
            );
            String::default()
        }));
        let signature_tolerance = std::env::var("SFS_STRIPE_SIGNATURE_TOLERANCE")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for SFS_STRIPE_SIGNATURE_TOLERANCE ({s}). {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SIGNATURE_TOLERANCE);
        Self { api_url, secret_key, webhook_secret, signature_tolerance }
    }
}
