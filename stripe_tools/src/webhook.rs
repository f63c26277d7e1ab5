//! Stripe webhook signature verification.
//!
//! Stripe signs every webhook delivery with the endpoint's signing secret and sends the result in the
//! `Stripe-Signature` header:
//!
//! ```text
//! Stripe-Signature: t=1723482113,v1=5257a869e7ecebeda32affa62cdca3fa51cad7e77a0e56ff536d0ce8e108d8bd
//! ```
//!
//! The signature is the hex-encoded HMAC-SHA256 of `"{t}.{raw body}"`. Verification MUST be performed over the exact
//! bytes received, so the body is only deserialized once the signature has been accepted. Several `v1` entries may be
//! present while a secret is being rolled; any one matching is sufficient.
use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use log::*;
use sha2::Sha256;
use storefront_common::Secret;

use crate::{StripeConfig, WebhookError, WebhookEvent};

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";
pub const DEFAULT_SIGNATURE_TOLERANCE: Duration = Duration::from_secs(300);

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone, Debug)]
pub struct WebhookVerifier {
    secret: Secret<String>,
    tolerance: Duration,
}

impl WebhookVerifier {
    pub fn new(secret: Secret<String>, tolerance: Duration) -> Self {
        Self { secret, tolerance }
    }

    pub fn from_config(config: &StripeConfig) -> Self {
        Self::new(config.webhook_secret.clone(), config.signature_tolerance)
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.reveal().trim().is_empty()
    }

    /// Verifies `payload` against the `Stripe-Signature` header value and returns the parsed event.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<WebhookEvent, WebhookError> {
        self.verify_at(payload, signature, Utc::now().timestamp())
    }

    /// As [`Self::verify`], but with an explicit notion of "now" (unix seconds) for the timestamp tolerance check.
    pub fn verify_at(&self, payload: &[u8], signature: Option<&str>, now: i64) -> Result<WebhookEvent, WebhookError> {
        let signature = signature.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
            warn!("🔐️ No webhook signature found in request. Denying access.");
            WebhookError::MissingSignature
        })?;
        if !self.is_configured() {
            error!("🔐️🚨️ A webhook was received, but no signing secret is configured. Set SFS_STRIPE_WEBHOOK_SECRET.");
            return Err(WebhookError::ConfigurationError);
        }
        let header = SignatureHeader::parse(signature)?;
        let tolerance = self.tolerance.as_secs();
        if now.abs_diff(header.timestamp) > tolerance {
            warn!("🔐️ Webhook timestamp {} is outside the tolerance of {tolerance}s (now: {now}).", header.timestamp);
            return Err(WebhookError::InvalidSignature("Timestamp outside the tolerance zone".into()));
        }
        let mac = signed_payload_mac(self.secret.reveal(), header.timestamp, payload)?;
        let validated = header
            .signatures
            .iter()
            .filter_map(|s| hex::decode(s).ok())
            .any(|sig| mac.clone().verify_slice(&sig).is_ok());
        if !validated {
            warn!("🔐️ Invalid webhook signature found in request. Denying access.");
            return Err(WebhookError::InvalidSignature("No signatures found matching the expected signature".into()));
        }
        trace!("🔐️ Webhook signature check ✅️");
        serde_json::from_slice::<WebhookEvent>(payload).map_err(|e| {
            warn!("🔐️ Webhook was signed correctly but could not be parsed. {e}");
            WebhookError::MalformedEvent(e.to_string())
        })
    }
}

/// Computes the `v1` signature for a payload. Used to sign test deliveries.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
    let mac = signed_payload_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
        error!("🔐️ Could not initialise HMAC with the webhook secret. {e}");
        WebhookError::ConfigurationError
    })?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

impl SignatureHeader {
    fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();
        for (key, value) in header.split(',').filter_map(|part| part.trim().split_once('=')) {
            match key {
                "t" => timestamp = value.parse::<i64>().ok(),
                "v1" => signatures.push(value.to_string()),
                _ => {},
            }
        }
        let timestamp = timestamp.ok_or_else(|| {
            debug!("🔐️ No timestamp in signature header");
            WebhookError::InvalidSignature("Unable to extract timestamp from header".into())
        })?;
        if signatures.is_empty() {
            debug!("🔐️ No v1 signatures in signature header");
            return Err(WebhookError::InvalidSignature("No v1 signatures found in header".into()));
        }
        Ok(Self { timestamp, signatures })
    }
}
