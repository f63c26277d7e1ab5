//! Glue between the Stripe protocol types and the provider-agnostic engine inputs.
use log::*;
use storefront_common::Cents;
use storefront_engine::{
    reconciliation_objects::{ContactFields, PaidLineItem, PaidSession},
    traits::{LineItemSource, LineItemSourceError},
};
use stripe_tools::{CheckoutSession, LineItem, StripeApi};

/// The product metadata key under which checkout stores the catalog product id of each line
pub const PRODUCT_ID_METADATA_KEY: &str = "productId";

pub fn paid_session_from_checkout(session: &CheckoutSession) -> PaidSession {
    let meta = |key: &str| session.metadata_value(key).map(String::from);
    let metadata = ContactFields {
        email: meta("customerEmail"),
        name: meta("customerName"),
        phone: meta("customerPhone"),
        street: meta("address"),
        city: meta("city"),
        state: meta("state"),
        zip_code: meta("zipCode"),
        country: meta("country"),
    };
    let address = session.provider_address();
    let street = address.and_then(|a| {
        let parts = [a.line1.as_deref(), a.line2.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        (!parts.is_empty()).then(|| parts.join(", "))
    });
    let provider = ContactFields {
        email: session.provider_email().map(String::from),
        name: session.provider_name().map(String::from),
        phone: session.provider_phone().map(String::from),
        street,
        city: address.and_then(|a| a.city.clone()),
        state: address.and_then(|a| a.state.clone()),
        zip_code: address.and_then(|a| a.postal_code.clone()),
        country: address.and_then(|a| a.country.clone()),
    };
    PaidSession {
        session_id: session.id.clone(),
        payment_id: session.payment_intent.clone(),
        amount_total: session.amount_total.map(Cents::from),
        metadata,
        provider,
    }
}

pub fn paid_line_item(item: &LineItem) -> PaidLineItem {
    PaidLineItem {
        name: item.name().to_string(),
        product_ref: item.product_metadata(PRODUCT_ID_METADATA_KEY).map(String::from),
        // Stripe omits the quantity for some one-off prices
        quantity: item.quantity.unwrap_or(1),
        amount_total: Cents::from(item.amount_total),
    }
}

/// Serves line items straight from the Stripe API.
#[derive(Clone)]
pub struct StripeLineItems(StripeApi);

impl StripeLineItems {
    pub fn new(api: StripeApi) -> Self {
        Self(api)
    }
}

impl LineItemSource for StripeLineItems {
    async fn fetch_line_items(&self, session_id: &str) -> Result<Vec<PaidLineItem>, LineItemSourceError> {
        let items = self.0.fetch_line_items(session_id).await.map_err(|e| {
            warn!("💳️ Could not fetch line items for session [{session_id}]. {e}");
            LineItemSourceError::new(session_id, e.to_string())
        })?;
        debug!("💳️ Fetched {} line items for session [{session_id}]", items.len());
        Ok(items.iter().map(paid_line_item).collect())
    }
}
