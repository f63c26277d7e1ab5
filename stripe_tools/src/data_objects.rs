//! Typed views of the Stripe objects the storefront consumes. Only the fields that are used are modelled; everything
//! else in the payload is ignored during deserialization.
use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::WebhookError;

//--------------------------------------     WebhookEvent      --------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub livemode: bool,
    pub data: EventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub object: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CheckoutSessionCompleted,
    CheckoutSessionAsyncPaymentSucceeded,
    Other(String),
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "checkout.session.async_payment_succeeded" => Self::CheckoutSessionAsyncPaymentSucceeded,
            s => Self::Other(s.to_string()),
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::CheckoutSessionCompleted => write!(f, "checkout.session.completed"),
            EventKind::CheckoutSessionAsyncPaymentSucceeded => write!(f, "checkout.session.async_payment_succeeded"),
            EventKind::Other(s) => write!(f, "{s}"),
        }
    }
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        EventKind::from(self.event_type.as_str())
    }

    /// Interprets the event's data object as a checkout session.
    pub fn checkout_session(&self) -> Result<CheckoutSession, WebhookError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| WebhookError::MalformedEvent(format!("Event {} does not carry a checkout session. {e}", self.id)))
    }
}

//--------------------------------------    CheckoutSession    --------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub customer_email: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    pub shipping_details: Option<ShippingDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub amount_subtotal: Option<i64>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Paid,
    Unpaid,
    NoPaymentRequired,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl CheckoutSession {
    /// The session's metadata value for `key`, ignoring blank entries.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    /// The address Stripe collected for shipping, or the billing address if no shipping address was collected.
    pub fn provider_address(&self) -> Option<&Address> {
        self.shipping_details
            .as_ref()
            .and_then(|d| d.address.as_ref())
            .or_else(|| self.customer_details.as_ref().and_then(|d| d.address.as_ref()))
    }

    pub fn provider_email(&self) -> Option<&str> {
        self.customer_details.as_ref().and_then(|d| d.email.as_deref()).or(self.customer_email.as_deref())
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.shipping_details
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .or_else(|| self.customer_details.as_ref().and_then(|d| d.name.as_deref()))
    }

    pub fn provider_phone(&self) -> Option<&str> {
        self.customer_details.as_ref().and_then(|d| d.phone.as_deref())
    }
}

//--------------------------------------       LineItem        --------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemList {
    pub data: Vec<LineItem>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub quantity: Option<i64>,
    /// The amount actually charged for this line, in minor units, after discounts.
    pub amount_total: i64,
    pub currency: Option<String>,
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Price {
    pub id: Option<String>,
    pub unit_amount: Option<i64>,
    pub product: Option<ExpandableProduct>,
}

/// Stripe only returns the full product object when `data.price.product` is expanded; otherwise the field is the bare
/// product id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpandableProduct {
    Id(String),
    Object(ProductData),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl LineItem {
    fn product(&self) -> Option<&ProductData> {
        match self.price.as_ref().and_then(|p| p.product.as_ref()) {
            Some(ExpandableProduct::Object(p)) => Some(p),
            _ => None,
        }
    }

    /// The display name of the line. This is the product name given at checkout, falling back to the line
    /// description.
    pub fn name(&self) -> &str {
        match self.product() {
            Some(p) if !p.name.is_empty() => p.name.as_str(),
            _ => self.description.as_str(),
        }
    }

    /// A value from the product metadata that was attached to this line when the checkout session was created.
    pub fn product_metadata(&self, key: &str) -> Option<&str> {
        self.product().and_then(|p| p.metadata.get(key)).map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}
