use std::fmt::Display;

use serde::{Deserialize, Serialize};
use storefront_common::Cents;

use crate::db_types::{CustomerDetails, NewOrderItem, Order, OrderItem, ShippingAddress};

/// Customer and address fields as reported by one source. Every field is optional; blank values are treated as
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl ContactFields {
    /// Field by field, takes the value from `self` and falls back to `other` where `self` has none.
    pub fn or(&self, other: &ContactFields) -> ContactFields {
        fn pick(a: &Option<String>, b: &Option<String>) -> Option<String> {
            non_blank(a).or_else(|| non_blank(b))
        }
        ContactFields {
            email: pick(&self.email, &other.email),
            name: pick(&self.name, &other.name),
            phone: pick(&self.phone, &other.phone),
            street: pick(&self.street, &other.street),
            city: pick(&self.city, &other.city),
            state: pick(&self.state, &other.state),
            zip_code: pick(&self.zip_code, &other.zip_code),
            country: pick(&self.country, &other.country),
        }
    }
}

fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// A checkout session that the payment provider has confirmed as paid. This is the provider-agnostic input to
/// reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidSession {
    pub session_id: String,
    pub payment_id: Option<String>,
    /// The amount actually charged. This is the total of record for the order.
    pub amount_total: Option<Cents>,
    /// Fields captured by the storefront when the checkout session was created
    pub metadata: ContactFields,
    /// Fields the provider collected itself during checkout
    pub provider: ContactFields,
}

impl PaidSession {
    pub fn new<S: Into<String>>(session_id: S) -> Self {
        Self { session_id: session_id.into(), ..Default::default() }
    }

    /// Builds the customer snapshot for the order. Metadata wins over provider fields. The name falls back to the
    /// email address, and the country to `default_country`. A session with no email anywhere is rejected.
    pub fn customer_snapshot(&self, default_country: &str) -> Result<(CustomerDetails, ShippingAddress), String> {
        let fields = self.metadata.or(&self.provider);
        let email = fields.email.ok_or_else(|| format!("Session {} carries no customer email", self.session_id))?;
        let name = fields.name.unwrap_or_else(|| email.clone());
        let customer = CustomerDetails { email, name, phone: fields.phone };
        let address = ShippingAddress {
            street: fields.street,
            city: fields.city,
            state: fields.state,
            zip_code: fields.zip_code,
            country: fields.country.unwrap_or_else(|| default_country.to_string()),
        };
        Ok((customer, address))
    }
}

/// One charged line of a paid session, as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidLineItem {
    pub name: String,
    /// The catalog product id the storefront embedded in the line's metadata, if any
    pub product_ref: Option<String>,
    pub quantity: i64,
    /// The amount charged for the whole line
    pub amount_total: Cents,
}

impl PaidLineItem {
    pub fn new<S: Into<String>>(name: S, quantity: i64, amount_total: Cents) -> Self {
        Self { name: name.into(), product_ref: None, quantity, amount_total }
    }

    pub fn with_product_ref<S: Into<String>>(mut self, product_ref: S) -> Self {
        self.product_ref = Some(product_ref.into());
        self
    }
}

/// Store policy constants that feed the totals calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentPolicy {
    /// Tax rate in basis points, applied to subtotal plus shipping
    pub tax_rate_bps: i64,
    /// The flat shipping rate charged at checkout below the free shipping threshold
    pub standard_shipping: Cents,
    pub free_shipping_threshold: Cents,
    /// Line items with exactly this name carry the shipping charge
    pub shipping_line_name: String,
    pub default_country: String,
}

impl Default for FulfillmentPolicy {
    fn default() -> Self {
        Self {
            tax_rate_bps: 800,
            standard_shipping: Cents::from(599),
            free_shipping_threshold: Cents::from(5000),
            shipping_line_name: "Shipping".to_string(),
            default_country: "US".to_string(),
        }
    }
}

impl FulfillmentPolicy {
    pub fn is_shipping_line(&self, line: &PaidLineItem) -> bool {
        line.name.trim() == self.shipping_line_name
    }

    /// The shipping rate checkout should charge for a cart with the given subtotal.
    pub fn shipping_for_subtotal(&self, subtotal: Cents) -> Cents {
        if subtotal >= self.free_shipping_threshold {
            Cents::default()
        } else {
            self.standard_shipping
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    /// Neither the embedded product id nor the line name matched a catalog product
    ProductNotFound,
    InvalidQuantity(i64),
}

impl Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::ProductNotFound => write!(f, "no matching catalog product"),
            UnresolvedReason::InvalidQuantity(q) => write!(f, "invalid quantity {q}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedLine {
    pub name: String,
    pub product_ref: Option<String>,
    pub reason: UnresolvedReason,
}

/// The result of matching one charged line against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Resolved(NewOrderItem),
    Unresolved(UnresolvedLine),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// A new order was written. `unresolved` lists the paid lines that did not become order items.
    Created { order: Order, items: Vec<OrderItem>, unresolved: Vec<UnresolvedLine> },
    /// The session had already been turned into an order. No side effects were repeated.
    AlreadyProcessed(Order),
}

impl ReconciliationOutcome {
    pub fn order(&self) -> &Order {
        match self {
            ReconciliationOutcome::Created { order, .. } => order,
            ReconciliationOutcome::AlreadyProcessed(order) => order,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, ReconciliationOutcome::Created { .. })
    }
}
