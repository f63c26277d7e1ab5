use thiserror::Error;

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatusType},
    traits::CatalogManagement,
};

#[derive(Debug, Clone, Error)]
pub enum FulfillmentError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Product {0} does not exist")]
    ProductNotFound(String),
}

impl From<sqlx::Error> for FulfillmentError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOrderResult {
    /// The order, its items and the stock decrements were committed together.
    Inserted { order: Order, items: Vec<OrderItem> },
    /// An order for the same session already exists. Nothing was written. Carries the existing order id.
    AlreadyExists(i64),
}

/// The storage contract for order fulfillment.
///
/// The only write path for new orders is [`FulfillmentDatabase::insert_order_with_items`], which must be atomic:
/// either the order, all of its items and every stock decrement are persisted, or none of them are.
#[allow(async_fn_in_trait)]
pub trait FulfillmentDatabase: Clone + CatalogManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    async fn fetch_order_by_session_id(&self, session_id: &str) -> Result<Option<Order>, FulfillmentError>;

    async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, FulfillmentError>;

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, FulfillmentError>;

    /// In a single transaction:
    /// * inserts the order with status `processing`,
    /// * inserts one order item per entry in `items`,
    /// * decrements each referenced product's stock by the item quantity.
    ///
    /// Stock is allowed to go negative. If the session id is already taken, the transaction is rolled back and
    /// [`InsertOrderResult::AlreadyExists`] is returned.
    async fn insert_order_with_items(
        &self,
        order: NewOrder,
        items: &[NewOrderItem],
    ) -> Result<InsertOrderResult, FulfillmentError>;

    /// Sets the order status unconditionally. Transition rules are enforced by the caller.
    async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, FulfillmentError>;

    async fn close(&mut self) -> Result<(), FulfillmentError> {
        Ok(())
    }
}
