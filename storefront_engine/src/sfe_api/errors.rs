use thiserror::Error;

use crate::{
    db_types::OrderStatusType,
    traits::{CatalogError, FulfillmentError, LineItemSourceError},
};

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    /// The session cannot become an order, whatever the state of the store. Retrying will not help.
    #[error("Invalid checkout session: {0}")]
    InvalidSession(String),
    #[error("{0}")]
    LineItemFetch(#[from] LineItemSourceError),
    /// The store rejected or could not complete a read or write. Nothing was committed, so a retry is safe.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl ReconciliationError {
    /// Whether a later redelivery of the same session may succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidSession(_))
    }
}

impl From<FulfillmentError> for ReconciliationError {
    fn from(e: FulfillmentError) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<CatalogError> for ReconciliationError {
    fn from(e: CatalogError) -> Self {
        Self::Persistence(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderStatusError {
    #[error("Order {0} does not exist")]
    NotFound(i64),
    #[error("Order {0} already has status {1}")]
    NoOp(i64, OrderStatusType),
    #[error("An order cannot move from {from} to {to}")]
    IllegalTransition { from: OrderStatusType, to: OrderStatusType },
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<FulfillmentError> for OrderStatusError {
    fn from(e: FulfillmentError) -> Self {
        match e {
            FulfillmentError::OrderNotFound(id) => Self::NotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}
