//! # Backend contracts
//!
//! The reconciliation engine never talks to a database or a payment provider directly. It works against the
//! traits in this module:
//!
//! * [`FulfillmentDatabase`] stores orders and their items, and performs the atomic order-plus-stock write.
//! * [`CatalogManagement`] is a read-only view onto the product catalog.
//! * [`LineItemSource`] fetches the purchased line items for a checkout session from the payment provider.
mod catalog_management;
mod fulfillment_database;
mod line_item_source;

pub use catalog_management::{CatalogError, CatalogManagement};
pub use fulfillment_database::{FulfillmentDatabase, FulfillmentError, InsertOrderResult};
pub use line_item_source::{LineItemSource, LineItemSourceError};
