//! Storefront Engine
//!
//! The Storefront Engine turns verified payment-provider events into authoritative order records. It is
//! provider-agnostic: the payment provider is only ever seen through the [`traits::LineItemSource`] trait and the
//! [`sfe_api::reconciliation_objects::PaidSession`] input type.
//!
//! The library is divided into two main sections:
//! 1. Database management and control. SQLite is the supported backend. Backends implement the traits in
//!    [`traits`]; you should never need to access the database directly. The exception is the data types used in the
//!    database, which are defined in [`db_types`] and are public.
//! 2. The engine public API ([`mod@sfe_api`]).
//!    * [`ReconciliationApi`] creates exactly one order per paid checkout session and applies the inventory
//!      decrements for it.
//!    * [`OrderStatusApi`] enforces the order lifecycle for subsequent administrative status changes.
//!
//! The engine also emits events. When an order is created, an `OrderCreatedEvent` is published to any registered
//! hooks (see [`events`]).
mod db;

pub mod db_types;
pub mod events;
pub mod sfe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use sfe_api::{
    errors::{OrderStatusError, ReconciliationError},
    order_status_api::OrderStatusApi,
    reconciliation_api::ReconciliationApi,
    reconciliation_objects,
};
pub use traits::{CatalogManagement, FulfillmentDatabase, InsertOrderResult, LineItemSource};
