//! # Storefront engine public API
//!
//! * [`reconciliation_api`] turns a verified, paid checkout session into exactly one order, its items and the
//!   matching stock decrements.
//! * [`order_status_api`] enforces the admin-driven order lifecycle once an order exists.
//!
//! Both APIs are created by handing them a backend that implements the relevant traits from [`crate::traits`]:
//!
//! ```rust,ignore
//! use storefront_engine::{ReconciliationApi, SqliteDatabase, reconciliation_objects::FulfillmentPolicy};
//! let db = SqliteDatabase::new_with_url("sqlite://data/storefront.db", 5).await?;
//! let api = ReconciliationApi::new(db, line_item_source, FulfillmentPolicy::default());
//! let outcome = api.reconcile_paid_session(session).await?;
//! ```
pub mod errors;
pub mod order_status_api;
pub mod reconciliation_api;
pub mod reconciliation_objects;
pub mod totals;
