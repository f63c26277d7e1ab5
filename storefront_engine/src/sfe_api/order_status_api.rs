use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderItem, OrderStatusType},
    events::{EventProducers, OrderStatusChangedEvent},
    sfe_api::errors::OrderStatusError,
    traits::FulfillmentDatabase,
};

/// Admin-facing access to existing orders. Orders only move forward through their lifecycle:
/// `pending → processing → shipped → delivered`, with `cancelled` reachable from `pending` or `processing`.
pub struct OrderStatusApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderStatusApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderStatusApi")
    }
}

impl<B> OrderStatusApi<B> {
    pub fn new(db: B) -> Self {
        Self { db, producers: EventProducers::default() }
    }

    pub fn with_producers(mut self, producers: EventProducers) -> Self {
        self.producers = producers;
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderStatusApi<B>
where B: FulfillmentDatabase
{
    pub async fn order_with_items(&self, order_id: i64) -> Result<(Order, Vec<OrderItem>), OrderStatusError> {
        let order = self.db.fetch_order_by_id(order_id).await?.ok_or(OrderStatusError::NotFound(order_id))?;
        let items = self.db.fetch_order_items(order_id).await?;
        Ok((order, items))
    }

    pub async fn advance_status(&self, order_id: i64, new_status: OrderStatusType) -> Result<Order, OrderStatusError> {
        let order = self.db.fetch_order_by_id(order_id).await?.ok_or(OrderStatusError::NotFound(order_id))?;
        let old_status = order.status;
        if old_status == new_status {
            return Err(OrderStatusError::NoOp(order_id, new_status));
        }
        if !old_status.can_transition_to(new_status) {
            warn!("📦️ Rejected status change for order #{order_id}: {old_status} → {new_status}");
            return Err(OrderStatusError::IllegalTransition { from: old_status, to: new_status });
        }
        let updated = self.db.update_order_status(order_id, new_status).await?;
        info!("📦️ Order #{order_id} moved from {old_status} to {new_status}");
        self.producers.publish_status_changed(OrderStatusChangedEvent::new(updated.clone(), old_status)).await;
        Ok(updated)
    }
}
