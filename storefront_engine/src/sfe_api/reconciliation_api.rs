use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, NewOrderItem, Product, ProductId},
    events::{EventProducers, OrderCreatedEvent},
    sfe_api::{
        errors::ReconciliationError,
        reconciliation_objects::{
            FulfillmentPolicy,
            LineOutcome,
            PaidLineItem,
            PaidSession,
            ReconciliationOutcome,
            UnresolvedLine,
            UnresolvedReason,
        },
        totals::{partition_line_items, OrderTotals},
    },
    traits::{FulfillmentDatabase, InsertOrderResult, LineItemSource},
};

/// `ReconciliationApi` turns a paid checkout session into an authoritative order.
///
/// Everything that ends up in the order comes from the provider: the session itself and its line items, which are
/// fetched again from the provider rather than taken from the webhook body. The session id is the idempotency key.
/// Redelivering a session that already has an order returns that order and repeats no side effects.
pub struct ReconciliationApi<B, L> {
    db: B,
    line_items: L,
    policy: FulfillmentPolicy,
    producers: EventProducers,
}

impl<B, L> Debug for ReconciliationApi<B, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi ({:?})", self.policy)
    }
}

impl<B, L> ReconciliationApi<B, L> {
    pub fn new(db: B, line_items: L, policy: FulfillmentPolicy) -> Self {
        Self { db, line_items, policy, producers: EventProducers::default() }
    }

    pub fn with_producers(mut self, producers: EventProducers) -> Self {
        self.producers = producers;
        self
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn policy(&self) -> &FulfillmentPolicy {
        &self.policy
    }
}

impl<B, L> ReconciliationApi<B, L>
where
    B: FulfillmentDatabase,
    L: LineItemSource,
{
    /// Reconcile one paid session.
    ///
    /// 1. If an order for the session already exists, return it.
    /// 2. Build the customer snapshot. A session without any email is rejected as invalid.
    /// 3. Fetch the charged line items from the provider.
    /// 4. Split off the shipping line and derive the totals.
    /// 5. Match each product line to the catalog, by embedded product id first and by name second. Lines that do
    ///    not match are reported in the outcome and skipped.
    /// 6. Write the order, its items and the stock decrements in one transaction. If a concurrent delivery won the
    ///    race for this session, the transaction is discarded and the winning order is returned.
    ///
    /// Subscribers to the order-created hook are notified only when a new order is written.
    pub async fn reconcile_paid_session(
        &self,
        session: PaidSession,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let session_id = session.session_id.clone();
        if let Some(order) = self.db.fetch_order_by_session_id(&session_id).await? {
            info!("🧾️ Session [{session_id}] was already reconciled as order #{}. Nothing to do.", order.id);
            return Ok(ReconciliationOutcome::AlreadyProcessed(order));
        }
        let (customer, address) =
            session.customer_snapshot(&self.policy.default_country).map_err(ReconciliationError::InvalidSession)?;

        let lines = self.line_items.fetch_line_items(&session_id).await?;
        debug!("🧾️ Session [{session_id}] has {} charged lines", lines.len());
        let parts = partition_line_items(lines, &self.policy);
        let totals = OrderTotals::derive(&parts, session.amount_total, &self.policy);
        if !totals.is_consistent() {
            warn!(
                "🧾️ Session [{session_id}]: subtotal {} + shipping {} + tax {} = {} does not match the charged total \
                 of {}. The charged total will be recorded.",
                totals.subtotal,
                totals.shipping,
                totals.tax,
                totals.computed_total(),
                totals.total
            );
        }

        let mut resolved = Vec::with_capacity(parts.products.len());
        let mut unresolved = Vec::new();
        for line in parts.products {
            match self.resolve_line(line).await? {
                LineOutcome::Resolved(item) => resolved.push(item),
                LineOutcome::Unresolved(line) => {
                    warn!(
                        "🧾️ Session [{session_id}]: paid line '{}' (product ref {:?}) is skipped: {}",
                        line.name, line.product_ref, line.reason
                    );
                    unresolved.push(line)
                },
            }
        }

        let new_order = NewOrder {
            session_id: session_id.clone(),
            payment_id: session.payment_id,
            customer,
            address,
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            tax: totals.tax,
            total: totals.total,
        };
        trace!("🧾️ Inserting {new_order}");
        match self.db.insert_order_with_items(new_order, &resolved).await? {
            InsertOrderResult::Inserted { order, items } => {
                info!(
                    "🧾️ Order #{} created for session [{session_id}] with {} items ({} lines skipped)",
                    order.id,
                    items.len(),
                    unresolved.len()
                );
                let event = OrderCreatedEvent::new(order.clone(), items.clone());
                self.producers.publish_order_created(event).await;
                Ok(ReconciliationOutcome::Created { order, items, unresolved })
            },
            InsertOrderResult::AlreadyExists(id) => {
                info!("🧾️ Session [{session_id}] was reconciled concurrently as order #{id}. Discarding this attempt.");
                let order = self.db.fetch_order_by_id(id).await?.ok_or_else(|| {
                    error!("🧾️ Order #{id} was reported for session [{session_id}] but cannot be fetched");
                    ReconciliationError::Persistence(format!("Order {id} for session {session_id} vanished"))
                })?;
                Ok(ReconciliationOutcome::AlreadyProcessed(order))
            },
        }
    }

    /// Matches one product line to the catalog and works out the per-unit price.
    pub async fn resolve_line(&self, line: PaidLineItem) -> Result<LineOutcome, ReconciliationError> {
        let unresolved = |line: PaidLineItem, reason: UnresolvedReason| {
            LineOutcome::Unresolved(UnresolvedLine { name: line.name, product_ref: line.product_ref, reason })
        };
        let Some(price) = line.amount_total.div_round(line.quantity) else {
            let q = line.quantity;
            return Ok(unresolved(line, UnresolvedReason::InvalidQuantity(q)));
        };
        match self.find_product(&line).await? {
            Some(product) => {
                trace!("🧾️ Line '{}' matched product {} ({})", line.name, product.id, product.name);
                Ok(LineOutcome::Resolved(NewOrderItem::new(product.id, line.quantity, price)))
            },
            None => Ok(unresolved(line, UnresolvedReason::ProductNotFound)),
        }
    }

    async fn find_product(&self, line: &PaidLineItem) -> Result<Option<Product>, ReconciliationError> {
        if let Some(id) = line.product_ref.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(product) = self.db.fetch_product_by_id(&ProductId::from(id)).await? {
                return Ok(Some(product));
            }
            debug!("🧾️ Product id {id} from line '{}' is not in the catalog. Trying the name.", line.name);
        }
        Ok(self.db.fetch_product_by_name(&line.name).await?)
    }
}
