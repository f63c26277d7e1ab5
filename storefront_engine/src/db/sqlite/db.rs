use std::fmt::Debug;

use log::*;
use sqlx::{migrate, migrate::MigrateError, SqlitePool};

use super::{db_url, new_pool, orders, products};
use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatusType, Product, ProductId},
    traits::{CatalogError, CatalogManagement, FulfillmentDatabase, FulfillmentError, InsertOrderResult},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    /// Connects to the database named by `SFS_DATABASE_URL`, or the default location.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date using the migrations embedded in this crate.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product_by_id(id, &mut conn).await
    }

    async fn fetch_product_by_name(&self, name: &str) -> Result<Option<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product_by_name(name, &mut conn).await
    }
}

impl FulfillmentDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_order_by_session_id(&self, session_id: &str) -> Result<Option<Order>, FulfillmentError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_session_id(session_id, &mut conn).await
    }

    async fn fetch_order_by_id(&self, order_id: i64) -> Result<Option<Order>, FulfillmentError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_id(order_id, &mut conn).await
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, FulfillmentError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_items(order_id, &mut conn).await
    }

    async fn insert_order_with_items(
        &self,
        order: NewOrder,
        items: &[NewOrderItem],
    ) -> Result<InsertOrderResult, FulfillmentError> {
        let session_id = order.session_id.clone();
        let mut tx = self.pool.begin().await?;
        // The order row goes first so that this transaction takes the write lock before it reads anything.
        let order = match orders::insert_order(order, &mut tx).await? {
            Some(order) => order,
            None => {
                tx.rollback().await?;
                let mut conn = self.pool.acquire().await?;
                let existing = orders::fetch_order_by_session_id(&session_id, &mut conn).await?.ok_or_else(|| {
                    FulfillmentError::DatabaseError(format!("Session {session_id} is taken, but has no order"))
                })?;
                debug!("🗃️ Session [{session_id}] already belongs to order #{}", existing.id);
                return Ok(InsertOrderResult::AlreadyExists(existing.id));
            },
        };
        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            saved.push(orders::insert_order_item(order.id, item, &mut tx).await?);
            let stock = products::decrement_stock(&item.product_id, item.quantity, &mut tx)
                .await?
                .ok_or_else(|| FulfillmentError::ProductNotFound(item.product_id.to_string()))?;
            if stock < 0 {
                warn!(
                    "🗃️ Product {} is oversold. Stock is now {stock} after order #{} took {}",
                    item.product_id, order.id, item.quantity
                );
            } else {
                trace!("🗃️ Product {} stock is now {stock}", item.product_id);
            }
        }
        tx.commit().await?;
        debug!("🗃️ Order #{} and {} items saved for session [{session_id}]", order.id, saved.len());
        Ok(InsertOrderResult::Inserted { order, items: saved })
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, FulfillmentError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::update_order_status(order_id, status, &mut tx).await?.ok_or(FulfillmentError::OrderNotFound(order_id))?;
        tx.commit().await?;
        trace!("🗃️ Order #{order_id} status is now {status}");
        Ok(order)
    }

    async fn close(&mut self) -> Result<(), FulfillmentError> {
        self.pool.close().await;
        Ok(())
    }
}
