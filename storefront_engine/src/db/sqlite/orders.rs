use log::*;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatusType},
    traits::FulfillmentError,
};

/// Inserts a new order with status `processing`. Returns `None`, and writes nothing, if an order for the same
/// session already exists.
///
/// This is not atomic on its own. Run it inside a transaction and pass `&mut tx` as the connection.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Option<Order>, FulfillmentError> {
    let result = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (
                session_id,
                payment_id,
                email,
                name,
                phone,
                address,
                city,
                state,
                zip_code,
                country,
                subtotal,
                shipping,
                tax,
                total,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *;
        "#,
    )
    .bind(&order.session_id)
    .bind(&order.payment_id)
    .bind(&order.customer.email)
    .bind(&order.customer.name)
    .bind(&order.customer.phone)
    .bind(&order.address.street)
    .bind(&order.address.city)
    .bind(&order.address.state)
    .bind(&order.address.zip_code)
    .bind(&order.address.country)
    .bind(order.subtotal)
    .bind(order.shipping)
    .bind(order.tax)
    .bind(order.total)
    .bind(OrderStatusType::Processing)
    .fetch_one(conn)
    .await;
    match result {
        Ok(order) => Ok(Some(order)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            trace!("🗃️ Order for session [{}] already exists: {e}", order.session_id);
            Ok(None)
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn insert_order_item(
    order_id: i64,
    item: &NewOrderItem,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, FulfillmentError> {
    let item = sqlx::query_as::<_, OrderItem>(
        r#"
            INSERT INTO order_items (order_id, product_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.price)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn fetch_order_by_session_id(
    session_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, FulfillmentError> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE session_id = $1")
        .bind(session_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_by_id(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, FulfillmentError> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, FulfillmentError> {
    let items = sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Sets the status of an order and returns the updated row, or `None` if the order does not exist.
///
/// The statement is always stepped to completion. Stopping at the first `RETURNING` row resets it before SQLite has
/// applied the change.
pub async fn update_order_status(
    order_id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, FulfillmentError> {
    let mut rows = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.pop())
}
