use sqlx::SqliteConnection;

use crate::{
    db_types::{Product, ProductId},
    traits::{CatalogError, FulfillmentError},
};

pub async fn fetch_product_by_id(id: &ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, CatalogError> {
    let product =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn fetch_product_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Product>, CatalogError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE name = $1 ORDER BY created_at ASC, id ASC LIMIT 1",
    )
    .bind(name)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}

/// Subtracts `quantity` from the product's stock in a single statement and returns the new stock level, or `None`
/// if the product does not exist. The result may be negative.
pub async fn decrement_stock(
    id: &ProductId,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<i64>, FulfillmentError> {
    let stock = sqlx::query_scalar::<_, i64>("UPDATE products SET stock = stock - $1 WHERE id = $2 RETURNING stock")
        .bind(quantity)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(stock)
}
