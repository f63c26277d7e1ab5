use thiserror::Error;

use crate::db_types::{Product, ProductId};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog query failed: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Read access to the product catalog. Products are created and edited elsewhere.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;

    /// Exact, case-sensitive name match. If several products share a name, the oldest wins.
    async fn fetch_product_by_name(&self, name: &str) -> Result<Option<Product>, CatalogError>;
}
