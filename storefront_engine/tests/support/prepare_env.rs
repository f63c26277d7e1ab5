use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use storefront_engine::{db_types::ProductId, FulfillmentDatabase, SqliteDatabase};

/// Creates a fresh database at a random location, runs the migrations and returns a connection to it.
pub async fn prepare_test_env() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let url = random_db_path();
    create_database(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    run_migrations(&db).await;
    db
}

pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("storefront_test_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

pub async fn create_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(url).await {
            warn!("🚀️ Error dropping database {url}: {e:?}");
        }
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    debug!("🚀️ Created Sqlite database {url}");
}

pub async fn run_migrations(db: &SqliteDatabase) {
    db.run_migrations().await.expect("Error running DB migrations");
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Could not remove test database {url}: {e}");
    }
}

pub async fn seed_product(db: &SqliteDatabase, id: &str, name: &str, price: i64, stock: i64) {
    sqlx::query("INSERT INTO products (id, name, price, stock) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(stock)
        .execute(db.pool())
        .await
        .expect("Error seeding product");
}

pub async fn stock_of(db: &SqliteDatabase, id: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = $1")
        .bind(ProductId::from(id))
        .fetch_one(db.pool())
        .await
        .expect("Error fetching stock")
}

pub async fn count_rows(db: &SqliteDatabase, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .expect("Error counting rows")
}
