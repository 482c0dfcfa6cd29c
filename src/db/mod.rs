//! Database module for SQLite persistence.
//!
//! SQLite is the catalog store and the single source of truth; everything a
//! client renders is a cache of what lives here.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gifts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            store TEXT NOT NULL,
            store_link TEXT,
            item TEXT NOT NULL,
            description TEXT,
            quantity INTEGER NOT NULL DEFAULT 1,
            price REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'available',
            purchased_at TEXT,
            purchaser_name TEXT NOT NULL DEFAULT '',
            image_url TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_gifts_status ON gifts(status)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert the starter catalog on first run against an empty database.
/// Returns the number of rows inserted (zero when the table already has data).
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM gifts")
        .fetch_one(pool)
        .await?;
    let count: i64 = row.get("count");
    if count > 0 {
        return Ok(0);
    }

    // (store, store_link, item, description, price, status, purchased_at, purchaser_name, image_text)
    let seeds: [(&str, &str, &str, &str, f64, &str, Option<&str>, &str, &str); 6] = [
        (
            "Amazon",
            "https://amazon.com",
            "Juego de copas de cristal",
            "Para brindar en nuestra boda",
            45.99,
            "available",
            None,
            "",
            "Copas+de+Cristal",
        ),
        (
            "Tienda local",
            "",
            "Set de sábanas premium",
            "Tamaño king, algodón egipcio",
            89.50,
            "purchased",
            Some("2024-01-15T10:30:00Z"),
            "Ana",
            "Set+de+Sábanas",
        ),
        (
            "Walmart",
            "https://walmart.com",
            "Cafetera Nespresso",
            "Con lechera integrada",
            199.99,
            "available",
            None,
            "",
            "Cafetera+Nespresso",
        ),
        (
            "Linio",
            "https://linio.com",
            "Vajilla para 6 personas",
            "Porcelana blanca con detalles dorados",
            125.75,
            "available",
            None,
            "",
            "Vajilla",
        ),
        (
            "Tienda departamental",
            "",
            "Plancha a vapor",
            "Con función vertical",
            65.25,
            "available",
            None,
            "",
            "Plancha+a+Vapor",
        ),
        (
            "Etsy",
            "https://etsy.com",
            "Cuadro personalizado",
            "Retrato de la pareja en acuarela",
            78.50,
            "purchased",
            Some("2024-01-12T14:22:00Z"),
            "Carlos",
            "Cuadro+Personalizado",
        ),
    ];

    let mut inserted = 0;
    for (store, store_link, item, description, price, status, purchased_at, purchaser_name, image) in
        seeds
    {
        let image_url = format!("https://placehold.co/300x200/E6C073/556B2F?text={}", image);
        sqlx::query(
            r#"INSERT INTO gifts
                (store, store_link, item, description, quantity, price, status, purchased_at, purchaser_name, image_url)
            VALUES (?, ?, ?, ?, 1, ?, ?, ?, ?, ?)"#,
        )
        .bind(store)
        .bind(store_link)
        .bind(item)
        .bind(description)
        .bind(price)
        .bind(status)
        .bind(purchased_at)
        .bind(purchaser_name)
        .bind(&image_url)
        .execute(pool)
        .await?;
        inserted += 1;
    }

    Ok(inserted)
}
