//! Database repository for catalog operations.
//!
//! Every mutation goes through here; handlers never touch SQL directly.
//! The claim operation is the one conditional state transition in the
//! system: a guarded UPDATE that only applies while the gift is still
//! available, so two concurrent guests can never both claim the same row.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Catalog, CreateGiftRequest, Gift, GiftStatus, RevisionInfo, UpdateGiftRequest};

/// Database repository for all catalog operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Get the full catalog snapshot.
    pub async fn get_catalog(&self) -> Result<Catalog, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let gifts = self.list_gifts().await?;

        Ok(Catalog {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            gifts,
        })
    }

    /// List all gifts in id order.
    pub async fn list_gifts(&self) -> Result<Vec<Gift>, AppError> {
        let rows = sqlx::query(
            "SELECT id, store, store_link, item, description, quantity, price, status, purchased_at, purchaser_name, image_url FROM gifts ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(gift_from_row).collect())
    }

    /// Get a gift by ID.
    pub async fn get_gift(&self, id: i64) -> Result<Option<Gift>, AppError> {
        let row = sqlx::query(
            "SELECT id, store, store_link, item, description, quantity, price, status, purchased_at, purchaser_name, image_url FROM gifts WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(gift_from_row))
    }

    /// Create a new gift. The server assigns the id; new gifts always start
    /// out available.
    pub async fn create_gift(&self, request: &CreateGiftRequest) -> Result<Gift, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO gifts
                (store, store_link, item, description, quantity, price, status, purchased_at, purchaser_name, image_url)
            VALUES (?, ?, ?, ?, ?, ?, 'available', NULL, '', ?)"#,
        )
        .bind(&request.store)
        .bind(&request.store_link)
        .bind(&request.item)
        .bind(&request.description)
        .bind(request.quantity)
        .bind(request.price)
        .bind(&request.image_url)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.increment_revision().await?;

        Ok(Gift {
            id,
            store: request.store.clone(),
            store_link: request.store_link.clone(),
            item: request.item.clone(),
            description: request.description.clone(),
            quantity: request.quantity,
            price: request.price,
            status: GiftStatus::Available,
            purchased_at: None,
            purchaser_name: String::new(),
            image_url: request.image_url.clone(),
        })
    }

    /// Apply partial field edits to a gift. Last write wins; there is a
    /// single administrator, so admin edits are not guarded against each
    /// other. Purchase state is untouchable here.
    pub async fn update_gift(
        &self,
        id: i64,
        request: &UpdateGiftRequest,
    ) -> Result<Gift, AppError> {
        let existing = self
            .get_gift(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gift {} not found", id)))?;

        let store = request.store.as_ref().unwrap_or(&existing.store);
        let store_link = request.store_link.clone().or(existing.store_link.clone());
        let item = request.item.as_ref().unwrap_or(&existing.item);
        let description = request.description.clone().or(existing.description.clone());
        let quantity = request.quantity.unwrap_or(existing.quantity);
        let price = request.price.unwrap_or(existing.price);
        let image_url = request.image_url.clone().or(existing.image_url.clone());

        let result = sqlx::query(
            "UPDATE gifts SET store = ?, store_link = ?, item = ?, description = ?, quantity = ?, price = ?, image_url = ? WHERE id = ?"
        )
        .bind(store)
        .bind(&store_link)
        .bind(item)
        .bind(&description)
        .bind(quantity)
        .bind(price)
        .bind(&image_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Deleted between the read and the write
            return Err(AppError::NotFound(format!("Gift {} not found", id)));
        }

        self.increment_revision().await?;

        Ok(Gift {
            id,
            store: store.clone(),
            store_link,
            item: item.clone(),
            description,
            quantity,
            price,
            status: existing.status,
            purchased_at: existing.purchased_at,
            purchaser_name: existing.purchaser_name,
            image_url,
        })
    }

    /// Delete a gift. Hard delete, no tombstone.
    pub async fn delete_gift(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM gifts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Gift {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    /// Claim a gift for a guest: the guarded available-to-purchased
    /// transition.
    ///
    /// The availability precondition is checked by the store itself, inside
    /// the UPDATE, never by a prior read. Exactly one of N concurrent claims
    /// on the same row can see `rows_affected == 1`; every other caller gets
    /// `AlreadyTaken` with the winning row attached. Retrying after a
    /// transient failure re-runs the same statement and is therefore safe.
    pub async fn claim_gift(&self, id: i64, purchaser_name: &str) -> Result<Gift, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE gifts SET status = 'purchased', purchased_at = ?, purchaser_name = ? WHERE id = ? AND status = 'available'"
        )
        .bind(&now)
        .bind(purchaser_name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Nothing was written. One follow-up read classifies the outcome:
            // a missing row was never there, an existing row lost the race.
            return match self.get_gift(id).await? {
                Some(current) => Err(AppError::AlreadyTaken {
                    message: format!("Gift {} was already purchased", id),
                    current,
                }),
                None => Err(AppError::NotFound(format!("Gift {} not found", id))),
            };
        }

        self.increment_revision().await?;

        // Return the stored row, not a locally assembled one
        self.get_gift(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Gift {} vanished after claim", id)))
    }

    /// Administrative reset: put a purchased gift back in the catalog and
    /// clear its purchase metadata.
    pub async fn reset_gift(&self, id: i64) -> Result<Gift, AppError> {
        let result = sqlx::query(
            "UPDATE gifts SET status = 'available', purchased_at = NULL, purchaser_name = '' WHERE id = ?"
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Gift {} not found", id)));
        }

        self.increment_revision().await?;

        self.get_gift(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Gift {} vanished after reset", id)))
    }
}

// Helper for row conversion

fn gift_from_row(row: &sqlx::sqlite::SqliteRow) -> Gift {
    let status_str: String = row.get("status");
    Gift {
        id: row.get("id"),
        store: row.get("store"),
        store_link: row.get("store_link"),
        item: row.get("item"),
        description: row.get("description"),
        quantity: row.get("quantity"),
        price: row.get("price"),
        status: GiftStatus::from_str(&status_str).unwrap_or(GiftStatus::Available),
        purchased_at: row.get("purchased_at"),
        purchaser_name: row.get("purchaser_name"),
        image_url: row.get("image_url"),
    }
}
