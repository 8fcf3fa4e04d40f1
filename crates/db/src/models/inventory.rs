use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use ts_rs::TS;
use uuid::Uuid;

use crate::sync::SyncRecord;

/// Stock on hand for one product at one location.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct InventoryItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub location: String,
    pub quantity: i64,
    pub reorder_level: i64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateInventoryItem {
    pub product_id: Uuid,
    pub location: String,
    pub quantity: i64,
    pub reorder_level: i64,
}

impl InventoryItem {
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM inventory_items ORDER BY location, created_at")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM inventory_items WHERE is_archived = 0 ORDER BY location, created_at",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM inventory_items WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateInventoryItem,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO inventory_items (id, product_id, location, quantity, reorder_level)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.product_id)
        .bind(&data.location)
        .bind(data.quantity)
        .bind(data.reorder_level)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateInventoryItem,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE inventory_items
               SET product_id = $2, location = $3, quantity = $4, reorder_level = $5,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.product_id)
        .bind(&data.location)
        .bind(data.quantity)
        .bind(data.reorder_level)
        .fetch_one(pool)
        .await
    }

    /// Relative stock adjustment (receiving, selling, stock-take).
    pub async fn adjust_quantity(
        pool: &SqlitePool,
        id: Uuid,
        delta: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE inventory_items
               SET quantity = quantity + $2, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(delta)
        .fetch_one(pool)
        .await
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inventory_items SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for InventoryItem {
    const TABLE: &'static str = "inventory_items";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO inventory_items (id, product_id, location, quantity, reorder_level, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   product_id = excluded.product_id,
                   location = excluded.location,
                   quantity = excluded.quantity,
                   reorder_level = excluded.reorder_level,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(row.product_id)
        .bind(&row.location)
        .bind(row.quantity)
        .bind(row.reorder_level)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
