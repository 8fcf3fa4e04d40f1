use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::line_item::{self, LineItem};
use crate::sync::SyncRecord;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSupplier {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PurchaseOrderStatus {
    #[default]
    Draft,
    Ordered,
    Received,
    Cancelled,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub reference: String,
    pub lines: String,
    pub total_cents: i64,
    pub status: PurchaseOrderStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePurchaseOrder {
    pub supplier_id: Uuid,
    pub reference: String,
    pub lines: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdatePurchaseOrder {
    pub supplier_id: Uuid,
    pub reference: String,
    pub lines: Vec<LineItem>,
    pub status: PurchaseOrderStatus,
}

impl Supplier {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM suppliers ORDER BY name ASC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM suppliers WHERE is_archived = 0 ORDER BY name ASC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSupplier,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO suppliers (id, name, email, phone)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateSupplier,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE suppliers
               SET name = $2, email = $3, phone = $4, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .fetch_one(pool)
        .await
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE suppliers SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Non-archived purchase orders still referencing this supplier. The
    /// archive guard refuses to archive a supplier while this is non-zero.
    pub async fn count_active_orders(pool: &SqlitePool, id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchase_orders WHERE supplier_id = $1 AND is_archived = 0",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}

impl PurchaseOrder {
    pub fn parsed_lines(&self) -> Vec<LineItem> {
        line_item::parse_lines(&self.lines)
    }

    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM purchase_orders ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM purchase_orders WHERE is_archived = 0 ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM purchase_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreatePurchaseOrder,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let lines = line_item::serialize_lines(&data.lines)
            .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
        let total = line_item::lines_total(&data.lines);
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO purchase_orders (id, supplier_id, reference, lines, total_cents)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.supplier_id)
        .bind(&data.reference)
        .bind(lines)
        .bind(total)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdatePurchaseOrder,
    ) -> Result<Self, sqlx::Error> {
        let lines = line_item::serialize_lines(&data.lines)
            .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
        let total = line_item::lines_total(&data.lines);
        sqlx::query_as::<_, Self>(
            r#"UPDATE purchase_orders
               SET supplier_id = $2, reference = $3, lines = $4, total_cents = $5, status = $6,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.supplier_id)
        .bind(&data.reference)
        .bind(lines)
        .bind(total)
        .bind(&data.status)
        .fetch_one(pool)
        .await
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE purchase_orders SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM purchase_orders WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for Supplier {
    const TABLE: &'static str = "suppliers";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO suppliers (id, name, email, phone, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   email = excluded.email,
                   phone = excluded.phone,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SyncRecord for PurchaseOrder {
    const TABLE: &'static str = "purchase_orders";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO purchase_orders (id, supplier_id, reference, lines, total_cents, status, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   supplier_id = excluded.supplier_id,
                   reference = excluded.reference,
                   lines = excluded.lines,
                   total_cents = excluded.total_cents,
                   status = excluded.status,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(row.supplier_id)
        .bind(&row.reference)
        .bind(&row.lines)
        .bind(row.total_cents)
        .bind(&row.status)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
