use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::sync::SyncRecord;

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoucherStatus {
    #[default]
    Available,
    Sold,
    Expired,
}

/// A prepaid wifi-zone access voucher.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct WifiVoucher {
    pub id: Uuid,
    pub code: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub status: VoucherStatus,
    pub sold_at: Option<DateTime<Utc>>,
    pub client_id: Option<Uuid>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateWifiVoucher {
    pub code: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
}

impl WifiVoucher {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM wifi_vouchers ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM wifi_vouchers WHERE is_archived = 0 ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM wifi_vouchers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateWifiVoucher,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO wifi_vouchers (id, code, duration_minutes, price_cents)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.code)
        .bind(data.duration_minutes)
        .bind(data.price_cents)
        .fetch_one(pool)
        .await
    }

    /// Mark a voucher sold to a client (or anonymously).
    pub async fn mark_sold(
        pool: &SqlitePool,
        id: Uuid,
        client_id: Option<Uuid>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE wifi_vouchers
               SET status = 'sold', sold_at = datetime('now', 'subsec'), client_id = $2,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1 AND status = 'available'
               RETURNING *"#,
        )
        .bind(id)
        .bind(client_id)
        .fetch_one(pool)
        .await
    }

    pub async fn mark_expired(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE wifi_vouchers SET status = 'expired', updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE wifi_vouchers SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wifi_vouchers WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for WifiVoucher {
    const TABLE: &'static str = "wifi_vouchers";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO wifi_vouchers (id, code, duration_minutes, price_cents, status, sold_at, client_id, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   code = excluded.code,
                   duration_minutes = excluded.duration_minutes,
                   price_cents = excluded.price_cents,
                   status = excluded.status,
                   sold_at = excluded.sold_at,
                   client_id = excluded.client_id,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(&row.code)
        .bind(row.duration_minutes)
        .bind(row.price_cents)
        .bind(&row.status)
        .bind(row.sold_at)
        .bind(row.client_id)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
