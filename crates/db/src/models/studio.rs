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
pub enum BookingStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// A studio session (photo/video shoot, rehearsal, recording slot).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct StudioBooking {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub service: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub status: BookingStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateStudioBooking {
    pub client_id: Option<Uuid>,
    pub service: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub price_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateStudioBooking {
    pub client_id: Option<Uuid>,
    pub service: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub status: BookingStatus,
}

impl StudioBooking {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM studio_bookings ORDER BY scheduled_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM studio_bookings WHERE is_archived = 0 ORDER BY scheduled_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM studio_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_client_id(
        pool: &SqlitePool,
        client_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM studio_bookings WHERE client_id = $1 AND is_archived = 0 ORDER BY scheduled_at DESC",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateStudioBooking,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO studio_bookings (id, client_id, service, scheduled_at, duration_minutes, price_cents)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.client_id)
        .bind(&data.service)
        .bind(data.scheduled_at)
        .bind(data.duration_minutes)
        .bind(data.price_cents)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateStudioBooking,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE studio_bookings
               SET client_id = $2, service = $3, scheduled_at = $4, duration_minutes = $5,
                   price_cents = $6, status = $7, updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.client_id)
        .bind(&data.service)
        .bind(data.scheduled_at)
        .bind(data.duration_minutes)
        .bind(data.price_cents)
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
            "UPDATE studio_bookings SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM studio_bookings WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for StudioBooking {
    const TABLE: &'static str = "studio_bookings";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO studio_bookings (id, client_id, service, scheduled_at, duration_minutes, price_cents, status, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   client_id = excluded.client_id,
                   service = excluded.service,
                   scheduled_at = excluded.scheduled_at,
                   duration_minutes = excluded.duration_minutes,
                   price_cents = excluded.price_cents,
                   status = excluded.status,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(row.client_id)
        .bind(&row.service)
        .bind(row.scheduled_at)
        .bind(row.duration_minutes)
        .bind(row.price_cents)
        .bind(&row.status)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
