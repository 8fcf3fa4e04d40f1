use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use ts_rs::TS;
use uuid::Uuid;

use crate::sync::SyncRecord;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Full-object replacement payload; every mutable field is submitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl Client {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM clients ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM clients WHERE is_archived = 0 ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateClient,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO clients (id, name, email, phone, address, notes)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateClient,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE clients
               SET name = $2, email = $3, phone = $4, address = $5, notes = $6,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.notes)
        .fetch_one(pool)
        .await
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Permanent removal. Only archived rows are eligible; a live row is a no-op.
    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for Client {
    const TABLE: &'static str = "clients";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO clients (id, name, email, phone, address, notes, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   email = excluded.email,
                   phone = excluded.phone,
                   address = excluded.address,
                   notes = excluded.notes,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.address)
        .bind(&row.notes)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
