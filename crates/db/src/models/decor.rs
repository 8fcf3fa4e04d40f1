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
pub enum DecorProjectStatus {
    #[default]
    Draft,
    InProgress,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct DecorProject {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub budget_cents: i64,
    pub status: DecorProjectStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateDecorProject {
    pub client_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub budget_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateDecorProject {
    pub client_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub budget_cents: i64,
    pub status: DecorProjectStatus,
}

impl DecorProject {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM decor_projects ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM decor_projects WHERE is_archived = 0 ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM decor_projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_client_id(
        pool: &SqlitePool,
        client_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM decor_projects WHERE client_id = $1 AND is_archived = 0 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateDecorProject,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO decor_projects (id, client_id, title, description, budget_cents)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.client_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.budget_cents)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateDecorProject,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE decor_projects
               SET client_id = $2, title = $3, description = $4, budget_cents = $5, status = $6,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.client_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.budget_cents)
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
            "UPDATE decor_projects SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM decor_projects WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for DecorProject {
    const TABLE: &'static str = "decor_projects";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO decor_projects (id, client_id, title, description, budget_cents, status, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   client_id = excluded.client_id,
                   title = excluded.title,
                   description = excluded.description,
                   budget_cents = excluded.budget_cents,
                   status = excluded.status,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(row.client_id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.budget_cents)
        .bind(&row.status)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
