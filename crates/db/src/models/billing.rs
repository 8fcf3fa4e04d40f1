use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::line_item::{self, LineItem};
use crate::sync::SyncRecord;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Quote,
    Invoice,
    Receipt,
}

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Issued,
    Paid,
    Cancelled,
}

/// A printable billing document. The number is allocated from the billing
/// counters settings doc at issue time, never at creation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct BillingDocument {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub number: Option<String>,
    pub client_id: Uuid,
    pub lines: String,
    pub total_cents: i64,
    pub status: DocumentStatus,
    pub issued_at: Option<DateTime<Utc>>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateBillingDocument {
    pub kind: DocumentKind,
    pub client_id: Uuid,
    pub lines: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateBillingDocument {
    pub client_id: Uuid,
    pub lines: Vec<LineItem>,
    pub status: DocumentStatus,
}

impl BillingDocument {
    pub fn parsed_lines(&self) -> Vec<LineItem> {
        line_item::parse_lines(&self.lines)
    }

    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM billing_documents ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM billing_documents WHERE is_archived = 0 ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM billing_documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_client_id(
        pool: &SqlitePool,
        client_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM billing_documents WHERE client_id = $1 AND is_archived = 0 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateBillingDocument,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let lines = line_item::serialize_lines(&data.lines)
            .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
        let total = line_item::lines_total(&data.lines);
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO billing_documents (id, kind, client_id, lines, total_cents)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.kind)
        .bind(data.client_id)
        .bind(lines)
        .bind(total)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateBillingDocument,
    ) -> Result<Self, sqlx::Error> {
        let lines = line_item::serialize_lines(&data.lines)
            .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
        let total = line_item::lines_total(&data.lines);
        sqlx::query_as::<_, Self>(
            r#"UPDATE billing_documents
               SET client_id = $2, lines = $3, total_cents = $4, status = $5,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.client_id)
        .bind(lines)
        .bind(total)
        .bind(&data.status)
        .fetch_one(pool)
        .await
    }

    /// Stamp a draft with its allocated number, inside the numbering
    /// transaction. Zero rows means the document was not a draft.
    pub async fn mark_issued_in_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        id: Uuid,
        number: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE billing_documents
               SET number = $2, status = 'issued', issued_at = datetime('now', 'subsec'),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1 AND status = 'draft'"#,
        )
        .bind(id)
        .bind(number)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn mark_paid(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE billing_documents
               SET status = 'paid', updated_at = datetime('now', 'subsec')
               WHERE id = $1 AND status = 'issued'"#,
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
            "UPDATE billing_documents SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM billing_documents WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for BillingDocument {
    const TABLE: &'static str = "billing_documents";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        row: &Self,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO billing_documents (id, kind, number, client_id, lines, total_cents, status, issued_at, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   kind = excluded.kind,
                   number = excluded.number,
                   client_id = excluded.client_id,
                   lines = excluded.lines,
                   total_cents = excluded.total_cents,
                   status = excluded.status,
                   issued_at = excluded.issued_at,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(row.kind)
        .bind(&row.number)
        .bind(row.client_id)
        .bind(&row.lines)
        .bind(row.total_cents)
        .bind(&row.status)
        .bind(row.issued_at)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
