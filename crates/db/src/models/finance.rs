use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Type};
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
pub enum TransactionKind {
    #[default]
    Income,
    Expense,
}

/// A finance-ledger entry. `source_ref` points back at the record that
/// produced it (payroll run, sale, billing document) when one exists.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub category: String,
    pub label: String,
    pub amount_cents: i64,
    pub occurred_at: DateTime<Utc>,
    pub source_ref: Option<Uuid>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub label: String,
    pub amount_cents: i64,
    pub occurred_at: Option<DateTime<Utc>>,
    pub source_ref: Option<Uuid>,
}

impl Transaction {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM transactions ORDER BY occurred_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM transactions WHERE is_archived = 0 ORDER BY occurred_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_source_ref(
        pool: &SqlitePool,
        source_ref: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM transactions WHERE source_ref = $1")
            .bind(source_ref)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateTransaction,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let occurred_at = data.occurred_at.unwrap_or_else(Utc::now);
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO transactions (id, kind, category, label, amount_cents, occurred_at, source_ref)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.kind)
        .bind(&data.category)
        .bind(&data.label)
        .bind(data.amount_cents)
        .bind(occurred_at)
        .bind(data.source_ref)
        .fetch_one(pool)
        .await
    }

    /// Variant of `create` that joins an ongoing transaction, used where a
    /// ledger entry must land atomically with its source record.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        data: &CreateTransaction,
        id: Uuid,
    ) -> Result<(), sqlx::Error> {
        let occurred_at = data.occurred_at.unwrap_or_else(Utc::now);
        sqlx::query(
            r#"INSERT INTO transactions (id, kind, category, label, amount_cents, occurred_at, source_ref)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(id)
        .bind(&data.kind)
        .bind(&data.category)
        .bind(&data.label)
        .bind(data.amount_cents)
        .bind(occurred_at)
        .bind(data.source_ref)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE transactions SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for Transaction {
    const TABLE: &'static str = "transactions";

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
            r#"INSERT INTO transactions (id, kind, category, label, amount_cents, occurred_at, source_ref, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   kind = excluded.kind,
                   category = excluded.category,
                   label = excluded.label,
                   amount_cents = excluded.amount_cents,
                   occurred_at = excluded.occurred_at,
                   source_ref = excluded.source_ref,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(&row.kind)
        .bind(&row.category)
        .bind(&row.label)
        .bind(row.amount_cents)
        .bind(row.occurred_at)
        .bind(row.source_ref)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
