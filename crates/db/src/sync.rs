//! Trait implemented by every collection that participates in the generic
//! table synchronization layer. The diff and transaction live in
//! `services::sync`; models only describe how to fetch, upsert and delete
//! their own rows.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

#[async_trait]
pub trait SyncRecord: Sized + Send + Sync + Serialize + DeserializeOwned {
    /// Logical table name as exposed on the sync routes.
    const TABLE: &'static str;

    fn sync_id(&self) -> Uuid;

    /// Fetch every row, archived included. The sync layer reconciles the
    /// whole collection, so archived rows must be part of the baseline.
    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error>;

    /// Insert or fully replace one row inside the sync transaction.
    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error>;

    async fn delete_by_id(tx: &mut Transaction<'_, Sqlite>, id: Uuid) -> Result<u64, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", Self::TABLE);
        let result = sqlx::query(&query).bind(id).execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }
}
