//! Generic collection synchronization: reconcile a client-submitted
//! collection against the stored table via a diff-based upsert/delete,
//! applied in one transaction. On failure nothing is written, which is the
//! server half of the dashboard's optimistic-update-with-rollback model.

use std::collections::{HashMap, HashSet};

use db::sync::SyncRecord;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, TS)]
pub struct SyncOutcome<T> {
    /// Authoritative post-apply collection.
    pub rows: Vec<T>,
    pub upserted: usize,
    pub deleted: usize,
}

pub struct SyncService;

impl SyncService {
    pub async fn fetch_collection<T: SyncRecord>(pool: &SqlitePool) -> Result<Vec<T>, SyncError> {
        Ok(T::fetch_all(pool).await?)
    }

    /// Reconcile `desired` against the stored collection.
    ///
    /// Changed-or-new rows (compared on their serialized form) are
    /// upserted; ids present remotely but absent from the submission are
    /// deleted. Last write wins; there is no conflict resolution and no
    /// partial application.
    pub async fn sync_collection<T: SyncRecord>(
        pool: &SqlitePool,
        desired: Vec<T>,
    ) -> Result<SyncOutcome<T>, SyncError> {
        let current = T::fetch_all(pool).await?;
        let mut current_by_id: HashMap<Uuid, serde_json::Value> =
            HashMap::with_capacity(current.len());
        for row in &current {
            current_by_id.insert(row.sync_id(), serde_json::to_value(row)?);
        }
        let desired_ids: HashSet<Uuid> = desired.iter().map(SyncRecord::sync_id).collect();

        let mut to_upsert = Vec::new();
        for row in &desired {
            let value = serde_json::to_value(row)?;
            let unchanged = current_by_id
                .get(&row.sync_id())
                .is_some_and(|existing| *existing == value);
            if !unchanged {
                to_upsert.push(row);
            }
        }
        let to_delete: Vec<Uuid> = current_by_id
            .keys()
            .filter(|id| !desired_ids.contains(id))
            .copied()
            .collect();

        if to_upsert.is_empty() && to_delete.is_empty() {
            debug!(table = T::TABLE, "collection sync: nothing to apply");
            return Ok(SyncOutcome {
                rows: current,
                upserted: 0,
                deleted: 0,
            });
        }

        // A dropped transaction rolls back, so any failure below reverts
        // the whole batch.
        let mut tx = pool.begin().await?;
        for row in &to_upsert {
            T::upsert(&mut tx, row).await?;
        }
        let mut deleted = 0usize;
        for id in &to_delete {
            deleted += T::delete_by_id(&mut tx, *id).await? as usize;
        }
        tx.commit().await?;

        info!(
            table = T::TABLE,
            upserted = to_upsert.len(),
            deleted,
            "collection sync applied"
        );

        let rows = T::fetch_all(pool).await?;
        Ok(SyncOutcome {
            rows,
            upserted: to_upsert.len(),
            deleted,
        })
    }
}
