//! Billing document numbering and payment bookkeeping. Numbers come from
//! the `billing_counters` settings doc and are allocated in the same
//! transaction that stamps the document.

use db::models::{
    billing::{BillingDocument, DocumentKind},
    finance::{CreateTransaction, TransactionKind},
    settings::{BILLING_COUNTERS_ID, BillingCounters, SettingsDoc},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("document not found")]
    NotFound,
    #[error("document is not a draft")]
    NotDraft,
    #[error("document is not issued")]
    NotIssued,
}

fn number_prefix(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Quote => "QUO",
        DocumentKind::Invoice => "INV",
        DocumentKind::Receipt => "RCP",
    }
}

pub struct BillingService;

impl BillingService {
    /// Issue a draft document: allocate the next number for its kind and
    /// stamp it, atomically with the counter increment.
    pub async fn issue(pool: &SqlitePool, document_id: Uuid) -> Result<BillingDocument, BillingError> {
        let document = BillingDocument::find_by_id(pool, document_id)
            .await?
            .ok_or(BillingError::NotFound)?;

        let mut tx = pool.begin().await?;
        let mut counters: BillingCounters = SettingsDoc::find_by_id_in_tx(&mut tx, BILLING_COUNTERS_ID)
            .await?
            .map(|doc| doc.parsed())
            .unwrap_or_default();
        let sequence = counters.next_for(document.kind);
        let number = format!("{}-{:04}", number_prefix(document.kind), sequence);

        if BillingDocument::mark_issued_in_tx(&mut tx, document_id, &number).await? == 0 {
            return Err(BillingError::NotDraft);
        }
        SettingsDoc::put_in_tx(&mut tx, BILLING_COUNTERS_ID, &serde_json::to_string(&counters)?)
            .await?;
        tx.commit().await?;

        info!(document_id = %document_id, number, "billing document issued");

        BillingDocument::find_by_id(pool, document_id)
            .await?
            .ok_or(BillingError::NotFound)
    }

    /// Mark an issued document paid and book the matching income entry in
    /// one transaction.
    pub async fn pay(pool: &SqlitePool, document_id: Uuid) -> Result<BillingDocument, BillingError> {
        let document = BillingDocument::find_by_id(pool, document_id)
            .await?
            .ok_or(BillingError::NotFound)?;

        let mut tx = pool.begin().await?;
        let updated = sqlx::query(
            r#"UPDATE billing_documents
               SET status = 'paid', updated_at = datetime('now', 'subsec')
               WHERE id = $1 AND status = 'issued'"#,
        )
        .bind(document_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(BillingError::NotIssued);
        }
        db::models::finance::Transaction::create_in_tx(
            &mut tx,
            &CreateTransaction {
                kind: TransactionKind::Income,
                category: "billing".to_string(),
                label: format!(
                    "Payment {}",
                    document.number.as_deref().unwrap_or("(unnumbered)")
                ),
                amount_cents: document.total_cents,
                occurred_at: None,
                source_ref: Some(document.id),
            },
            Uuid::now_v7(),
        )
        .await?;
        tx.commit().await?;

        BillingDocument::find_by_id(pool, document_id)
            .await?
            .ok_or(BillingError::NotFound)
    }
}
