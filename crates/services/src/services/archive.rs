//! Archive guards: referential rules checked before a record may be
//! soft-deleted. The data layer itself does not enforce these.

use db::models::{
    academy::Course,
    client::Client,
    personnel::Employee,
    purchasing::Supplier,
    shop::Product,
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record not found")]
    NotFound,
    #[error("{entity} is still referenced: {reason}")]
    StillReferenced {
        entity: &'static str,
        reason: String,
    },
}

pub struct ArchiveService;

impl ArchiveService {
    /// A supplier cannot be archived while a non-archived purchase order
    /// references it.
    pub async fn archive_supplier(pool: &SqlitePool, id: Uuid) -> Result<(), ArchiveError> {
        let active = Supplier::count_active_orders(pool, id).await?;
        if active > 0 {
            return Err(ArchiveError::StillReferenced {
                entity: "supplier",
                reason: format!("{active} non-archived purchase order(s)"),
            });
        }
        if Supplier::set_archived(pool, id, true).await? == 0 {
            return Err(ArchiveError::NotFound);
        }
        info!(supplier_id = %id, "supplier archived");
        Ok(())
    }

    /// A client cannot be archived while non-archived billing documents,
    /// studio bookings or decor projects reference it.
    pub async fn archive_client(pool: &SqlitePool, id: Uuid) -> Result<(), ArchiveError> {
        let references = [
            ("billing_documents", "billing document(s)"),
            ("studio_bookings", "studio booking(s)"),
            ("decor_projects", "decor project(s)"),
        ];
        for (table, label) in references {
            let count = sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM {table} WHERE client_id = $1 AND is_archived = 0"
            ))
            .bind(id)
            .fetch_one(pool)
            .await?;
            if count > 0 {
                return Err(ArchiveError::StillReferenced {
                    entity: "client",
                    reason: format!("{count} non-archived {label}"),
                });
            }
        }
        if Client::set_archived(pool, id, true).await? == 0 {
            return Err(ArchiveError::NotFound);
        }
        info!(client_id = %id, "client archived");
        Ok(())
    }

    /// An employee with draft payroll runs cannot be archived.
    pub async fn archive_employee(pool: &SqlitePool, id: Uuid) -> Result<(), ArchiveError> {
        let drafts = Employee::count_draft_payroll(pool, id).await?;
        if drafts > 0 {
            return Err(ArchiveError::StillReferenced {
                entity: "employee",
                reason: format!("{drafts} unconfirmed payroll run(s)"),
            });
        }
        if Employee::set_archived(pool, id, true).await? == 0 {
            return Err(ArchiveError::NotFound);
        }
        info!(employee_id = %id, "employee archived");
        Ok(())
    }

    /// A course with active, non-archived students cannot be archived.
    pub async fn archive_course(pool: &SqlitePool, id: Uuid) -> Result<(), ArchiveError> {
        let students = Course::count_active_students(pool, id).await?;
        if students > 0 {
            return Err(ArchiveError::StillReferenced {
                entity: "course",
                reason: format!("{students} active student(s)"),
            });
        }
        if Course::set_archived(pool, id, true).await? == 0 {
            return Err(ArchiveError::NotFound);
        }
        Ok(())
    }

    /// A product still tracked by non-archived inventory cannot be archived.
    pub async fn archive_product(pool: &SqlitePool, id: Uuid) -> Result<(), ArchiveError> {
        let items = Product::count_active_inventory(pool, id).await?;
        if items > 0 {
            return Err(ArchiveError::StillReferenced {
                entity: "product",
                reason: format!("{items} non-archived inventory item(s)"),
            });
        }
        if Product::set_archived(pool, id, true).await? == 0 {
            return Err(ArchiveError::NotFound);
        }
        Ok(())
    }
}
