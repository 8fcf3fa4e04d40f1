use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::sync::SyncRecord;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub salary_cents: i64,
    pub hired_at: DateTime<Utc>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateEmployee {
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub salary_cents: i64,
}

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayrollStatus {
    #[default]
    Draft,
    Confirmed,
}

/// One employee's pay for one period. Confirmation is a service-level
/// operation because it must land atomically with the expense entry.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PayrollRun {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub period: String,
    pub gross_cents: i64,
    pub deductions_cents: i64,
    pub net_cents: i64,
    pub status: PayrollStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePayrollRun {
    pub employee_id: Uuid,
    /// Pay period, e.g. `2026-08`.
    pub period: String,
    pub gross_cents: i64,
    pub deductions_cents: i64,
}

impl Employee {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM employees ORDER BY name ASC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM employees WHERE is_archived = 0 ORDER BY name ASC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateEmployee,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO employees (id, name, position, email, phone, salary_cents)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.position)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.salary_cents)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateEmployee,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE employees
               SET name = $2, position = $3, email = $4, phone = $5, salary_cents = $6,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.position)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.salary_cents)
        .fetch_one(pool)
        .await
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE employees SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Unconfirmed payroll runs for this employee; blocks archiving.
    pub async fn count_draft_payroll(pool: &SqlitePool, id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payroll_runs WHERE employee_id = $1 AND status = 'draft' AND is_archived = 0",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}

impl PayrollRun {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM payroll_runs ORDER BY period DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM payroll_runs WHERE is_archived = 0 ORDER BY period DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM payroll_runs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_employee_id(
        pool: &SqlitePool,
        employee_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM payroll_runs WHERE employee_id = $1 AND is_archived = 0 ORDER BY period DESC",
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreatePayrollRun,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let net = data.gross_cents - data.deductions_cents;
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO payroll_runs (id, employee_id, period, gross_cents, deductions_cents, net_cents)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.employee_id)
        .bind(&data.period)
        .bind(data.gross_cents)
        .bind(data.deductions_cents)
        .bind(net)
        .fetch_one(pool)
        .await
    }

    /// Flip a draft run to confirmed inside an ongoing transaction. Returns
    /// the number of rows touched; zero means the run was already confirmed
    /// (or missing) and the caller must abort.
    pub async fn confirm_in_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE payroll_runs
               SET status = 'confirmed', confirmed_at = datetime('now', 'subsec'),
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1 AND status = 'draft'"#,
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE payroll_runs SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payroll_runs WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for Employee {
    const TABLE: &'static str = "employees";

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
            r#"INSERT INTO employees (id, name, position, email, phone, salary_cents, hired_at, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   position = excluded.position,
                   email = excluded.email,
                   phone = excluded.phone,
                   salary_cents = excluded.salary_cents,
                   hired_at = excluded.hired_at,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.position)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(row.salary_cents)
        .bind(row.hired_at)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
