//! Payroll confirmation. Confirming a run flips its status and books
//! exactly one expense transaction, atomically.

use db::models::{
    finance::{CreateTransaction, Transaction, TransactionKind},
    personnel::{Employee, PayrollRun},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("payroll run not found")]
    NotFound,
    #[error("payroll run already confirmed")]
    AlreadyConfirmed,
}

pub struct PayrollService;

impl PayrollService {
    pub async fn confirm(pool: &SqlitePool, run_id: Uuid) -> Result<Transaction, PayrollError> {
        let run = PayrollRun::find_by_id(pool, run_id)
            .await?
            .ok_or(PayrollError::NotFound)?;
        let employee_name = Employee::find_by_id(pool, run.employee_id)
            .await?
            .map_or_else(|| "unknown".to_string(), |e| e.name);

        let mut tx = pool.begin().await?;
        if PayrollRun::confirm_in_tx(&mut tx, run_id).await? == 0 {
            // Status was not draft; drop the transaction untouched.
            return Err(PayrollError::AlreadyConfirmed);
        }
        let transaction_id = Uuid::now_v7();
        Transaction::create_in_tx(
            &mut tx,
            &CreateTransaction {
                kind: TransactionKind::Expense,
                category: "payroll".to_string(),
                label: format!("Salary {} {}", employee_name, run.period),
                amount_cents: run.net_cents,
                occurred_at: None,
                source_ref: Some(run.id),
            },
            transaction_id,
        )
        .await?;
        tx.commit().await?;

        info!(
            payroll_run_id = %run_id,
            transaction_id = %transaction_id,
            amount_cents = run.net_cents,
            "payroll run confirmed"
        );

        Transaction::find_by_id(pool, transaction_id)
            .await?
            .ok_or(PayrollError::NotFound)
    }
}
